//! Aggregate statistics over a task collection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::Task;

/// Summary counts for a task collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Open tasks whose due date is before `today`.
    pub overdue: usize,
    /// Open tasks due exactly on `today`.
    pub due_today: usize,
    /// Percentage of completed tasks, one decimal place.
    pub completion_rate: f64,
}

impl TaskStats {
    /// Computes statistics for `tasks`, judging due dates against `today`.
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();

        let mut overdue = 0;
        let mut due_today = 0;
        for task in tasks.iter().filter(|t| !t.completed) {
            match task.due_date {
                Some(due) if due < today => overdue += 1,
                Some(due) if due == today => due_today += 1,
                _ => {}
            }
        }

        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            active: total - completed,
            overdue,
            due_today,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskDraft;

    fn task(title: &str, due: Option<&str>, completed: bool) -> Task {
        let mut task = Task::new(TaskDraft::new(title, None, due).unwrap());
        task.completed = completed;
        task
    }

    #[test]
    fn test_stats_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tasks = vec![
            task("done", None, true),
            task("late", Some("2026-03-01"), false),
            task("today", Some("2026-03-10"), false),
            task("future", Some("2026-04-01"), false),
        ];

        let stats = TaskStats::compute(&tasks, today);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.completion_rate, 25.0);
    }

    #[test]
    fn test_stats_empty_collection() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let stats = TaskStats::compute(&[], today);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_completed_tasks_are_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let tasks = vec![task("done late", Some("2026-03-01"), true)];

        let stats = TaskStats::compute(&tasks, today);

        assert_eq!(stats.overdue, 0);
    }
}
