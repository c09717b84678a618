//! Task entity and the argument types used to create and update it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum title length in characters, counted after trimming.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Errors produced while validating task input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Title missing or blank after trimming.
    #[error("task title is required")]
    EmptyTitle,

    /// Title exceeds [`MAX_TITLE_LEN`].
    #[error("task title is too long (maximum {MAX_TITLE_LEN} characters)")]
    TitleTooLong,

    /// Description exceeds [`MAX_DESCRIPTION_LEN`].
    #[error("task description is too long (maximum {MAX_DESCRIPTION_LEN} characters)")]
    DescriptionTooLong,

    /// Due date is not a YYYY-MM-DD calendar day.
    #[error("invalid due date: {0} (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
}

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation and never changed.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Free-form description, empty when not provided.
    pub description: String,
    /// Optional due day.
    pub due_date: Option<NaiveDate>,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp, set once.
    pub created: DateTime<Utc>,
    /// Refreshed on every mutation. Equals `created` for a fresh task.
    pub updated: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task from a validated draft, assigning its id and
    /// timestamps.
    pub fn new(draft: TaskDraft) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            completed: false,
            created: now,
            updated: Some(now),
        }
    }

    /// Overwrites only the fields the patch supplies and refreshes the
    /// update timestamp.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated = Some(Utc::now());
    }
}

/// Validated, sanitized arguments for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Task title, trimmed and escaped, never empty.
    pub title: String,
    /// Description, trimmed and escaped, empty when not provided.
    pub description: String,
    /// Optional due day.
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Builds a draft from raw request input.
    pub fn new(
        title: &str,
        description: Option<&str>,
        due_date: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            description: match description {
                Some(description) => validate_description(description)?,
                None => String::new(),
            },
            due_date: match due_date {
                Some(raw) => parse_due_date(raw)?,
                None => None,
            },
        })
    }
}

/// Validated partial update. `None` fields are left untouched; the due date
/// carries an extra level so "clear the date" and "leave it alone" stay
/// distinguishable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Builds a patch from raw request input.
    pub fn new(
        title: Option<&str>,
        description: Option<&str>,
        due_date: Option<Option<&str>>,
        completed: Option<bool>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: match title {
                Some(title) => Some(validate_title(title)?),
                None => None,
            },
            description: match description {
                Some(description) => Some(validate_description(description)?),
                None => None,
            },
            due_date: match due_date {
                Some(Some(raw)) => Some(parse_due_date(raw)?),
                Some(None) => Some(None),
                None => None,
            },
            completed,
        })
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(sanitize_text(trimmed))
}

fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(sanitize_text(trimmed))
}

/// An empty string clears the date; anything else must be YYYY-MM-DD.
fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDueDate(trimmed.to_string()))
}

/// Escapes HTML metacharacters in already-trimmed input. The stored form is
/// display-ready, which is an output-encoding convenience and not a
/// security boundary.
fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
