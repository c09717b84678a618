//! Core entity definitions for TaskTrack.
//!
//! This crate defines the task record shared by every storage backend and
//! the HTTP layer, together with the validated argument types used to
//! create and update it.

mod stats;
mod task;

pub use stats::*;
pub use task::*;
