//! Task storage for TaskTrack.
//!
//! This crate provides the persistence layer behind the REST API: a JSON
//! file backed store, a SQLite backed store, and the gateway that selects
//! between them per request and migrates file history into the database.

mod database;
mod error;
mod gateway;
mod json;
mod sqlite;
mod traits;

pub use database::*;
pub use error::*;
pub use gateway::*;
pub use json::*;
pub use sqlite::*;
pub use traits::*;
