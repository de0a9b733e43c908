//! # Jobtrack - Personal Job Application Tracker
//!
//! Tracks job applications and the resume versions used for them, and
//! exposes the data to AI assistants as MCP tools.
//!
//! Jobtrack provides:
//! - SQLite-backed store for resume versions and job applications
//! - Single default resume, bound automatically to new applications
//! - Search, status filtering and aggregate statistics
//! - A tool dispatcher and stdio MCP server for assistant hosts

pub mod model;
pub mod dates;
pub mod stats;
pub mod storage;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{JobApplication, NewJobApplication, NewResume, ResumeVersion, StatusChange};
pub use stats::ApplicationStats;
pub use storage::JobStore;

/// Result type alias for Jobtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Jobtrack operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Resume name '{0}' already exists")]
    DuplicateName(String),

    #[error("Application with ID {0} not found")]
    ApplicationNotFound(i64),

    #[error("Resume '{0}' not found")]
    ResumeNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that name a missing application or resume.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ApplicationNotFound(_) | Error::ResumeNotFound(_))
    }
}
