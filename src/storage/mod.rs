//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - resume_versions(id, name, file_path, content, description, is_default, created_at)
//! - job_applications(id, job_title, company_name, application_date, status, ..., resume_version_id)

pub mod schema;
pub mod sqlite;

pub use sqlite::{JobStore, PLACEHOLDER_RESUME_NAME};
