//! Record types - resume versions and job applications
//!
//! Two persisted entities:
//! - `ResumeVersion`: a named resume, at most one flagged as default
//! - `JobApplication`: one application, optionally bound to a resume
//!
//! `NewResume` and `NewJobApplication` are the creation inputs; they carry
//! the structural validation that runs before any SQL.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Well-known application statuses.
///
/// Status is stored as free-form text; these are only suggestions surfaced
/// to the assistant.
pub mod status {
    pub const APPLIED: &str = "applied";
    pub const INTERVIEWING: &str = "interviewing";
    pub const OFFER: &str = "offer";
    pub const REJECTED: &str = "rejected";
    pub const WITHDRAWN: &str = "withdrawn";

    pub const WELL_KNOWN: &[&str] = &[APPLIED, INTERVIEWING, OFFER, REJECTED, WITHDRAWN];
}

pub const MAX_RESUME_NAME_LEN: usize = 100;
pub const MAX_FILE_PATH_LEN: usize = 500;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_STATUS_LEN: usize = 50;
pub const MAX_SHORT_FIELD_LEN: usize = 100;

/// A stored resume version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeVersion {
    pub id: i64,
    /// Unique name, e.g. `backend-focused`
    pub name: String,
    /// Full resume text
    pub content: Option<String>,
    /// Path to a resume file on disk
    pub file_path: Option<String>,
    pub description: Option<String>,
    /// Bound automatically to applications created without a resume name
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl ResumeVersion {
    /// Number of characters of text content (0 when there is none)
    pub fn content_len(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }
}

/// Input for creating a resume version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewResume {
    pub name: String,
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub description: Option<String>,
    pub is_default: bool,
}

impl NewResume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the new resume as the default
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("name", &self.name, MAX_RESUME_NAME_LEN)?;
        limit("file_path", self.file_path.as_deref(), MAX_FILE_PATH_LEN)
    }
}

/// A stored job application with its resume binding resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub job_title: String,
    pub company_name: String,
    pub application_date: NaiveDate,
    pub status: String,
    pub job_url: Option<String>,
    pub salary_range: Option<String>,
    pub location: Option<String>,
    /// Where the posting was found (LinkedIn, Indeed, company site, ...)
    pub job_source: Option<String>,
    pub recruiter_name: Option<String>,
    pub recruiter_email: Option<String>,
    pub next_followup_date: Option<NaiveDate>,
    /// Free text; status updates append dated lines
    pub notes: Option<String>,
    /// Resume used for this application, loaded together with the row
    pub resume: Option<ResumeVersion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Name of the bound resume, if any
    pub fn resume_name(&self) -> Option<&str> {
        self.resume.as_ref().map(|r| r.name.as_str())
    }
}

/// Input for creating a job application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJobApplication {
    pub job_title: String,
    pub company_name: String,
    pub application_date: NaiveDate,
    pub status: String,
    pub job_url: Option<String>,
    pub salary_range: Option<String>,
    pub location: Option<String>,
    pub job_source: Option<String>,
    pub recruiter_name: Option<String>,
    pub recruiter_email: Option<String>,
    pub next_followup_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Resume to bind by name; the default resume is used when absent or unknown
    pub resume_version_name: Option<String>,
}

impl NewJobApplication {
    /// Create an application with status `applied` and no optional fields
    pub fn new(
        job_title: impl Into<String>,
        company_name: impl Into<String>,
        application_date: NaiveDate,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            company_name: company_name.into(),
            application_date,
            status: status::APPLIED.to_string(),
            job_url: None,
            salary_range: None,
            location: None,
            job_source: None,
            recruiter_name: None,
            recruiter_email: None,
            next_followup_date: None,
            notes: None,
            resume_version_name: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_resume(mut self, name: impl Into<String>) -> Self {
        self.resume_version_name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require("job_title", &self.job_title, MAX_TITLE_LEN)?;
        require("company_name", &self.company_name, MAX_TITLE_LEN)?;
        validate_status(&self.status)?;
        limit("salary_range", self.salary_range.as_deref(), MAX_SHORT_FIELD_LEN)?;
        limit("location", self.location.as_deref(), MAX_TITLE_LEN)?;
        limit("job_source", self.job_source.as_deref(), MAX_SHORT_FIELD_LEN)?;
        limit("recruiter_name", self.recruiter_name.as_deref(), MAX_TITLE_LEN)?;
        limit("recruiter_email", self.recruiter_email.as_deref(), MAX_TITLE_LEN)
    }
}

/// Result of a status update: the status before the change and the
/// updated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub previous_status: String,
    pub application: JobApplication,
}

/// Statuses are free-form but must be non-blank and fit the column.
pub fn validate_status(status: &str) -> Result<()> {
    require("status", status, MAX_STATUS_LEN)
}

fn require(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    limit(field, Some(value), max)
}

fn limit(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(Error::InvalidInput(format!(
            "{} exceeds {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}
