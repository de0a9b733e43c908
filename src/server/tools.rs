//! Tool dispatcher - maps named tool calls to store operations
//!
//! Arguments arrive as loosely-typed JSON from the assistant host. Each tool
//! deserializes its own argument struct, coerces dates, calls the store and
//! renders a plain-text reply.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use crate::{Error, Result};
use crate::dates::parse_date;
use crate::model::{status, NewJobApplication, NewResume};
use crate::stats::ApplicationStats;
use crate::storage::JobStore;
use super::format;

/// Default number of applications returned by `get_applications`
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Tool metadata advertised to the host
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Text reply for one tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

#[derive(Deserialize)]
struct AddApplicationArgs {
    job_title: String,
    company_name: String,
    application_date: Option<String>,
    status: Option<String>,
    job_url: Option<String>,
    salary_range: Option<String>,
    location: Option<String>,
    job_source: Option<String>,
    recruiter_name: Option<String>,
    recruiter_email: Option<String>,
    next_followup_date: Option<String>,
    notes: Option<String>,
    resume_version: Option<String>,
}

#[derive(Deserialize)]
struct GetApplicationsArgs {
    status: Option<String>,
    company_name: Option<String>,
    job_title: Option<String>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ApplicationIdArgs {
    application_id: i64,
}

#[derive(Deserialize)]
struct UpdateStatusArgs {
    application_id: i64,
    new_status: String,
    notes: Option<String>,
}

#[derive(Deserialize)]
struct AddResumeArgs {
    name: String,
    content: Option<String>,
    file_path: Option<String>,
    description: Option<String>,
    #[serde(default)]
    set_as_default: bool,
}

#[derive(Deserialize)]
struct ResumeNameArgs {
    resume_name: String,
}

/// Routes tool calls to a `JobStore`
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    store: JobStore,
}

impl ToolDispatcher {
    pub fn new(store: JobStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Run one tool call.
    ///
    /// Only an unknown tool name is returned as `Err`; argument and storage
    /// failures become error replies for the host to show.
    pub fn call(&self, name: &str, arguments: Option<Value>) -> Result<ToolReply> {
        match self.dispatch(name, arguments) {
            Ok(reply) => Ok(reply),
            Err(Error::UnknownTool(tool)) => Err(Error::UnknownTool(tool)),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                Ok(ToolReply::error(format::error(&e)))
            }
        }
    }

    fn dispatch(&self, name: &str, arguments: Option<Value>) -> Result<ToolReply> {
        match name {
            "add_job_application" => self.add_job_application(parse_args(arguments)?),
            "get_applications" => self.get_applications(parse_args(arguments)?),
            "get_application" => self.get_application(parse_args(arguments)?),
            "update_application_status" => self.update_application_status(parse_args(arguments)?),
            "add_resume_version" => self.add_resume_version(parse_args(arguments)?),
            "set_default_resume" => self.set_default_resume(parse_args(arguments)?),
            "get_resume_content" => self.get_resume_content(parse_args(arguments)?),
            "list_resumes" => {
                let resumes = self.store.list_resumes()?;
                Ok(ToolReply::ok(format::resume_list(&resumes)))
            }
            "get_application_stats" => {
                let applications = self.store.list_applications_with_resumes()?;
                let stats = ApplicationStats::from_applications(&applications);
                Ok(ToolReply::ok(format::stats(&stats)))
            }
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }

    fn add_job_application(&self, args: AddApplicationArgs) -> Result<ToolReply> {
        let application_date = parse_date(args.application_date.as_deref().unwrap_or("today"))?;
        let next_followup_date = non_blank(args.next_followup_date)
            .as_deref()
            .map(parse_date)
            .transpose()?;
        let requested_resume = non_blank(args.resume_version).map(|name| name.trim().to_string());

        let new_app = NewJobApplication {
            job_title: args.job_title,
            company_name: args.company_name,
            application_date,
            status: non_blank(args.status).unwrap_or_else(|| status::APPLIED.to_string()),
            job_url: non_blank(args.job_url),
            salary_range: non_blank(args.salary_range),
            location: non_blank(args.location),
            job_source: non_blank(args.job_source),
            recruiter_name: non_blank(args.recruiter_name),
            recruiter_email: non_blank(args.recruiter_email),
            next_followup_date,
            notes: non_blank(args.notes),
            resume_version_name: requested_resume.clone(),
        };

        let app = self.store.add_job_application(&new_app)?;
        tracing::info!("Added application {} ({} at {})", app.id, app.job_title, app.company_name);
        Ok(ToolReply::ok(format::application_added(&app, requested_resume.as_deref())))
    }

    fn get_applications(&self, args: GetApplicationsArgs) -> Result<ToolReply> {
        let status = non_blank(args.status);
        let company_name = non_blank(args.company_name);
        let job_title = non_blank(args.job_title);

        let mut applications = if let Some(status) = status {
            self.store.get_applications_by_status(&status)?
        } else if company_name.is_some() || job_title.is_some() {
            self.store.search_applications(company_name.as_deref(), job_title.as_deref())?
        } else {
            self.store.list_applications_with_resumes()?
        };

        let total = applications.len();
        applications.truncate(args.limit.unwrap_or(DEFAULT_LIST_LIMIT));
        Ok(ToolReply::ok(format::application_list(&applications, total)))
    }

    fn get_application(&self, args: ApplicationIdArgs) -> Result<ToolReply> {
        match self.store.get_application_with_resume(args.application_id)? {
            Some(app) => Ok(ToolReply::ok(format::application_detail(&app))),
            None => Ok(ToolReply::error(format::application_not_found(args.application_id))),
        }
    }

    fn update_application_status(&self, args: UpdateStatusArgs) -> Result<ToolReply> {
        let note = non_blank(args.notes);
        match self
            .store
            .update_application_status(args.application_id, &args.new_status, note.as_deref())
        {
            Ok(change) => {
                tracing::info!(
                    "Application {} status {} -> {}",
                    change.application.id,
                    change.previous_status,
                    change.application.status
                );
                Ok(ToolReply::ok(format::status_updated(&change)))
            }
            Err(Error::ApplicationNotFound(id)) => {
                Ok(ToolReply::error(format::application_not_found(id)))
            }
            Err(e) => Err(e),
        }
    }

    fn add_resume_version(&self, args: AddResumeArgs) -> Result<ToolReply> {
        let new_resume = NewResume {
            name: args.name,
            content: non_blank(args.content),
            file_path: non_blank(args.file_path),
            description: non_blank(args.description),
            is_default: args.set_as_default,
        };
        if new_resume.content.is_none() && new_resume.file_path.is_none() {
            return Err(Error::InvalidInput(
                "a resume needs content or a file_path".to_string(),
            ));
        }

        match self.store.add_resume(&new_resume) {
            Ok(resume) => {
                tracing::info!("Added resume {} (default: {})", resume.name, resume.is_default);
                Ok(ToolReply::ok(format::resume_added(&resume)))
            }
            Err(Error::DuplicateName(name)) => Ok(ToolReply::error(format::resume_exists(&name))),
            Err(e) => Err(e),
        }
    }

    fn set_default_resume(&self, args: ResumeNameArgs) -> Result<ToolReply> {
        let name = args.resume_name.trim();
        if self.store.set_default_resume(name)? {
            tracing::info!("Default resume set to {}", name);
            return Ok(ToolReply::ok(format::default_resume_set(name)));
        }

        let available = self.store.list_resumes()?;
        Ok(ToolReply::error(format::resume_not_found(name, &available)))
    }

    fn get_resume_content(&self, args: ResumeNameArgs) -> Result<ToolReply> {
        match self.store.get_resume_by_name(&args.resume_name)? {
            Some(resume) => Ok(ToolReply::ok(format::resume_content(&resume))),
            None => Ok(ToolReply::error(format!(
                "{} Resume '{}' not found.",
                crate::ui::Icons::CROSS,
                args.resume_name.trim()
            ))),
        }
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T> {
    let value = match arguments {
        None | Some(Value::Null) => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|e| Error::InvalidInput(e.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Tools advertised through `tools/list`
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "add_job_application",
            description: "Add a new job application to track",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "job_title": { "type": "string", "description": "Job title/position" },
                    "company_name": { "type": "string", "description": "Company name" },
                    "application_date": { "type": "string", "description": "Date applied (YYYY-MM-DD, MM/DD/YYYY, today, yesterday)" },
                    "status": { "type": "string", "description": "Application status", "default": "applied" },
                    "job_url": { "type": "string", "description": "URL to job posting" },
                    "salary_range": { "type": "string", "description": "Salary range if known" },
                    "location": { "type": "string", "description": "Job location" },
                    "job_source": { "type": "string", "description": "Where you found the job (LinkedIn, Indeed, etc.)" },
                    "recruiter_name": { "type": "string", "description": "Recruiter contact name" },
                    "recruiter_email": { "type": "string", "description": "Recruiter email" },
                    "next_followup_date": { "type": "string", "description": "When to follow up (same formats as application_date)" },
                    "notes": { "type": "string", "description": "Additional notes" },
                    "resume_version": { "type": "string", "description": "Resume version used (falls back to the default resume)" }
                },
                "required": ["job_title", "company_name"]
            }),
        },
        ToolSpec {
            name: "get_applications",
            description: "Get job applications, optionally filtered by status, company, or job title",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "status": { "type": "string", "description": format!("Filter by status ({}, etc.)", status::WELL_KNOWN.join(", ")) },
                    "company_name": { "type": "string", "description": "Filter by company name" },
                    "job_title": { "type": "string", "description": "Filter by job title" },
                    "limit": { "type": "integer", "description": "Maximum number of results", "default": DEFAULT_LIST_LIMIT }
                }
            }),
        },
        ToolSpec {
            name: "get_application",
            description: "Get full details of one job application",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "application_id": { "type": "integer", "description": "Application ID" }
                },
                "required": ["application_id"]
            }),
        },
        ToolSpec {
            name: "update_application_status",
            description: "Update the status of a job application",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "application_id": { "type": "integer", "description": "Application ID" },
                    "new_status": { "type": "string", "description": "New status" },
                    "notes": { "type": "string", "description": "Additional notes about the update" }
                },
                "required": ["application_id", "new_status"]
            }),
        },
        ToolSpec {
            name: "add_resume_version",
            description: "Add a new resume version with text content",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Resume version name (e.g., 'backend-focused', 'frontend-focused', 'senior-level')" },
                    "content": { "type": "string", "description": "Complete resume text content" },
                    "file_path": { "type": "string", "description": "Path to the resume file, if stored on disk" },
                    "description": { "type": "string", "description": "Description of this resume version" },
                    "set_as_default": { "type": "boolean", "description": "Set this resume as the default", "default": false }
                },
                "required": ["name", "content"]
            }),
        },
        ToolSpec {
            name: "set_default_resume",
            description: "Mark an existing resume as the default resume",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "resume_name": { "type": "string", "description": "Name of the resume to set as default" }
                },
                "required": ["resume_name"]
            }),
        },
        ToolSpec {
            name: "get_resume_content",
            description: "Get the content of a specific resume version",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "resume_name": { "type": "string", "description": "Name of the resume to retrieve" }
                },
                "required": ["resume_name"]
            }),
        },
        ToolSpec {
            name: "list_resumes",
            description: "List all resume versions",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolSpec {
            name: "get_application_stats",
            description: "Get statistics about job applications",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dispatcher() -> (TempDir, ToolDispatcher) {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path().join("jobs.db")).unwrap();
        (dir, ToolDispatcher::new(store))
    }

    fn call(d: &ToolDispatcher, name: &str, args: Value) -> ToolReply {
        d.call(name, Some(args)).unwrap()
    }

    #[test]
    fn test_every_advertised_tool_is_dispatched() {
        let (_dir, d) = dispatcher();
        for spec in tool_specs() {
            let result = d.call(spec.name, None);
            assert!(
                !matches!(result, Err(Error::UnknownTool(_))),
                "{} is advertised but not dispatched",
                spec.name
            );
        }
    }

    #[test]
    fn test_unknown_tool() {
        let (_dir, d) = dispatcher();
        assert!(matches!(d.call("delete_everything", None), Err(Error::UnknownTool(_))));
    }

    #[test]
    fn test_add_application_uses_default_resume() {
        let (_dir, d) = dispatcher();
        call(&d, "add_resume_version", json!({ "name": "backend", "content": "resume text", "set_as_default": true }));

        let reply = call(&d, "add_job_application", json!({
            "job_title": "Python Developer",
            "company_name": "TestCorp",
            "application_date": "2024-02-03",
            "job_source": "LinkedIn"
        }));
        assert!(!reply.is_error);
        assert!(reply.text.contains("• Resume: backend"));
        assert!(reply.text.contains("• Date: 2024-02-03"));
        assert!(reply.text.contains("• Status: applied"));

        let reply = call(&d, "add_job_application", json!({
            "job_title": "Python Developer",
            "company_name": "TestCorp",
            "resume_version": "missing"
        }));
        assert!(reply.text.contains("backend ('missing' not found, used default)"));
    }

    #[test]
    fn test_add_application_trims_requested_resume() {
        let (_dir, d) = dispatcher();
        call(&d, "add_resume_version", json!({ "name": "backend", "content": "b", "set_as_default": true }));
        call(&d, "add_resume_version", json!({ "name": "frontend", "content": "f" }));

        let reply = call(&d, "add_job_application", json!({
            "job_title": "UI Developer",
            "company_name": "Acme",
            "resume_version": "frontend "
        }));
        assert!(!reply.is_error);
        assert!(reply.text.contains("• Resume: frontend\n"));
        assert!(!reply.text.contains("not found"));

        let app = d.store().get_application_with_resume(1).unwrap().unwrap();
        assert_eq!(app.resume_name(), Some("frontend"));
    }

    #[test]
    fn test_blank_followup_date_is_ignored() {
        let (_dir, d) = dispatcher();
        let reply = call(&d, "add_job_application", json!({
            "job_title": "Dev",
            "company_name": "Acme",
            "next_followup_date": "  "
        }));
        assert!(!reply.is_error, "{}", reply.text);

        let app = d.store().get_application_with_resume(1).unwrap().unwrap();
        assert_eq!(app.next_followup_date, None);
    }

    #[test]
    fn test_missing_required_argument_is_error_reply() {
        let (_dir, d) = dispatcher();
        let reply = call(&d, "add_job_application", json!({ "job_title": "No company" }));
        assert!(reply.is_error);
        assert!(reply.text.contains("company_name"));
    }

    #[test]
    fn test_bad_date_is_error_reply() {
        let (_dir, d) = dispatcher();
        let reply = call(&d, "add_job_application", json!({
            "job_title": "Dev",
            "company_name": "Acme",
            "application_date": "someday"
        }));
        assert!(reply.is_error);
        assert!(d.store().list_applications_with_resumes().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_resume_is_actionable() {
        let (_dir, d) = dispatcher();
        let args = json!({ "name": "default", "content": "text" });
        assert!(!call(&d, "add_resume_version", args.clone()).is_error);

        let reply = call(&d, "add_resume_version", args);
        assert!(reply.is_error);
        assert!(reply.text.contains("Resume name 'default' already exists"));
    }

    #[test]
    fn test_update_status_reports_transition() {
        let (_dir, d) = dispatcher();
        call(&d, "add_job_application", json!({ "job_title": "Dev", "company_name": "Acme" }));

        let reply = call(&d, "update_application_status", json!({
            "application_id": 1,
            "new_status": "interviewing",
            "notes": "phone screen booked"
        }));
        assert!(!reply.is_error);
        assert!(reply.text.contains("applied → interviewing"));

        let reply = call(&d, "update_application_status", json!({ "application_id": 99, "new_status": "offer" }));
        assert!(reply.is_error);
        assert!(reply.text.contains("Application with ID 99 not found"));
    }

    #[test]
    fn test_get_applications_filters_and_limits() {
        let (_dir, d) = dispatcher();
        for i in 0..3 {
            call(&d, "add_job_application", json!({ "job_title": format!("Dev {}", i), "company_name": "TechCorp Inc" }));
        }
        call(&d, "add_job_application", json!({ "job_title": "Ops", "company_name": "Other", "status": "rejected" }));

        let reply = call(&d, "get_applications", json!({ "company_name": "techcorp", "limit": 2 }));
        assert!(reply.text.starts_with("Showing 2 of 3 application(s)"));

        let reply = call(&d, "get_applications", json!({ "status": "rejected" }));
        assert!(reply.text.starts_with("Found 1 application(s)"));
        assert!(reply.text.contains("**Ops** at **Other**"));

        let reply = call(&d, "get_applications", json!({ "status": "offer" }));
        assert_eq!(reply.text, "No applications found matching your criteria.");
    }

    #[test]
    fn test_set_default_lists_available_on_miss() {
        let (_dir, d) = dispatcher();
        let reply = call(&d, "set_default_resume", json!({ "resume_name": "x" }));
        assert!(reply.text.contains("No resumes found"));

        call(&d, "add_resume_version", json!({ "name": "frontend", "content": "text" }));
        let reply = call(&d, "set_default_resume", json!({ "resume_name": "x" }));
        assert!(reply.is_error);
        assert!(reply.text.contains("• frontend"));

        let reply = call(&d, "set_default_resume", json!({ "resume_name": "frontend" }));
        assert!(!reply.is_error);
        let reply = call(&d, "get_resume_content", json!({ "resume_name": "frontend" }));
        assert!(reply.text.contains("**Resume: frontend (DEFAULT)**"));
    }

    #[test]
    fn test_stats_and_empty_lists() {
        let (_dir, d) = dispatcher();
        assert_eq!(call(&d, "get_application_stats", json!({})).text, "No applications found.");
        assert!(call(&d, "list_resumes", json!({})).text.starts_with("No resume versions found"));

        call(&d, "add_job_application", json!({ "job_title": "Dev", "company_name": "Acme" }));
        let reply = call(&d, "get_application_stats", json!({}));
        assert!(reply.text.contains("**Total Applications:** 1"));
        assert!(reply.text.contains("• No resume: 1"));
    }
}
