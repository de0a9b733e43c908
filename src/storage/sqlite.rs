//! SQLite storage implementation
//!
//! Every public method is one unit of work: it opens its own connection,
//! runs inside a single transaction and commits or rolls back before
//! returning. `JobStore` itself only holds the database location, so clones
//! can be used from several threads at once.

use std::path::{Path, PathBuf};
use std::time::Duration;
use chrono::{NaiveDate, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use crate::{Error, Result};
use crate::dates::today;
use crate::model::{validate_status, JobApplication, NewJobApplication, NewResume, ResumeVersion, StatusChange};
use super::schema;

/// Name of the resume created when a default is needed but none exists
pub const PLACEHOLDER_RESUME_NAME: &str = "default";
const PLACEHOLDER_RESUME_CONTENT: &str = "This is a placeholder for your default resume content.";
const PLACEHOLDER_RESUME_DESCRIPTION: &str = "Default resume - please update with your actual resume content";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const RESUME_SELECT_SQL: &str =
    "SELECT id, name, content, file_path, description, is_default, created_at FROM resume_versions";

const APPLICATION_SELECT_SQL: &str = "SELECT
    a.id, a.job_title, a.company_name, a.application_date, a.status,
    a.job_url, a.salary_range, a.location, a.job_source,
    a.recruiter_name, a.recruiter_email, a.next_followup_date, a.notes,
    a.created_at, a.updated_at,
    r.id, r.name, r.content, r.file_path, r.description, r.is_default, r.created_at
FROM job_applications a
LEFT JOIN resume_versions r ON r.id = a.resume_version_id";

const APPLICATION_ORDER_SQL: &str = "ORDER BY a.application_date DESC, a.id DESC";

/// Column index where the joined resume starts in `APPLICATION_SELECT_SQL`
const JOINED_RESUME_COLUMN: usize = 15;

const CLEAR_DEFAULT_SQL: &str = "UPDATE resume_versions SET is_default = 0 WHERE is_default = 1";

/// SQLite-backed store for resume versions and job applications
#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    /// Open a database file (creates it and the schema if missing)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { path };
        store.create_schema()?;
        Ok(store)
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create both tables and their indexes if absent. Safe to call repeatedly.
    pub fn create_schema(&self) -> Result<()> {
        self.write(|tx| {
            for stmt in schema::all_schema_statements() {
                tx.execute(stmt, [])?;
            }
            Ok(())
        })
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // LIKE only folds ASCII; casefold() lowercases the full Unicode range
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|value| value.to_lowercase())),
        )?;
        Ok(conn)
    }

    /// Run `f` in an immediate write transaction; an error drops (rolls back) it.
    fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.connect()?;
        f(&conn)
    }

    // ========== Resume Operations ==========

    /// Add a resume version.
    ///
    /// When `is_default` is set, every other resume loses the flag in the
    /// same transaction. Fails with `Error::DuplicateName` if the name exists.
    pub fn add_resume(&self, resume: &NewResume) -> Result<ResumeVersion> {
        resume.validate()?;
        self.write(|tx| {
            if resume.is_default {
                tx.execute(CLEAR_DEFAULT_SQL, [])?;
            }
            Self::insert_resume(tx, resume)
        })
    }

    /// Get the default resume version
    pub fn get_default_resume(&self) -> Result<Option<ResumeVersion>> {
        self.read(Self::query_default_resume)
    }

    /// Get the default resume, creating the `default` placeholder if none exists.
    pub fn get_or_create_default_resume(&self) -> Result<ResumeVersion> {
        let placeholder = NewResume::new(PLACEHOLDER_RESUME_NAME)
            .with_content(PLACEHOLDER_RESUME_CONTENT)
            .with_description(PLACEHOLDER_RESUME_DESCRIPTION)
            .as_default();

        let created = self.write(|tx| match Self::query_default_resume(tx)? {
            Some(existing) => Ok(existing),
            None => Self::insert_resume(tx, &placeholder),
        });

        match created {
            Ok(resume) => Ok(resume),
            // Another writer inserted the placeholder first, or a non-default
            // resume already uses the name.
            Err(Error::DuplicateName(_)) => {
                if let Some(resume) = self.get_default_resume()? {
                    return Ok(resume);
                }
                self.set_default_resume(PLACEHOLDER_RESUME_NAME)?;
                self.get_default_resume()?
                    .ok_or_else(|| Error::ResumeNotFound(PLACEHOLDER_RESUME_NAME.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Get a resume version by name
    pub fn get_resume_by_name(&self, name: &str) -> Result<Option<ResumeVersion>> {
        self.read(|conn| Self::query_resume_by_name(conn, name))
    }

    /// List all resume versions, most recently created first
    pub fn list_resumes(&self) -> Result<Vec<ResumeVersion>> {
        self.read(|conn| {
            let mut stmt = conn.prepare(&format!("{RESUME_SELECT_SQL} ORDER BY created_at DESC, id DESC"))?;
            let resumes = stmt
                .query_map([], |row| Self::row_to_resume(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(resumes)
        })
    }

    /// Make the named resume the only default.
    ///
    /// Returns `false` (and leaves every flag untouched) when no resume has
    /// that name.
    pub fn set_default_resume(&self, name: &str) -> Result<bool> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(CLEAR_DEFAULT_SQL, [])?;
        let changed = tx.execute(
            "UPDATE resume_versions SET is_default = 1 WHERE name = ?1",
            [name.trim()],
        )?;

        if changed == 0 {
            tx.rollback()?;
            return Ok(false);
        }

        tx.commit()?;
        Ok(true)
    }

    fn insert_resume(conn: &Connection, resume: &NewResume) -> Result<ResumeVersion> {
        let name = resume.name.trim();
        conn.execute(
            r#"
            INSERT INTO resume_versions (name, file_path, content, description, is_default, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                name,
                resume.file_path,
                resume.content,
                resume.description,
                resume.is_default,
                Utc::now(),
            ],
        )
        .map_err(|e| duplicate_name_or_storage(e, name))?;

        let id = conn.last_insert_rowid();
        let resume = conn.query_row(
            &format!("{RESUME_SELECT_SQL} WHERE id = ?1"),
            [id],
            |row| Self::row_to_resume(row, 0),
        )?;
        Ok(resume)
    }

    fn query_default_resume(conn: &Connection) -> Result<Option<ResumeVersion>> {
        conn.query_row(
            &format!("{RESUME_SELECT_SQL} WHERE is_default = 1 LIMIT 1"),
            [],
            |row| Self::row_to_resume(row, 0),
        )
        .optional()
        .map_err(Into::into)
    }

    fn query_resume_by_name(conn: &Connection, name: &str) -> Result<Option<ResumeVersion>> {
        conn.query_row(
            &format!("{RESUME_SELECT_SQL} WHERE name = ?1"),
            [name.trim()],
            |row| Self::row_to_resume(row, 0),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Helper to convert a row to a ResumeVersion, starting at column `base`
    fn row_to_resume(row: &Row, base: usize) -> rusqlite::Result<ResumeVersion> {
        Ok(ResumeVersion {
            id: row.get(base)?,
            name: row.get(base + 1)?,
            content: row.get(base + 2)?,
            file_path: row.get(base + 3)?,
            description: row.get(base + 4)?,
            is_default: row.get(base + 5)?,
            created_at: row.get(base + 6)?,
        })
    }

    // ========== Application Operations ==========

    /// Add a job application.
    ///
    /// Resume binding: the named resume if it exists, otherwise the current
    /// default resume, otherwise none. The returned record has the resume
    /// already loaded.
    pub fn add_job_application(&self, app: &NewJobApplication) -> Result<JobApplication> {
        app.validate()?;
        self.write(|tx| {
            let requested = app
                .resume_version_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty());

            let resume = match requested {
                Some(name) => match Self::query_resume_by_name(tx, name)? {
                    Some(found) => Some(found),
                    None => Self::query_default_resume(tx)?,
                },
                None => Self::query_default_resume(tx)?,
            };
            let resume_id = resume.as_ref().map(|r| r.id);
            let now = Utc::now();

            tx.execute(
                r#"
                INSERT INTO job_applications (
                    job_title, company_name, application_date, status, job_url,
                    salary_range, location, job_source, recruiter_name, recruiter_email,
                    next_followup_date, notes, resume_version_id, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
                params![
                    app.job_title.trim(),
                    app.company_name.trim(),
                    app.application_date,
                    app.status.trim(),
                    app.job_url,
                    app.salary_range,
                    app.location,
                    app.job_source,
                    app.recruiter_name,
                    app.recruiter_email,
                    app.next_followup_date,
                    app.notes,
                    resume_id,
                    now,
                    now,
                ],
            )?;

            let id = tx.last_insert_rowid();
            Self::query_application(tx, id)?.ok_or(Error::ApplicationNotFound(id))
        })
    }

    /// Get one application with its resume loaded
    pub fn get_application_with_resume(&self, id: i64) -> Result<Option<JobApplication>> {
        self.read(|conn| Self::query_application(conn, id))
    }

    /// All applications, most recent application date first
    pub fn list_applications_with_resumes(&self) -> Result<Vec<JobApplication>> {
        self.read(|conn| Self::query_applications(conn, "", Vec::new()))
    }

    /// Applications whose status equals `status` exactly
    pub fn get_applications_by_status(&self, status: &str) -> Result<Vec<JobApplication>> {
        self.read(|conn| {
            Self::query_applications(conn, "WHERE a.status = ?1", vec![status.to_string()])
        })
    }

    /// Case-insensitive substring search on company name and/or job title.
    ///
    /// Both filters must match when both are given; blank filters are ignored.
    pub fn search_applications(
        &self,
        company_name: Option<&str>,
        job_title: Option<&str>,
    ) -> Result<Vec<JobApplication>> {
        let mut clauses = Vec::new();
        let mut bind_values = Vec::new();

        let filters = [("a.company_name", company_name), ("a.job_title", job_title)];
        for (column, value) in filters {
            if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                bind_values.push(like_pattern(&value.to_lowercase()));
                clauses.push(format!("casefold({column}) LIKE ?{} ESCAPE '\\'", bind_values.len()));
            }
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        self.read(|conn| Self::query_applications(conn, &where_sql, bind_values))
    }

    /// Set a new status and append a dated note.
    ///
    /// The note is added as `[YYYY-MM-DD] note` on its own line; earlier
    /// notes are kept. Returns the previous status with the updated record.
    pub fn update_application_status(
        &self,
        id: i64,
        new_status: &str,
        note: Option<&str>,
    ) -> Result<StatusChange> {
        validate_status(new_status)?;
        self.write(|tx| {
            let (previous_status, notes): (String, Option<String>) = tx
                .query_row(
                    "SELECT status, notes FROM job_applications WHERE id = ?1",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
                .ok_or(Error::ApplicationNotFound(id))?;

            let notes = match note.map(str::trim).filter(|n| !n.is_empty()) {
                Some(note) => Some(append_note(notes.as_deref(), note, today())),
                None => notes,
            };

            tx.execute(
                "UPDATE job_applications SET status = ?1, notes = ?2, updated_at = ?3 WHERE id = ?4",
                params![new_status.trim(), notes, Utc::now(), id],
            )?;

            let application = Self::query_application(tx, id)?.ok_or(Error::ApplicationNotFound(id))?;
            Ok(StatusChange { previous_status, application })
        })
    }

    fn query_application(conn: &Connection, id: i64) -> Result<Option<JobApplication>> {
        conn.query_row(
            &format!("{APPLICATION_SELECT_SQL} WHERE a.id = ?1"),
            [id],
            Self::row_to_application,
        )
        .optional()
        .map_err(Into::into)
    }

    fn query_applications(
        conn: &Connection,
        where_sql: &str,
        bind_values: Vec<String>,
    ) -> Result<Vec<JobApplication>> {
        let sql = format!("{APPLICATION_SELECT_SQL} {where_sql} {APPLICATION_ORDER_SQL}");
        let mut stmt = conn.prepare(&sql)?;
        let applications = stmt
            .query_map(params_from_iter(bind_values.iter()), Self::row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(applications)
    }

    /// Helper to convert a joined row to a JobApplication
    fn row_to_application(row: &Row) -> rusqlite::Result<JobApplication> {
        let resume_id: Option<i64> = row.get(JOINED_RESUME_COLUMN)?;
        let resume = match resume_id {
            Some(_) => Some(Self::row_to_resume(row, JOINED_RESUME_COLUMN)?),
            None => None,
        };

        Ok(JobApplication {
            id: row.get(0)?,
            job_title: row.get(1)?,
            company_name: row.get(2)?,
            application_date: row.get(3)?,
            status: row.get(4)?,
            job_url: row.get(5)?,
            salary_range: row.get(6)?,
            location: row.get(7)?,
            job_source: row.get(8)?,
            recruiter_name: row.get(9)?,
            recruiter_email: row.get(10)?,
            next_followup_date: row.get(11)?,
            notes: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
            resume,
        })
    }
}

/// Unique violations on `resume_versions.name` become `Error::DuplicateName`
fn duplicate_name_or_storage(err: rusqlite::Error, name: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains("resume_versions.name") =>
        {
            Error::DuplicateName(name.to_string())
        }
        _ => Error::Storage(err),
    }
}

/// `%value%` with LIKE wildcards in `value` escaped by `\`
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn append_note(existing: Option<&str>, note: &str, on: NaiveDate) -> String {
    let entry = format!("[{}] {}", on.format("%Y-%m-%d"), note);
    match existing.filter(|e| !e.is_empty()) {
        Some(existing) => format!("{existing}\n{entry}"),
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, JobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path().join("jobs.db")).unwrap();
        (dir, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defaults(store: &JobStore) -> Vec<String> {
        store
            .list_resumes()
            .unwrap()
            .into_iter()
            .filter(|r| r.is_default)
            .map(|r| r.name)
            .collect()
    }

    #[test]
    fn test_create_schema_is_idempotent() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("base").with_content("text")).unwrap();

        store.create_schema().unwrap();
        store.create_schema().unwrap();

        assert_eq!(store.list_resumes().unwrap().len(), 1);
        let reopened = JobStore::open(store.path()).unwrap();
        assert!(reopened.get_resume_by_name("base").unwrap().is_some());
    }

    #[test]
    fn test_single_default_invariant() {
        let (_dir, store) = temp_store();

        store.add_resume(&NewResume::new("A").with_content("a").as_default()).unwrap();
        assert_eq!(defaults(&store), vec!["A"]);

        store.add_resume(&NewResume::new("B").with_content("b").as_default()).unwrap();
        assert_eq!(defaults(&store), vec!["B"]);

        store.add_resume(&NewResume::new("C").with_content("c")).unwrap();
        assert_eq!(defaults(&store), vec!["B"]);

        assert!(store.set_default_resume("A").unwrap());
        assert_eq!(defaults(&store), vec!["A"]);
        assert_eq!(store.get_default_resume().unwrap().unwrap().name, "A");
    }

    #[test]
    fn test_set_default_missing_name_has_no_effect() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("A").as_default()).unwrap();

        assert!(!store.set_default_resume("nonexistent").unwrap());
        assert_eq!(defaults(&store), vec!["A"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_dir, store) = temp_store();
        let first = store
            .add_resume(&NewResume::new("default").with_content("original").as_default())
            .unwrap();

        let err = store
            .add_resume(&NewResume::new("default").with_content("second").as_default())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(ref name) if name == "default"));

        let resumes = store.list_resumes().unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0], first);
        assert!(resumes[0].is_default);
    }

    #[test]
    fn test_list_resumes_newest_first() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("first")).unwrap();
        store.add_resume(&NewResume::new("second")).unwrap();
        store.add_resume(&NewResume::new("third")).unwrap();

        let names: Vec<_> = store.list_resumes().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_get_or_create_default_resume() {
        let (_dir, store) = temp_store();

        let created = store.get_or_create_default_resume().unwrap();
        assert_eq!(created.name, PLACEHOLDER_RESUME_NAME);
        assert!(created.is_default);
        assert_eq!(created.content.as_deref(), Some(PLACEHOLDER_RESUME_CONTENT));

        let again = store.get_or_create_default_resume().unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(store.list_resumes().unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_keeps_existing_default() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("backend").as_default()).unwrap();

        let resume = store.get_or_create_default_resume().unwrap();
        assert_eq!(resume.name, "backend");
        assert_eq!(store.list_resumes().unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_promotes_existing_placeholder_name() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new(PLACEHOLDER_RESUME_NAME).with_content("mine")).unwrap();

        let resume = store.get_or_create_default_resume().unwrap();
        assert_eq!(resume.name, PLACEHOLDER_RESUME_NAME);
        assert!(resume.is_default);
        assert_eq!(resume.content.as_deref(), Some("mine"));
        assert_eq!(store.list_resumes().unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_concurrent_callers_share_one_placeholder() {
        let (_dir, store) = temp_store();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.get_or_create_default_resume().unwrap().id)
            })
            .collect();
        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.list_resumes().unwrap().len(), 1);
    }

    #[test]
    fn test_application_binds_default_resume() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("D").with_content("d").as_default()).unwrap();
        store.add_resume(&NewResume::new("other").with_content("o")).unwrap();

        let app = store
            .add_job_application(&NewJobApplication::new("X", "Y", date(2024, 1, 10)))
            .unwrap();
        assert_eq!(app.resume_name(), Some("D"));

        let explicit = store
            .add_job_application(&NewJobApplication::new("X", "Y", date(2024, 1, 10)).with_resume("other"))
            .unwrap();
        assert_eq!(explicit.resume_name(), Some("other"));

        let named_default = store
            .add_job_application(&NewJobApplication::new("X", "Y", date(2024, 1, 10)).with_resume("D"))
            .unwrap();
        assert_eq!(named_default.resume_name(), Some("D"));
    }

    #[test]
    fn test_unknown_resume_name_falls_back_to_default() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("D").as_default()).unwrap();

        let app = store
            .add_job_application(
                &NewJobApplication::new("X", "Y", date(2024, 1, 10)).with_resume("nonexistent"),
            )
            .unwrap();
        assert_eq!(app.resume_name(), Some("D"));
    }

    #[test]
    fn test_application_without_any_resume_is_unbound() {
        let (_dir, store) = temp_store();

        let app = store
            .add_job_application(
                &NewJobApplication::new("X", "Y", date(2024, 1, 10)).with_resume("nonexistent"),
            )
            .unwrap();
        assert!(app.resume.is_none());

        let loaded = store.get_application_with_resume(app.id).unwrap().unwrap();
        assert_eq!(loaded, app);
    }

    #[test]
    fn test_get_application_with_resume_missing() {
        let (_dir, store) = temp_store();
        assert!(store.get_application_with_resume(42).unwrap().is_none());
    }

    #[test]
    fn test_update_status_appends_note() {
        let (_dir, store) = temp_store();
        let app = store
            .add_job_application(&NewJobApplication::new("X", "Y", date(2024, 1, 10)).with_notes("foo"))
            .unwrap();

        let change = store
            .update_application_status(app.id, "interviewing", Some("called back"))
            .unwrap();

        assert_eq!(change.previous_status, "applied");
        assert_eq!(change.application.status, "interviewing");
        let notes = change.application.notes.unwrap();
        assert!(notes.starts_with("foo"));
        assert!(notes.ends_with(&format!("\n[{}] called back", today().format("%Y-%m-%d"))));
        assert!(change.application.updated_at >= app.updated_at);
    }

    #[test]
    fn test_update_status_without_note_keeps_notes() {
        let (_dir, store) = temp_store();
        let app = store
            .add_job_application(&NewJobApplication::new("X", "Y", date(2024, 1, 10)))
            .unwrap();

        let change = store.update_application_status(app.id, "rejected", None).unwrap();
        assert!(change.application.notes.is_none());

        let change = store
            .update_application_status(app.id, "offer", Some("surprise"))
            .unwrap();
        assert_eq!(change.previous_status, "rejected");
        assert_eq!(
            change.application.notes.unwrap(),
            format!("[{}] surprise", today().format("%Y-%m-%d"))
        );
    }

    #[test]
    fn test_update_status_not_found() {
        let (_dir, store) = temp_store();
        let err = store.update_application_status(7, "offer", None).unwrap_err();
        assert!(matches!(err, Error::ApplicationNotFound(7)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_dir, store) = temp_store();
        store
            .add_job_application(&NewJobApplication::new("Senior Python Developer", "TechCorp Inc", date(2024, 1, 10)))
            .unwrap();
        store
            .add_job_application(&NewJobApplication::new("Rust Engineer", "Other Co", date(2024, 1, 11)))
            .unwrap();

        let found = store.search_applications(Some("techcorp"), None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company_name, "TechCorp Inc");

        let found = store.search_applications(None, Some("ENGINEER")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company_name, "Other Co");
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let (_dir, store) = temp_store();
        store
            .add_job_application(&NewJobApplication::new("Développeur Rust", "Société Générale", date(2024, 3, 1)))
            .unwrap();
        store
            .add_job_application(&NewJobApplication::new("Rust Engineer", "Other Co", date(2024, 3, 2)))
            .unwrap();

        for query in ["société", "SOCIÉTÉ", "GÉNÉRALE"] {
            let found = store.search_applications(Some(query), None).unwrap();
            assert_eq!(found.len(), 1, "query {query}");
            assert_eq!(found[0].company_name, "Société Générale");
        }

        let found = store.search_applications(None, Some("DÉVELOPPEUR")).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_search_combines_filters_and_escapes_wildcards() {
        let (_dir, store) = temp_store();
        store
            .add_job_application(&NewJobApplication::new("Backend Engineer", "Acme", date(2024, 1, 10)))
            .unwrap();
        store
            .add_job_application(&NewJobApplication::new("Frontend Engineer", "Acme", date(2024, 1, 11)))
            .unwrap();

        let found = store.search_applications(Some("acme"), Some("backend")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].job_title, "Backend Engineer");

        assert!(store.search_applications(Some("%"), None).unwrap().is_empty());
        assert_eq!(store.search_applications(Some("  "), None).unwrap().len(), 2);
    }

    #[test]
    fn test_listing_orders_by_application_date() {
        let (_dir, store) = temp_store();
        store.add_job_application(&NewJobApplication::new("old", "A", date(2023, 5, 1))).unwrap();
        store.add_job_application(&NewJobApplication::new("new", "B", date(2024, 2, 1))).unwrap();
        store.add_job_application(&NewJobApplication::new("mid", "C", date(2023, 12, 1))).unwrap();

        let titles: Vec<_> = store
            .list_applications_with_resumes()
            .unwrap()
            .into_iter()
            .map(|a| a.job_title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_applications_by_status_exact_match() {
        let (_dir, store) = temp_store();
        store.add_resume(&NewResume::new("D").as_default()).unwrap();
        store.add_job_application(&NewJobApplication::new("a", "A", date(2024, 1, 1))).unwrap();
        store
            .add_job_application(&NewJobApplication::new("b", "B", date(2024, 1, 2)).with_status("interviewing"))
            .unwrap();

        let interviewing = store.get_applications_by_status("interviewing").unwrap();
        assert_eq!(interviewing.len(), 1);
        assert_eq!(interviewing[0].job_title, "b");
        assert_eq!(interviewing[0].resume_name(), Some("D"));

        assert!(store.get_applications_by_status("interview").unwrap().is_empty());
    }

    #[test]
    fn test_append_note() {
        let on = date(2024, 3, 9);
        assert_eq!(append_note(None, "hi", on), "[2024-03-09] hi");
        assert_eq!(append_note(Some(""), "hi", on), "[2024-03-09] hi");
        assert_eq!(append_note(Some("foo"), "hi", on), "foo\n[2024-03-09] hi");
    }
}
