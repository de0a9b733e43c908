//! Database schema definitions

/// SQL to create the resume_versions table
pub const CREATE_RESUME_VERSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS resume_versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    file_path TEXT,
    content TEXT,
    description TEXT,
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the job_applications table
pub const CREATE_JOB_APPLICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS job_applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_title TEXT NOT NULL,
    company_name TEXT NOT NULL,
    application_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'applied',
    job_url TEXT,
    salary_range TEXT,
    location TEXT,
    job_source TEXT,
    recruiter_name TEXT,
    recruiter_email TEXT,
    next_followup_date TEXT,
    notes TEXT,
    resume_version_id INTEGER REFERENCES resume_versions(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// At most one row may carry `is_default = 1`
pub const CREATE_SINGLE_DEFAULT_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_resume_versions_single_default ON resume_versions(is_default) WHERE is_default = 1";

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    CREATE_SINGLE_DEFAULT_INDEX,
    "CREATE INDEX IF NOT EXISTS idx_applications_status ON job_applications(status)",
    "CREATE INDEX IF NOT EXISTS idx_applications_date ON job_applications(application_date)",
    "CREATE INDEX IF NOT EXISTS idx_applications_resume ON job_applications(resume_version_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_RESUME_VERSIONS_TABLE,
        CREATE_JOB_APPLICATIONS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
