//! Plain-text rendering of tool results for the assistant host

use std::fmt::Write;
use crate::model::{JobApplication, ResumeVersion, StatusChange};
use crate::stats::ApplicationStats;
use crate::ui::Icons;

pub fn application_added(app: &JobApplication, requested_resume: Option<&str>) -> String {
    let resume = match (app.resume_name(), requested_resume) {
        (Some(bound), Some(requested)) if bound != requested.trim() => {
            format!("{} ('{}' not found, used default)", bound, requested)
        }
        (Some(bound), _) => bound.to_string(),
        (None, _) => "No resume assigned".to_string(),
    };

    format!(
        "{} Added job application:\n\
         • Job: {}\n\
         • Company: {}\n\
         • Date: {}\n\
         • Status: {}\n\
         • Resume: {}\n\
         • Application ID: {}",
        Icons::CHECK,
        app.job_title,
        app.company_name,
        app.application_date,
        app.status,
        resume,
        app.id
    )
}

/// List of applications; `total` is the match count before any limit
pub fn application_list(apps: &[JobApplication], total: usize) -> String {
    if apps.is_empty() {
        return "No applications found matching your criteria.".to_string();
    }

    let mut out = if total > apps.len() {
        format!("Showing {} of {} application(s):\n\n", apps.len(), total)
    } else {
        format!("Found {} application(s):\n\n", apps.len())
    };

    for app in apps {
        let _ = writeln!(out, "• **{}** at **{}**", app.job_title, app.company_name);
        let _ = writeln!(
            out,
            "  Applied: {} | Status: {} | Resume: {}",
            app.application_date,
            app.status,
            app.resume_name().unwrap_or("No resume")
        );
        if let Some(salary) = &app.salary_range {
            let _ = writeln!(out, "  Salary: {}", salary);
        }
        if let Some(notes) = &app.notes {
            let _ = writeln!(out, "  Notes: {}", notes);
        }
        let _ = writeln!(out, "  ID: {}\n", app.id);
    }
    out
}

pub fn application_detail(app: &JobApplication) -> String {
    let mut out = format!("**{}** at **{}**\n", app.job_title, app.company_name);
    let _ = writeln!(out, "• Applied: {}", app.application_date);
    let _ = writeln!(out, "• Status: {}", app.status);
    let _ = writeln!(out, "• Resume: {}", app.resume_name().unwrap_or("No resume"));

    let optional = [
        ("Location", app.location.as_deref()),
        ("Salary", app.salary_range.as_deref()),
        ("Source", app.job_source.as_deref()),
        ("URL", app.job_url.as_deref()),
        ("Recruiter", app.recruiter_name.as_deref()),
        ("Recruiter email", app.recruiter_email.as_deref()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "• {}: {}", label, value);
        }
    }
    if let Some(followup) = app.next_followup_date {
        let _ = writeln!(out, "• Next follow-up: {}", followup);
    }
    if let Some(notes) = &app.notes {
        let _ = writeln!(out, "• Notes:\n{}", notes);
    }
    let _ = write!(out, "• Application ID: {}", app.id);
    out
}

pub fn application_not_found(id: i64) -> String {
    format!("{} Application with ID {} not found.", Icons::CROSS, id)
}

pub fn status_updated(change: &StatusChange) -> String {
    let app = &change.application;
    format!(
        "{} Updated application status:\n\
         • Job: {} at {}\n\
         • Status: {} → {}\n\
         • Application ID: {}",
        Icons::CHECK,
        app.job_title,
        app.company_name,
        change.previous_status,
        app.status,
        app.id
    )
}

pub fn resume_added(resume: &ResumeVersion) -> String {
    let default_status = if resume.is_default { " and set as DEFAULT" } else { "" };
    format!(
        "{} Added resume version:\n\
         • Name: {}{}\n\
         • Description: {}\n\
         • Content length: {} characters\n\
         • Resume ID: {}",
        Icons::CHECK,
        resume.name,
        default_status,
        resume.description.as_deref().unwrap_or("None"),
        resume.content_len(),
        resume.id
    )
}

pub fn resume_exists(name: &str) -> String {
    format!(
        "{} Resume name '{}' already exists. Please use a different name or update the existing resume.",
        Icons::CROSS,
        name
    )
}

pub fn default_resume_set(name: &str) -> String {
    format!(
        "{} Resume '{}' is now set as the DEFAULT resume.\n\
         It will be automatically used for new job applications unless specified otherwise.",
        Icons::CHECK,
        name
    )
}

/// Missing resume, with the names that do exist
pub fn resume_not_found(name: &str, available: &[ResumeVersion]) -> String {
    if available.is_empty() {
        return format!(
            "{} No resumes found. Please add a resume first using add_resume_version.",
            Icons::CROSS
        );
    }

    let names: Vec<String> = available.iter().map(|r| format!("• {}", r.name)).collect();
    format!(
        "{} Resume '{}' not found. Available resumes:\n{}",
        Icons::CROSS,
        name,
        names.join("\n")
    )
}

pub fn resume_content(resume: &ResumeVersion) -> String {
    let default_marker = if resume.is_default { " (DEFAULT)" } else { "" };
    let mut out = format!(
        "**Resume: {}{}**\n\n**Description:** {}\n\n",
        resume.name,
        default_marker,
        resume.description.as_deref().unwrap_or("None")
    );

    if let Some(path) = &resume.file_path {
        let _ = write!(out, "**File:** {}\n\n", path);
    }
    let _ = write!(
        out,
        "**Content:**\n```\n{}\n```",
        resume.content.as_deref().unwrap_or("")
    );
    out
}

pub fn resume_list(resumes: &[ResumeVersion]) -> String {
    if resumes.is_empty() {
        return "No resume versions found. Add your first resume using add_resume_version.".to_string();
    }

    let mut out = format!("Found {} resume version(s):\n\n", resumes.len());
    for resume in resumes {
        let default_marker = if resume.is_default {
            format!(" {} (DEFAULT)", Icons::STAR)
        } else {
            String::new()
        };
        let _ = writeln!(out, "• **{}**{}", resume.name, default_marker);
        if let Some(description) = &resume.description {
            let _ = writeln!(out, "  Description: {}", description);
        }
        let _ = writeln!(out, "  Created: {}", resume.created_at.format("%Y-%m-%d"));
        let _ = writeln!(out, "  ID: {}\n", resume.id);
    }
    out
}

pub fn stats(stats: &ApplicationStats) -> String {
    if stats.is_empty() {
        return "No applications found.".to_string();
    }

    let mut out = format!("{} **Job Application Statistics**\n\n", Icons::STATS);
    let _ = writeln!(out, "**Total Applications:** {}\n", stats.total);

    out.push_str("**By Status:**\n");
    for (status, count) in &stats.by_status {
        let _ = writeln!(out, "• {}: {}", status, count);
    }

    out.push_str("\n**Top Companies:**\n");
    for (company, count) in &stats.top_companies {
        let _ = writeln!(out, "• {}: {}", company, count);
    }

    out.push_str("\n**By Resume Version:**\n");
    for (resume, count) in &stats.by_resume {
        let _ = writeln!(out, "• {}: {}", resume, count);
    }
    out
}

pub fn error(err: &crate::Error) -> String {
    format!("{} Error: {}", Icons::CROSS, err)
}
