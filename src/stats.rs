//! Application statistics - counts by status, company and resume

use std::collections::{BTreeMap, HashMap};
use serde::Serialize;
use crate::model::JobApplication;

/// Label used for applications without a bound resume
pub const NO_RESUME_LABEL: &str = "No resume";

/// Number of companies listed in `top_companies`
pub const TOP_COMPANIES: usize = 5;

/// Aggregate counts over a set of applications
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    /// Sorted by status name
    pub by_status: BTreeMap<String, usize>,
    /// Most applied-to companies, highest count first, ties by name
    pub top_companies: Vec<(String, usize)>,
    /// Sorted by resume name
    pub by_resume: BTreeMap<String, usize>,
}

impl ApplicationStats {
    pub fn from_applications(applications: &[JobApplication]) -> Self {
        let mut by_status = BTreeMap::new();
        let mut by_company: HashMap<&str, usize> = HashMap::new();
        let mut by_resume = BTreeMap::new();

        for app in applications {
            *by_status.entry(app.status.clone()).or_insert(0) += 1;
            *by_company.entry(app.company_name.as_str()).or_insert(0) += 1;
            let resume = app.resume_name().unwrap_or(NO_RESUME_LABEL);
            *by_resume.entry(resume.to_string()).or_insert(0) += 1;
        }

        let mut top_companies: Vec<(String, usize)> = by_company
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        top_companies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_companies.truncate(TOP_COMPANIES);

        Self {
            total: applications.len(),
            by_status,
            top_companies,
            by_resume,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl std::fmt::Display for ApplicationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Application Statistics:")?;
        writeln!(f, "  Total: {}", self.total)?;
        writeln!(f, "  By status:")?;
        for (status, count) in &self.by_status {
            writeln!(f, "    {}: {}", status, count)?;
        }
        writeln!(f, "  Top companies:")?;
        for (company, count) in &self.top_companies {
            writeln!(f, "    {}: {}", company, count)?;
        }
        writeln!(f, "  By resume:")?;
        for (resume, count) in &self.by_resume {
            writeln!(f, "    {}: {}", resume, count)?;
        }
        Ok(())
    }
}
