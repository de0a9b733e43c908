use tabled::{settings::Style, Table, Tabled};
use crate::model::{JobApplication, ResumeVersion};
use crate::ui::output::status_label;
use crate::ui::Icons;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Applied")]
    applied: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Resume")]
    resume: String,
}

pub fn application_table(apps: &[JobApplication]) -> String {
    let rows: Vec<ApplicationRow> = apps
        .iter()
        .map(|app| ApplicationRow {
            id: app.id,
            applied: app.application_date.to_string(),
            title: app.job_title.clone(),
            company: app.company_name.clone(),
            status: status_label(&app.status),
            resume: app.resume_name().unwrap_or("-").to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct ResumeRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Chars")]
    chars: usize,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn resume_table(resumes: &[ResumeVersion]) -> String {
    let rows: Vec<ResumeRow> = resumes
        .iter()
        .map(|resume| ResumeRow {
            id: resume.id,
            name: resume.name.clone(),
            default: if resume.is_default { Icons::STAR.to_string() } else { String::new() },
            chars: resume.content_len(),
            created: resume.created_at.format("%Y-%m-%d").to_string(),
            description: resume.description.clone().unwrap_or_default(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
