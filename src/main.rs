//! Jobtrack CLI - job application tracker and MCP server

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use jobtrack::config::{self, JobtrackConfig};
use jobtrack::storage::JobStore;
use jobtrack::{ui, ApplicationStats, Error, NewResume};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(version)]
#[command(about = "Track job applications and resume versions, and expose them to AI assistants over MCP")]
#[command(long_about = r#"
Jobtrack keeps a local SQLite record of your job applications and the
resume versions you used, and serves them as MCP tools so an assistant can
add applications, update statuses and answer questions about your search.

Example usage:
  jobtrack init
  jobtrack seed-resume --file resume.txt
  jobtrack serve
  jobtrack apps --status interviewing
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config and JOBTRACK_DATABASE)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load a resume file as the default resume
    SeedResume {
        /// Resume version name
        #[arg(short, long, default_value = jobtrack::storage::PLACEHOLDER_RESUME_NAME)]
        name: String,

        /// Text file with the resume content; without it a placeholder default is ensured
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Description of this resume version
        #[arg(long)]
        description: Option<String>,
    },

    /// List resume versions
    Resumes,

    /// List job applications
    Apps {
        /// Only applications with this exact status
        #[arg(short, long)]
        status: Option<String>,

        /// Company name contains (case-insensitive)
        #[arg(long)]
        company: Option<String>,

        /// Job title contains (case-insensitive)
        #[arg(long)]
        title: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show application statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    init_logging(cli.verbose, config.as_ref())?;

    let cwd = std::env::current_dir()?;
    let database = config::resolve_database_path(
        cli.database.as_deref(),
        std::env::var(config::DATABASE_ENV_VAR).ok(),
        config.as_ref(),
        &cwd,
    );
    tracing::debug!("Using database {:?}", database);

    match cli.command {
        Commands::Serve => {
            let store = JobStore::open(&database)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(jobtrack::server::serve_stdio(store))?;
        }

        Commands::Init { force } => {
            let config_path = cli.config.unwrap_or_else(config::default_config_path);
            let new_config = JobtrackConfig {
                database: Some(relative_to(&database, &cwd)),
                ..config.unwrap_or_default()
            };
            config::write_config(&config_path, &new_config, force)?;

            let store = JobStore::open(&database)?;
            ui::success("Jobtrack initialized");
            ui::info("Config", &config_path.display().to_string());
            ui::info("Database", &store.path().display().to_string());
        }

        Commands::SeedResume { name, file, description } => {
            let store = JobStore::open(&database)?;
            seed_resume(&store, name, file.as_deref(), description)?;
        }

        Commands::Resumes => {
            let store = JobStore::open(&database)?;
            let resumes = store.list_resumes()?;
            if resumes.is_empty() {
                ui::warn("No resume versions found. Add one with `jobtrack seed-resume`.");
            } else {
                ui::header(&format!("{} resume version(s)", resumes.len()));
                println!("{}", ui::resume_table(&resumes));
            }
        }

        Commands::Apps { status, company, title, limit } => {
            let store = JobStore::open(&database)?;
            let mut apps = if let Some(status) = status {
                store.get_applications_by_status(&status)?
            } else if company.is_some() || title.is_some() {
                store.search_applications(company.as_deref(), title.as_deref())?
            } else {
                store.list_applications_with_resumes()?
            };

            if apps.is_empty() {
                ui::warn("No applications found matching your criteria.");
            } else {
                let total = apps.len();
                apps.truncate(limit);
                ui::header(&format!("Showing {} of {} application(s)", apps.len(), total));
                println!("{}", ui::application_table(&apps));
            }
        }

        Commands::Stats => {
            let store = JobStore::open(&database)?;
            let stats = ApplicationStats::from_applications(&store.list_applications_with_resumes()?);
            print_stats(&stats);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, config: Option<&JobtrackConfig>) -> anyhow::Result<()> {
    let level = config.and_then(|c| c.log_level.as_deref()).unwrap_or("info");
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // stdout belongs to the MCP protocol, so logs go to stderr
    let file_layer = match config.and_then(|c| c.log_file.as_ref()) {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    Ok(())
}

fn seed_resume(
    store: &JobStore,
    name: String,
    file: Option<&Path>,
    description: Option<String>,
) -> anyhow::Result<()> {
    let Some(file) = file else {
        let resume = store.get_or_create_default_resume()?;
        ui::success(&format!("Default resume: {} (ID: {})", resume.name, resume.id));
        return Ok(());
    };

    let content = std::fs::read_to_string(file)?;
    let mut new_resume = NewResume::new(name)
        .with_content(content.trim())
        .with_file_path(file.display().to_string())
        .as_default();
    new_resume.description = description;

    match store.add_resume(&new_resume) {
        Ok(resume) => {
            ui::success(&format!("Default resume created: {} (ID: {})", resume.name, resume.id));
            ui::summary_row("Characters:", &resume.content_len().to_string());
            Ok(())
        }
        Err(Error::DuplicateName(name)) => {
            ui::warn(&format!(
                "Resume '{}' already exists; use `--name` to add another version",
                name
            ));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_stats(stats: &ApplicationStats) {
    if stats.is_empty() {
        ui::warn("No applications found.");
        return;
    }

    ui::header("Job Application Statistics");
    let total = stats.total.to_string();
    println!("{}", ui::stats_table(&[("Total applications", total.as_str())]));

    let sections = [
        ("By status", stats.by_status.iter().map(|(k, v)| (k.clone(), *v)).collect::<Vec<_>>()),
        ("Top companies", stats.top_companies.clone()),
        ("By resume version", stats.by_resume.iter().map(|(k, v)| (k.clone(), *v)).collect()),
    ];
    for (title, rows) in sections {
        ui::section(title);
        let mut table = ui::TableBuilder::new();
        for (label, count) in &rows {
            table.add_row(label, &count.to_string());
        }
        println!("{}", table.build());
    }
}

/// Store the database path relative to the working directory when possible
fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
