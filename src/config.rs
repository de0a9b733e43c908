use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured database path
pub const DATABASE_ENV_VAR: &str = "JOBTRACK_DATABASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JobtrackConfig {
    pub database: Option<String>,
    /// Extra log destination; stderr is always used
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("jobtrack.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".jobtrack").join("jobtrack.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<JobtrackConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: JobtrackConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &JobtrackConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database path: flag, then `JOBTRACK_DATABASE`, then config, then the default under `base`.
pub fn resolve_database_path(
    flag: Option<&Path>,
    env_value: Option<String>,
    config: Option<&JobtrackConfig>,
    base: &Path,
) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(path) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = config.and_then(|c| c.database.as_ref()) {
        return PathBuf::from(path);
    }
    default_database_path_in(base)
}
