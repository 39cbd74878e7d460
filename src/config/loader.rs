//! Multi-source config loading.
//!
//! Priority, lowest first: built-in defaults, the YAML file, environment
//! variables. CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::schema::TopicGraphConfig;
use crate::error::{Result, TopicGraphError};

/// Points at a config file, overriding the per-user location.
pub const ENV_CONFIG: &str = "TOPICGRAPH_CONFIG";
/// Overrides `storage.db_path`.
pub const ENV_DB: &str = "TOPICGRAPH_DB";
/// Overrides `query.only_latest`.
pub const ENV_ONLY_LATEST: &str = "TOPICGRAPH_ONLY_LATEST";
/// Overrides `logging.filter`.
pub const ENV_LOG: &str = "TOPICGRAPH_LOG";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Load config from `explicit` (if given) or the usual locations, then
/// apply environment overrides from the process environment.
pub fn load_config(explicit: Option<&Path>) -> Result<TopicGraphConfig> {
    let env = |key: &str| std::env::var(key).ok();
    let mut config = match locate_config_file(explicit, &env) {
        Some(path) => read_config_file(&path)?,
        None => TopicGraphConfig::default(),
    };
    apply_env_overrides(&mut config, &env)?;
    Ok(config)
}

/// Which file to read, if any.
///
/// An explicit path or `TOPICGRAPH_CONFIG` is returned even if missing, so
/// reading it reports the error. The per-user file is only returned when it
/// exists.
pub fn locate_config_file<F>(explicit: Option<&Path>, env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env(ENV_CONFIG).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    user_config_path().filter(|p| p.is_file())
}

/// `<config dir>/topicgraph/config.yaml` for the current user.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "topicgraph").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn read_config_file(path: &Path) -> Result<TopicGraphConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        TopicGraphError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    let config: TopicGraphConfig = serde_yaml::from_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Apply `TOPICGRAPH_*` overrides read through `env`.
pub fn apply_env_overrides<F>(config: &mut TopicGraphConfig, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db) = env(ENV_DB).filter(|v| !v.trim().is_empty()) {
        config.storage.db_path = Some(PathBuf::from(db));
    }
    if let Some(raw) = env(ENV_ONLY_LATEST) {
        config.query.only_latest = parse_bool(&raw).ok_or_else(|| {
            TopicGraphError::Config(format!("{ENV_ONLY_LATEST} must be a boolean, got {raw:?}"))
        })?;
    }
    if let Some(filter) = env(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.logging.filter = filter;
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
