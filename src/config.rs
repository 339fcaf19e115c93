use dirs::home_dir;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::query_ast::{Dialect, PlanOptions};

/// File name of the JSON config inside the planner home directory
const CONFIG_FILE: &str = "config.json";

const ENV_HOME: &str = "QUERY_PLANNER_HOME";
const ENV_OPTIMIZE: &str = "QUERY_PLANNER_OPTIMIZE";
const ENV_DIALECT: &str = "QUERY_PLANNER_DIALECT";
const ENV_PRETTY: &str = "QUERY_PLANNER_PRETTY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub optimize: bool,
    pub dialect: Dialect,
    pub pretty: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { optimize: true, dialect: Dialect::Ansi, pretty: false }
    }
}

/// On-disk shape; every key is optional and only overrides what it names.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    optimize: Option<bool>,
    dialect: Option<Dialect>,
    pretty: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())] Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config file {}: {source}", path.display())] Parse { path: PathBuf, source: serde_json::Error },
    #[error("invalid value for {key}: {value}")] Env { key: &'static str, value: String },
}

impl PlannerConfig {
    /// Defaults, then the config file, then environment (`.env` included).
    ///
    /// An explicit `path` must load; the default location is optional and a
    /// broken default file is only logged.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut cfg = PlannerConfig::default();

        match path {
            Some(p) => cfg.apply_file(&read_config_file(p)?),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    match read_config_file(&default_path) {
                        Ok(file) => cfg.apply_file(&file),
                        Err(e) => warn!("ignoring config: {}", e),
                    }
                }
            }
        }

        cfg.apply_env(|key| std::env::var(key).ok())?;
        info!("planner config: optimize={} dialect={} pretty={}", cfg.optimize, cfg.dialect, cfg.pretty);
        Ok(cfg)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(v) = file.optimize { self.optimize = v; }
        if let Some(v) = file.dialect { self.dialect = v; }
        if let Some(v) = file.pretty { self.pretty = v; }
    }

    /// Apply `QUERY_PLANNER_*` overrides read through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup(ENV_OPTIMIZE) {
            self.optimize = parse_flag(ENV_OPTIMIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_DIALECT) {
            self.dialect = v.parse().map_err(|_| ConfigError::Env { key: ENV_DIALECT, value: v.clone() })?;
        }
        if let Some(v) = lookup(ENV_PRETTY) {
            self.pretty = parse_flag(ENV_PRETTY, &v)?;
        }
        Ok(())
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions { optimize: self.optimize, dialect: self.dialect }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env { key, value: value.to_string() }),
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let file = serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    info!("Loaded planner config from {}", path.display());
    Ok(file)
}

/// `$QUERY_PLANNER_HOME` when set to an absolute path, else `~/.query-planner`
pub fn get_home_dir() -> PathBuf {
    if let Ok(custom_dir) = std::env::var(ENV_HOME) {
        let path = PathBuf::from(custom_dir);
        if path.is_absolute() {
            return path;
        }
        warn!("{} must be absolute, ignoring {}", ENV_HOME, path.display());
    }

    if let Some(mut hd) = home_dir() {
        hd.push(".query-planner");
        return hd;
    }
    PathBuf::from(".query-planner")
}

pub fn default_config_path() -> PathBuf {
    get_home_dir().join(CONFIG_FILE)
}
