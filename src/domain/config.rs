//! # Configuration
//!
//! Two layers of configuration:
//! - [`AppOptions`]: what `main` hands to `Application::configure` (directories, stage,
//!   log levels). Derived from the stage, never read from disk.
//! - [`BotConfig`]: the per-stage `config/<stage>.yaml` file (credentials, remote log
//!   room, per-module settings).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

use crate::domain::env::Stage;
use crate::domain::paths;

/// Stages the application accepts.
pub const STAGES: [&str; 2] = ["prod", "dev"];

/// chrono rendition of `DD.MM.YYYY HH:mm:ss`.
pub const LOG_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Minimum level per log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevels {
    pub console: LevelFilter,
    pub file: LevelFilter,
    pub remote: LevelFilter,
}

impl LogLevels {
    pub fn for_stage(stage: &Stage) -> Self {
        let dev = stage.is_dev();
        Self {
            console: if dev { LevelFilter::DEBUG } else { LevelFilter::INFO },
            file: LevelFilter::INFO,
            remote: if dev { LevelFilter::DEBUG } else { LevelFilter::INFO },
        }
    }
}

/// Options passed to `Application::configure`.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub root_dir: PathBuf,
    pub modules_path: PathBuf,
    pub config_path: PathBuf,
    pub stage: Stage,
    pub log_levels: LogLevels,
    pub log_format: String,
    pub log_dir: PathBuf,
    pub stages: Vec<String>,
}

impl AppOptions {
    pub fn for_stage(root: &Path, stage: &Stage) -> Self {
        Self {
            root_dir: root.to_path_buf(),
            modules_path: root.join(paths::MODULES_DIR),
            config_path: root.join(paths::CONFIG_DIR),
            stage: stage.clone(),
            log_levels: LogLevels::for_stage(stage),
            log_format: LOG_FORMAT.to_string(),
            log_dir: root.join(paths::LOGS_DIR),
            stages: STAGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn knows_stage(&self) -> bool {
        self.stages.iter().any(|s| s == self.stage.as_str())
    }

    pub fn stage_config_file(&self) -> PathBuf {
        paths::stage_config(&self.config_path, self.stage.as_str())
    }
}

/// Per-stage configuration file.
/// Matches the layout of `config/<stage>.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default)]
    pub matrix: Option<MatrixConfig>,
    /// Room receiving log lines from the remote sink
    #[serde(default)]
    pub remote_log_room: Option<String>,
    /// Free-form settings keyed by module name
    #[serde(default)]
    pub modules: HashMap<String, serde_yaml::Value>,
}

/// Credentials for the Matrix account the bot runs as.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
