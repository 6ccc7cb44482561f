//! # Bot Paths
//!
//! Centralized definitions for the directories and files the bot reads and writes,
//! relative to its root directory.

use std::path::{Path, PathBuf};

pub const MODULES_DIR: &str = "modules";
pub const CONFIG_DIR: &str = "config";
pub const LOGS_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "canni.log";

/// Returns the config file for a stage inside the config dir (e.g. "config/dev.yaml")
pub fn stage_config(config_dir: &Path, stage: &str) -> PathBuf {
    config_dir.join(format!("{stage}.yaml"))
}
