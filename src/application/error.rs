//! # Application Errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown stage '{stage}', expected one of {known:?}")]
    UnknownStage { stage: String, known: Vec<String> },

    #[error("cannot register module '{0}' after the application has started")]
    RegistrationClosed(String),

    #[error("no matrix credentials in {0}")]
    MissingCredentials(PathBuf),

    #[error("TOKEN is not set")]
    MissingToken,

    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
