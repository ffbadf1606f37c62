//! Credential resolution error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(
        "OpenStack credentials unavailable, missing: {}. Export them or point --rc at a keystonerc file",
        .0.join(", ")
    )]
    MissingCredentials(Vec<String>),

    #[error("keystonerc file not found: {0}")]
    ScriptNotFound(PathBuf),

    #[error("Sourcing {path} failed: {stderr}")]
    ScriptFailed { path: PathBuf, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;
