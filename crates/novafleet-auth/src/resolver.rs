//! Credential resolution
//!
//! Reads `OS_*` variables from the process environment. When any of them is
//! missing, sources a keystonerc file in a subshell and scrapes the four
//! recognized keys from the resulting environment.

use crate::credentials::{CredentialSource, Credentials, REQUIRED_KEYS, missing_keys};
use crate::error::{AuthError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Resolves credentials once per call, from the environment or a keystonerc file
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    rc_path: PathBuf,
}

impl CredentialResolver {
    pub fn new(rc_path: impl Into<PathBuf>) -> Self {
        Self {
            rc_path: rc_path.into(),
        }
    }

    pub fn rc_path(&self) -> &Path {
        &self.rc_path
    }

    /// Resolve credentials from the process environment, falling back to the rc file
    pub fn resolve(&self) -> Result<Credentials> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Same as [`resolve`](Self::resolve) with a custom environment lookup
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = missing_keys(&lookup);
        if missing.is_empty() {
            let vars: HashMap<String, String> = REQUIRED_KEYS
                .into_iter()
                .filter_map(|key| lookup(key).map(|v| (key.to_string(), v)))
                .collect();
            debug!("Using OpenStack credentials from environment");
            return Credentials::from_map(&vars, CredentialSource::Environment);
        }

        debug!(
            missing = %missing.join(", "),
            rc = %self.rc_path.display(),
            "Environment incomplete, sourcing keystonerc"
        );

        let vars = self.source_rc_file()?;
        let creds = Credentials::from_map(&vars, CredentialSource::Script(self.rc_path.clone()))
            .inspect_err(|e| warn!("{}", e))?;

        info!(
            rc = %self.rc_path.display(),
            username = %creds.username(),
            tenant = %creds.tenant_name(),
            "Loaded OpenStack credentials from keystonerc"
        );
        Ok(creds)
    }

    /// Source the rc file in `sh` and keep only the recognized keys
    fn source_rc_file(&self) -> Result<HashMap<String, String>> {
        if !self.rc_path.is_file() {
            return Err(AuthError::ScriptNotFound(self.rc_path.clone()));
        }

        // `.` searches PATH for bare names, so the script gets an absolute path.
        // It is passed as $0 so it never goes through shell parsing.
        let script = std::path::absolute(&self.rc_path)?;
        let output = Command::new("sh")
            .arg("-c")
            .arg(". \"$0\" >/dev/null && env")
            .arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::ScriptFailed {
                path: self.rc_path.clone(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(parse_env_dump(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `KEY=VALUE` lines, keeping only the four credential keys
///
/// Values are split at the first `=`, so URLs with query strings survive.
pub fn parse_env_dump(dump: &str) -> HashMap<String, String> {
    dump.lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| REQUIRED_KEYS.contains(key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
