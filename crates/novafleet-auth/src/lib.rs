//! OpenStack credential resolution for NovaFleet
//!
//! Resolves `OS_USERNAME`, `OS_PASSWORD`, `OS_AUTH_URL` and `OS_TENANT_NAME`
//! from the process environment, or from a keystonerc file when the
//! environment is incomplete.
//!
//! # Example
//!
//! ```ignore
//! use novafleet_auth::CredentialResolver;
//!
//! let creds = CredentialResolver::new("/root/keystonerc_admin").resolve()?;
//! let body = serde_json::to_value(creds.api_key_auth())?;
//! ```
//!
//! Resolved secrets are never logged; `Debug` on [`Credentials`] redacts the password.

pub mod credentials;
pub mod error;
pub mod resolver;

pub use credentials::{
    ApiKeyAuth, CredentialSource, Credentials, PasswordAuth, REQUIRED_KEYS, WorkflowAuth,
};
pub use error::{AuthError, Result};
pub use resolver::{CredentialResolver, parse_env_dump};
