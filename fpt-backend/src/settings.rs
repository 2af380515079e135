//! Manager settings and the environment-supplied session override.

use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding a pre-authenticated session as JSON, set by
/// the desktop launcher. When present it takes precedence over any explicit
/// credentials in [`ManagerSettings`].
pub const SESSION_USER_ENV: &str = "FPT_SESSION_USER";

/// Settings consumed at manager initialization.
///
/// Credentials come in several flavours; the connection logic tries them in
/// order: environment session, script credentials, then login/password.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerSettings {
    /// Base URL of the FPT service, e.g. `https://studio.example.com`.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Script (API client) credentials.
    #[serde(default)]
    pub script_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Interactive user credentials.
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Fallback project for template-engine construction when the manager is
    /// not hosted inside a launched engine.
    #[serde(default)]
    pub project_id: Option<i64>,
    /// Path to the template definitions file (TOML).
    #[serde(default)]
    pub templates_file: Option<PathBuf>,
}

impl ManagerSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self, BackendError> {
        toml::from_str(contents).map_err(|e| BackendError::ConfigParse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, BackendError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BackendError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|e| BackendError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// A pre-authenticated user session provided by the environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionUser {
    pub host: String,
    pub session_token: String,
    #[serde(default)]
    pub http_proxy: Option<String>,
}

impl SessionUser {
    /// Reads the session from [`SESSION_USER_ENV`], if set.
    ///
    /// A malformed value is logged and ignored rather than failing
    /// initialization, so a stale launcher environment can't block
    /// explicitly-configured credentials.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(SESSION_USER_ENV).ok()?;
        match serde_json::from_str::<Self>(&raw) {
            Ok(session) => {
                debug!(host = %session.host, "using pre-authenticated session from environment");
                Some(session)
            }
            Err(e) => {
                warn!("ignoring malformed {SESSION_USER_ENV}: {e}");
                None
            }
        }
    }
}
