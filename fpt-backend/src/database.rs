//! The asset-database seam and its HTTP client.

use crate::error::BackendError;
use crate::record::AssetRecord;
use crate::settings::{ManagerSettings, SessionUser};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("fpt-asset-manager/", env!("CARGO_PKG_VERSION"));

/// Read-only access to asset records held by the production-tracking
/// service, keyed by composite (type, id).
///
/// Implementations block the calling thread; there is no retry and no
/// internal caching. Timeouts, if any, are the implementation's concern.
pub trait AssetDatabase: Send + Sync {
    /// Fetches at most one record matching the composite key, carrying only
    /// the requested fields (of those the backend has data for).
    fn find_one(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<AssetRecord>, BackendError>;
}

/// Blocking HTTP client for the FPT REST API.
///
/// Constructed once at manager initialization and reused for the lifetime
/// of the process. Construction authenticates eagerly: a manager without a
/// live connection cannot serve any operation, so auth failure is fatal.
pub struct HttpAssetDatabase {
    client: reqwest::blocking::Client,
    server_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct EntityResponse {
    data: EntityPayload,
}

#[derive(Deserialize)]
struct EntityPayload {
    id: i64,
    #[serde(default)]
    attributes: serde_json::Map<String, Value>,
}

impl HttpAssetDatabase {
    /// Connects and authenticates against the service named in `settings`.
    ///
    /// An environment session (see [`SessionUser::from_env`]) takes
    /// precedence over explicit credentials, including its host and proxy.
    pub fn connect(settings: &ManagerSettings) -> Result<Self, BackendError> {
        let session = SessionUser::from_env();

        let (server_url, proxy) = match &session {
            Some(s) => (s.host.clone(), s.http_proxy.clone()),
            None => (
                settings
                    .server_url
                    .clone()
                    .ok_or_else(|| BackendError::MissingCredentials("server_url is not set".into()))?,
                None,
            ),
        };
        let server_url = server_url.trim_end_matches('/').to_string();

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT);
        if let Some(proxy) = proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(&proxy).map_err(|e| BackendError::Transport(e.to_string()))?,
            );
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(format!("http client: {e}")))?;

        let access_token = Self::authenticate(&client, &server_url, settings, session.as_ref())?;
        info!(server = %server_url, "authenticated with FPT service");

        Ok(Self {
            client,
            server_url,
            access_token,
        })
    }

    fn authenticate(
        client: &reqwest::blocking::Client,
        server_url: &str,
        settings: &ManagerSettings,
        session: Option<&SessionUser>,
    ) -> Result<String, BackendError> {
        let params: Vec<(&str, &str)> = if let Some(session) = session {
            vec![
                ("grant_type", "session_token"),
                ("session_token", &session.session_token),
            ]
        } else if let (Some(script), Some(key)) = (&settings.script_name, &settings.api_key) {
            vec![
                ("grant_type", "client_credentials"),
                ("client_id", script),
                ("client_secret", key),
            ]
        } else if let (Some(login), Some(password)) = (&settings.login, &settings.password) {
            vec![
                ("grant_type", "password"),
                ("username", login),
                ("password", password),
            ]
        } else {
            return Err(BackendError::MissingCredentials(
                "no session, script or login credentials configured".into(),
            ));
        };

        let response = client
            .post(format!("{server_url}/api/v1/auth/access_token"))
            .form(&params)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Authentication(format!(
                "HTTP {} from auth endpoint",
                response.status()
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(token.access_token)
    }
}

impl AssetDatabase for HttpAssetDatabase {
    fn find_one(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<AssetRecord>, BackendError> {
        debug!(entity_type, id, ?fields, "querying FPT service");

        let response = self
            .client
            .get(format!(
                "{}/api/v1/entity/{entity_type}/{id}",
                self.server_url
            ))
            .bearer_auth(&self.access_token)
            .query(&[("fields", fields.join(","))])
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BackendError::InvalidResponse(format!(
                "HTTP {} querying {entity_type}/{id}",
                response.status()
            )));
        }

        let payload: EntityResponse = response
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let mut record = AssetRecord::new();
        record.set("id", Value::from(payload.data.id));
        for (field, value) in payload.data.attributes {
            record.set(&field, value);
        }
        Ok(Some(record.project(
            &fields.iter().chain(&["id"]).copied().collect::<Vec<_>>(),
        )))
    }
}
