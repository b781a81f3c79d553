//! Client configuration: credentials, endpoint, default placement and the
//! transport trust policy.
//!
//! The embedding application owns loading; everything here is a plain
//! serde-capable value with sensible defaults.

use crate::error::{EpcError, EpcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Production Maestro CLI endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://orchestration.epam.com/maestro2/api/cli";

/// API version announced in the `Maestro-api-version` header.
pub const API_VERSION: &str = "2.503.201";

/// SDK version announced in the `Maestro-sdk-version` header.
pub const SDK_VERSION: &str = "2.503.201";

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("sorng-epc/", env!("CARGO_PKG_VERSION"));

// ── Credentials ─────────────────────────────────────────────────────────

/// Access identifier plus shared secret, fixed for the client's lifetime.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub access_id: String,
    pub access_secret: String,
}

impl Credentials {
    pub fn new(access_id: &str, access_secret: &str) -> Self {
        Self {
            access_id: access_id.to_string(),
            access_secret: access_secret.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

// ── Placement ───────────────────────────────────────────────────────────

/// Default scope for operations: which project and region to act in, and
/// which image and shape new instances are launched from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub project: String,
    pub region: String,
    pub image: String,
    pub shape: String,
}

impl Placement {
    pub fn new(project: &str, region: &str, image: &str, shape: &str) -> Self {
        Self {
            project: project.to_string(),
            region: region.to_string(),
            image: image.to_string(),
            shape: shape.to_string(),
        }
    }
}

// ── Client configuration ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpcConfig {
    /// Full URL every request is POSTed to.
    pub endpoint: String,
    pub credentials: Credentials,
    pub placement: Placement,
    pub api_version: String,
    pub sdk_version: String,
    pub user_agent: String,
    /// Skip TLS server-certificate validation. Off unless asked for; meant
    /// for installations fronted by self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for EpcConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials: Credentials::default(),
            placement: Placement::default(),
            api_version: API_VERSION.to_string(),
            sdk_version: SDK_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl EpcConfig {
    /// Config for the production endpoint with the given credentials and
    /// placement; everything else defaulted.
    pub fn new(credentials: Credentials, placement: Placement) -> Self {
        Self {
            credentials,
            placement,
            ..Self::default()
        }
    }

    /// Point the client at another endpoint (staging, a test double).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Opt in to accepting invalid TLS certificates.
    pub fn with_insecure_tls(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// Parse and check the endpoint URL.
    pub fn endpoint_url(&self) -> EpcResult<url::Url> {
        let url = url::Url::parse(&self.endpoint)?;
        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(EpcError::construction(format!(
                "unsupported endpoint scheme '{}'",
                other
            ))),
        }
    }

    /// Validate the configuration before any request is built.
    pub fn validate(&self) -> EpcResult<()> {
        if self.credentials.access_id.is_empty() {
            return Err(EpcError::construction("access id is required"));
        }
        if self.credentials.access_secret.is_empty() {
            return Err(EpcError::construction("access secret is required"));
        }
        self.endpoint_url()?;
        if self.endpoint.starts_with("http://") {
            log::warn!(
                "Maestro endpoint {} is plain HTTP; credentials headers travel unencrypted",
                self.endpoint
            );
        }
        Ok(())
    }
}
