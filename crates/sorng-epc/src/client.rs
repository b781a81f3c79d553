//! Signed HTTP transport for the Maestro CLI endpoint.
//!
//! Every operation is a single form-encoded POST to one URL. The client
//! encodes the parameters, signs the body, sends it and hands back the raw
//! reply. A non-2xx HTTP status is not an error at this layer: the body
//! still carries a status envelope, and [`MaestroClient::invoke`] lets the
//! envelope decoder decide what the call meant.

use crate::action::Action;
use crate::config::EpcConfig;
use crate::envelope::{self, Envelope};
use crate::error::{EpcError, EpcResult};
use crate::signing::MaestroSigner;
use bytes::Bytes;
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

/// Form parameters of one call. Sorted by key, which fixes the body (and
/// therefore the signature) for a given set of values.
pub type FormParams = BTreeMap<String, String>;

/// Query-component escaping: everything except `A-Z a-z 0-9 - _ . ~`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Raw reply from the endpoint.
#[derive(Debug, Clone)]
pub struct MaestroResponse {
    pub status: u16,
    pub body: Bytes,
}

impl MaestroResponse {
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded, for logging.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport client holding the HTTP connection pool and the signer.
#[derive(Debug, Clone)]
pub struct MaestroClient {
    http: Client,
    endpoint: url::Url,
    signer: MaestroSigner,
}

impl MaestroClient {
    /// Build a client from configuration. Fails before any I/O when the
    /// configuration or the TLS setup is unusable.
    pub fn new(config: &EpcConfig) -> EpcResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;

        if config.accept_invalid_certs {
            log::warn!(
                "TLS certificate validation disabled for Maestro endpoint {}",
                endpoint
            );
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| EpcError::construction(format!("failed to build HTTP client: {}", e)))?;

        let signer = MaestroSigner::new(
            config.credentials.clone(),
            &config.api_version,
            &config.sdk_version,
            &config.user_agent,
        );

        Ok(Self {
            http,
            endpoint,
            signer,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn access_id(&self) -> &str {
        self.signer.access_id()
    }

    /// Send one signed POST and return the raw reply.
    ///
    /// Only failures to reach the server or read its reply are errors;
    /// HTTP error statuses come back as a normal [`MaestroResponse`].
    pub async fn call(&self, params: &FormParams) -> EpcResult<MaestroResponse> {
        let body = encode_form(params);
        let signed = self.signer.sign_request(&body, Utc::now());

        log::debug!(
            "Maestro {} -> {}",
            params.get("action").map(String::as_str).unwrap_or("<none>"),
            self.endpoint
        );

        let mut req = self.http.post(self.endpoint.clone());
        for (name, value) in &signed.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req.body(signed.body).send().await.map_err(EpcError::from)?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| EpcError::transport(format!("error reading response body: {}", e)))?;

        let response = MaestroResponse { status, body };
        if !response.is_http_success() {
            log::warn!(
                "Maestro endpoint answered HTTP {}; deferring to status envelope",
                status
            );
        }
        Ok(response)
    }

    /// Call the endpoint and decode the reply into envelope `E`.
    ///
    /// Errors carry the action name from `params`.
    pub async fn invoke<E: Envelope>(
        &self,
        params: &FormParams,
        check_status: bool,
    ) -> EpcResult<E> {
        let action = params.get("action").cloned().unwrap_or_default();

        let response = self
            .call(params)
            .await
            .map_err(|e| e.with_action(&action))?;

        envelope::decode::<E>(&response.body, check_status).map_err(|e| {
            if e.is_decode() {
                log::debug!("undecodable Maestro reply for {}: {}", action, response.text());
            }
            e.with_action(&action)
        })
    }
}

// ── Form helpers ────────────────────────────────────────────────────────

/// Start a parameter set for `action`.
pub fn build_params(action: Action) -> FormParams {
    let mut params = FormParams::new();
    params.insert("action".to_string(), action.as_str().to_string());
    params
}

/// Escape one key or value as a URL query component (space as `+`).
pub fn form_escape(input: &str) -> String {
    utf8_percent_encode(input, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// Encode parameters as an `application/x-www-form-urlencoded` body, keys in
/// sorted order.
pub fn encode_form(params: &FormParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", form_escape(k), form_escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}
