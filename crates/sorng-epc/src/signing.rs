//! Maestro request signing.
//!
//! Every request carries an HMAC-SHA256 token computed as:
//!
//! 1. key     = access secret + date (no separator)
//! 2. message = method ":" access id ":" date ":" body, where every `&` in
//!    the form-encoded body is replaced by `:`
//! 3. token   = base64(HMAC-SHA256(key, message))
//!
//! The date is the RFC 1123 timestamp in UTC written with a `GMT` zone. The
//! exact string that goes into the `Maestro-date` header must be the one
//! that was signed, so it is produced once per request and carried in
//! [`SignedRequest`].

use crate::config::Credentials;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// HTTP method every Maestro call uses.
pub const METHOD: &str = "POST";

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_API_VERSION: &str = "Maestro-api-version";
pub const HEADER_SDK_VERSION: &str = "Maestro-sdk-version";
pub const HEADER_ACCESS_ID: &str = "Maestro-access-id";
pub const HEADER_DATE: &str = "Maestro-date";
pub const HEADER_AUTHORIZATION: &str = "Maestro-authorization";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The server answers XML regardless; JSON is what it expects to be asked for.
pub const ACCEPT: &str = "application/json";

/// Inputs of a single signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub body: String,
    pub date: String,
}

impl RequestDescriptor {
    /// Describe a POST of `body` stamped with `timestamp`.
    pub fn post(body: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            method: METHOD.to_string(),
            body: body.to_string(),
            date: format_date(timestamp),
        }
    }
}

/// A request with its full signed header set, ready to be sent.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// The date string that was signed.
    pub date: String,
    /// All outgoing headers, authorization included.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl SignedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header(HEADER_AUTHORIZATION)
    }
}

/// Signs requests on behalf of one set of credentials.
#[derive(Debug, Clone)]
pub struct MaestroSigner {
    credentials: Credentials,
    api_version: String,
    sdk_version: String,
    user_agent: String,
}

impl MaestroSigner {
    pub fn new(
        credentials: Credentials,
        api_version: &str,
        sdk_version: &str,
        user_agent: &str,
    ) -> Self {
        Self {
            credentials,
            api_version: api_version.to_string(),
            sdk_version: sdk_version.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn access_id(&self) -> &str {
        &self.credentials.access_id
    }

    /// Compute the authorization token for a descriptor.
    pub fn token(&self, request: &RequestDescriptor) -> String {
        sign(
            &self.credentials.access_id,
            &self.credentials.access_secret,
            &request.date,
            &request.method,
            &request.body,
        )
    }

    /// Sign a form body and assemble the complete header set.
    pub fn sign_request(&self, body: &str, timestamp: DateTime<Utc>) -> SignedRequest {
        let descriptor = RequestDescriptor::post(body, timestamp);
        let token = self.token(&descriptor);

        let mut headers = BTreeMap::new();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string());
        headers.insert(HEADER_USER_AGENT.to_string(), self.user_agent.clone());
        headers.insert(HEADER_ACCEPT.to_string(), ACCEPT.to_string());
        headers.insert(HEADER_API_VERSION.to_string(), self.api_version.clone());
        headers.insert(HEADER_SDK_VERSION.to_string(), self.sdk_version.clone());
        headers.insert(
            HEADER_ACCESS_ID.to_string(),
            self.credentials.access_id.clone(),
        );
        headers.insert(HEADER_DATE.to_string(), descriptor.date.clone());
        headers.insert(HEADER_AUTHORIZATION.to_string(), token);

        SignedRequest {
            date: descriptor.date,
            headers,
            body: descriptor.body,
        }
    }
}

// ── Signature primitives ────────────────────────────────────────────────

/// Compute the Maestro authorization token.
pub fn sign(
    access_id: &str,
    access_secret: &str,
    date: &str,
    method: &str,
    body: &str,
) -> String {
    let key = canonical_key(access_secret, date);
    let message = canonical_message(method, access_id, date, body);
    let digest = hmac_sha256(key.as_bytes(), message.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(digest)
}

/// HMAC key: the secret immediately followed by the date.
pub fn canonical_key(access_secret: &str, date: &str) -> String {
    format!("{}{}", access_secret, date)
}

/// The string that gets signed. `&` separators in the body become `:`, so
/// parameter boundaries are indistinguishable from literal colons; the
/// server computes it the same way.
pub fn canonical_message(method: &str, access_id: &str, date: &str, body: &str) -> String {
    let body = body.replace('&', ":");
    [method, access_id, date, body.as_str()].join(":")
}

/// RFC 1123 date in UTC with a `GMT` zone, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DATE: &str = "Mon, 02 Jan 2006 15:04:05 GMT";

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    fn test_signer() -> MaestroSigner {
        MaestroSigner::new(
            Credentials::new("user1", "secret1"),
            "2.503.201",
            "2.503.201",
            "sorng-epc/test",
        )
    }

    #[test]
    fn canonical_message_literal() {
        assert_eq!(
            canonical_message("POST", "user1", DATE, "action=x&project=p1"),
            "POST:user1:Mon, 02 Jan 2006 15:04:05 GMT:action=x:project=p1"
        );
    }

    #[test]
    fn canonical_message_replaces_every_ampersand() {
        let msg = canonical_message("POST", "u", "d", "a=1&b=2&c=3");
        assert!(msg.ends_with(":a=1:b=2:c=3"));
        assert!(!msg.contains('&'));
    }

    #[test]
    fn canonical_message_empty_body() {
        assert_eq!(canonical_message("POST", "u", "d", ""), "POST:u:d:");
    }

    #[test]
    fn canonical_key_has_no_separator() {
        assert_eq!(canonical_key("secret1", DATE), "secret1Mon, 02 Jan 2006 15:04:05 GMT");
    }

    #[test]
    fn sign_known_value() {
        assert_eq!(
            sign("user1", "secret1", DATE, "POST", "action=x&project=p1"),
            "6WPqzelazML1V2xgpDBNv1iWl9KxxiF3bSOiFVTlby4="
        );
    }

    #[test]
    fn sign_known_value_empty_body() {
        assert_eq!(
            sign("user1", "secret1", DATE, "POST", ""),
            "0ep77Yd0ybNyriup1E+YnKWRI9VJ7DgCl9y+pG0w/0Y="
        );
    }

    #[test]
    fn sign_is_deterministic() {
        let a = sign("user1", "secret1", DATE, "POST", "action=x");
        let b = sign("user1", "secret1", DATE, "POST", "action=x");
        assert_eq!(a, b);
    }

    #[test]
    fn sign_changes_with_any_input() {
        let base = sign("user1", "secret1", DATE, "POST", "action=x");
        assert_ne!(base, sign("user2", "secret1", DATE, "POST", "action=x"));
        assert_ne!(base, sign("user1", "secret2", DATE, "POST", "action=x"));
        let next_second = "Mon, 02 Jan 2006 15:04:06 GMT";
        assert_ne!(base, sign("user1", "secret1", next_second, "POST", "action=x"));
        assert_ne!(base, sign("user1", "secret1", DATE, "PUT", "action=x"));
        assert_ne!(base, sign("user1", "secret1", DATE, "POST", "action=y"));
    }

    #[test]
    fn token_is_padded_base64_of_sha256() {
        let token = sign("user1", "secret1", DATE, "POST", "action=x");
        // 32-byte digest -> 44 base64 chars ending in one pad char
        assert_eq!(token.len(), 44);
        assert!(token.ends_with('='));
    }

    #[test]
    fn format_date_fixed_instant() {
        assert_eq!(format_date(fixed_instant()), DATE);
    }

    #[test]
    fn format_date_is_gmt_not_utc() {
        let date = format_date(Utc::now());
        assert!(!date.contains("UTC"));
        assert!(date.ends_with("GMT"));
    }

    #[test]
    fn format_date_pads_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_date(ts), "Tue, 05 Mar 2024 07:08:09 GMT");
    }

    #[test]
    fn sign_request_has_all_headers() {
        let signed = test_signer().sign_request("action=x&project=p1", fixed_instant());
        for name in [
            HEADER_CONTENT_TYPE,
            HEADER_USER_AGENT,
            HEADER_ACCEPT,
            HEADER_API_VERSION,
            HEADER_SDK_VERSION,
            HEADER_ACCESS_ID,
            HEADER_DATE,
            HEADER_AUTHORIZATION,
        ] {
            assert!(signed.header(name).is_some(), "missing {}", name);
        }
        assert_eq!(signed.headers.len(), 8);
        assert_eq!(signed.header(HEADER_ACCEPT), Some("application/json"));
        assert_eq!(signed.header(HEADER_CONTENT_TYPE), Some(FORM_CONTENT_TYPE));
        assert_eq!(signed.header(HEADER_ACCESS_ID), Some("user1"));
    }

    #[test]
    fn sign_request_date_header_matches_signed_date() {
        let signed = test_signer().sign_request("action=x&project=p1", fixed_instant());
        assert_eq!(signed.header(HEADER_DATE), Some(DATE));
        assert_eq!(signed.date, DATE);
        assert_eq!(
            signed.authorization(),
            Some("6WPqzelazML1V2xgpDBNv1iWl9KxxiF3bSOiFVTlby4=")
        );
    }

    #[test]
    fn descriptor_uses_post() {
        let d = RequestDescriptor::post("a=1", fixed_instant());
        assert_eq!(d.method, "POST");
        assert_eq!(d.date, DATE);
        assert_eq!(test_signer().token(&d), sign("user1", "secret1", DATE, "POST", "a=1"));
    }
}
