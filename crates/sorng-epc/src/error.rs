//! Error types for Maestro API calls.
//!
//! Every call can fail at one of four stages: building the request, moving
//! bytes over the network, parsing the XML reply, or the server reporting a
//! non-`200` status inside an otherwise valid reply. Each stage has its own
//! variant so callers can tell "the control plane said no" apart from "we
//! never reached it".

use thiserror::Error;

/// Top-level error type for all Maestro operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpcError {
    /// The request could not be built (bad endpoint, bad header value,
    /// unknown action keyword). Nothing was sent.
    #[error("Invalid request: {0}")]
    Construction(String),

    /// Connection failure or the response body could not be read.
    #[error("Error trying API call{}: {message}", action_suffix(.action))]
    Transport {
        action: Option<String>,
        message: String,
    },

    /// The response body is not the expected XML document.
    #[error("Error unmarshalling Maestro response XML: {0}")]
    Decode(String),

    /// The envelope parsed but carried a status code other than `200`.
    /// `message` is the server text, untouched.
    #[error("{message}")]
    Application {
        code: String,
        message: String,
        action: Option<String>,
    },
}

fn action_suffix(action: &Option<String>) -> String {
    match action {
        Some(a) => format!(" - {}", a),
        None => String::new(),
    }
}

impl EpcError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            action: None,
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn application(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Application {
            code: code.into(),
            message: message.into(),
            action: None,
        }
    }

    /// Record which action was being performed. Only transport and
    /// application errors carry it; other variants are returned unchanged.
    pub fn with_action(self, name: &str) -> Self {
        match self {
            Self::Transport { message, .. } => Self::Transport {
                action: Some(name.to_string()),
                message,
            },
            Self::Application { code, message, .. } => Self::Application {
                code,
                message,
                action: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// The bare message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Construction(m) | Self::Decode(m) => m,
            Self::Transport { message, .. } | Self::Application { message, .. } => message,
        }
    }

    /// The action attached by [`EpcError::with_action`], if any.
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::Transport { action, .. } | Self::Application { action, .. } => action.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

impl From<reqwest::Error> for EpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Construction(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<quick_xml::DeError> for EpcError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for EpcError {
    fn from(err: url::ParseError) -> Self {
        Self::Construction(format!("invalid endpoint: {}", err))
    }
}

/// Convert to a plain `String` for callers that surface errors as text.
impl From<EpcError> for String {
    fn from(err: EpcError) -> String {
        err.to_string()
    }
}

/// Convenience result type for Maestro operations.
pub type EpcResult<T> = Result<T, EpcError>;
