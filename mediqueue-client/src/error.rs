//! Client error types
//!
//! Every transport or backend failure is normalized into this taxonomy
//! before UI code sees it; no raw `reqwest` error escapes the client.

use thiserror::Error;

/// Client error type, classified from HTTP status where available
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request rejected by validation (400, 422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication required or session expired (401)
    #[error("Authentication required")]
    Auth,

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Turn-request throttled (429); a notice, not a failure
    #[error("{message}")]
    Cooldown {
        message: String,
        /// Server-supplied remaining wait in seconds, when present
        seconds_remaining: Option<u64>,
    },

    /// Backend failure (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// No response received (connect failure or timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Local failure before the request was dispatched
    #[error("Request error: {0}")]
    Request(String),

    /// 2xx response with an unusable body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Anything that did not match the taxonomy
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl ClientError {
    /// Whether this is the throttling notice from the turn endpoint
    pub fn is_cooldown(&self) -> bool {
        matches!(self, Self::Cooldown { .. })
    }

    /// Message suitable for direct display: the server's message when one
    /// was surfaced, otherwise a generic Spanish fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Permission(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Server(m)
            | Self::Unknown(m)
                if !m.is_empty() =>
            {
                m.clone()
            }
            Self::Cooldown { message, .. } => message.clone(),
            Self::Auth => "Sesión expirada, inicie sesión nuevamente".to_string(),
            Self::Network(_) => "No se pudo conectar con el servidor".to_string(),
            _ => "Ocurrió un error, intente nuevamente".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network(err.to_string())
        } else if err.is_builder() || err.is_request() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Validation("Área no encontrada".into());
        assert_eq!(err.user_message(), "Área no encontrada");
    }

    #[test]
    fn test_user_message_falls_back_when_empty() {
        let err = ClientError::Validation(String::new());
        assert_eq!(err.user_message(), "Ocurrió un error, intente nuevamente");
    }

    #[test]
    fn test_cooldown_detection() {
        let err = ClientError::Cooldown {
            message: "espere".into(),
            seconds_remaining: Some(30),
        };
        assert!(err.is_cooldown());
        assert!(!ClientError::Auth.is_cooldown());
    }
}
