// Domain error taxonomy.
//
// Low-level transport failures are sorted into categories a person can
// act on: a timeout means "the panel is slow or unreachable", a refused
// connection means "wrong port or service down", a reset usually means
// a middlebox cut the connection. Everything else stays generic.

use std::io;

use thiserror::Error;

/// Errors surfaced to consumers of the core layer.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ────────────────────────────────────────────────
    /// Request exceeded its deadline.
    #[error("Connection timed out: {0}")]
    Timeout(String),

    /// TCP connection actively refused.
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// Connection dropped mid-flight.
    #[error("Connection reset: {0}")]
    ConnectionReset(String),

    /// Other I/O or transport failure.
    #[error("Network error: {0}")]
    Io(String),

    // ── Panel responses ─────────────────────────────────────────────
    /// Token rejected by the panel.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Request rejected by backend validation.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation unsupported by this panel deployment.
    #[error("Not supported by this backend: {0}")]
    Unsupported(String),

    /// Any other backend error.
    #[error("API error: {0}")]
    Api(String),

    // ── Local ───────────────────────────────────────────────────────
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bug territory: decode failures, invariant violations.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<guardly_api::Error> for CoreError {
    fn from(err: guardly_api::Error) -> Self {
        use guardly_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthenticationFailed(message),
            Api::Validation { detail, .. } => Self::ValidationFailed(detail),
            Api::Unsupported { operation } => Self::Unsupported(operation),
            Api::Api { status: 404, message } => Self::NotFound(message),
            Api::Api { status, message } => Self::Api(format!("HTTP {status}: {message}")),
            Api::Transport(e) => classify_transport(&e),
            Api::InvalidUrl(e) => Self::Config(format!("invalid URL: {e}")),
            Api::Tls(msg) => Self::Io(msg),
            Api::Deserialization { message, .. } => {
                Self::Internal(format!("response decode failed: {message}"))
            }
        }
    }
}

/// Sort a reqwest error into the connectivity taxonomy by inspecting
/// its flags and walking the source chain for the underlying
/// `io::Error` kind.
fn classify_transport(err: &reqwest::Error) -> CoreError {
    if err.is_timeout() {
        return CoreError::Timeout(err.to_string());
    }

    if let Some(kind) = io_error_kind(err) {
        return match kind {
            io::ErrorKind::ConnectionRefused => CoreError::ConnectionRefused(err.to_string()),
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => CoreError::ConnectionReset(err.to_string()),
            io::ErrorKind::TimedOut => CoreError::Timeout(err.to_string()),
            _ => CoreError::Io(err.to_string()),
        };
    }

    if err.is_connect() {
        return CoreError::ConnectionRefused(err.to_string());
    }

    CoreError::Io(err.to_string())
}

/// Walk `Error::source` looking for an `io::Error`.
fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = inner.source();
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::CoreError;

    #[test]
    fn api_404_becomes_not_found() {
        let err = CoreError::from(guardly_api::Error::Api {
            status: 404,
            message: "no such user".to_owned(),
        });
        assert!(matches!(err, CoreError::NotFound(ref m) if m == "no such user"));
    }

    #[test]
    fn unsupported_carries_operation() {
        let err = CoreError::from(guardly_api::Error::Unsupported {
            operation: "delete user".to_owned(),
        });
        assert!(matches!(err, CoreError::Unsupported(ref op) if op == "delete user"));
    }

    #[test]
    fn auth_and_validation_map_directly() {
        let auth = CoreError::from(guardly_api::Error::Authentication {
            message: "expired".to_owned(),
        });
        assert!(matches!(auth, CoreError::AuthenticationFailed(_)));

        let validation = CoreError::from(guardly_api::Error::Validation {
            status: 422,
            detail: "bad expiry".to_owned(),
        });
        assert!(matches!(validation, CoreError::ValidationFailed(ref d) if d == "bad expiry"));
    }
}
