use thiserror::Error;

/// Top-level error type for the `guardly-api` crate.
///
/// Covers every failure mode across both API surfaces: the panel API
/// and the billing sidecar. `guardly-core` maps these into user-facing
/// diagnostics; the fallback executor uses `is_skippable` to decide
/// whether an HTTP status means "try the next endpoint variant".
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Bearer token rejected (401/403 from the panel).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Validation rejection (HTTP 422), with backend-provided detail.
    #[error("Validation failed (HTTP {status}): {detail}")]
    Validation { status: u16, detail: String },

    /// Any other non-2xx response from a backend.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Fallback ────────────────────────────────────────────────────
    /// Every candidate in a fallback chain answered 404/405.
    #[error("Operation '{operation}' is not supported by this backend")]
    Unsupported { operation: String },
}

impl Error {
    /// Returns `true` if this error means "this endpoint variant does
    /// not exist on this deployment" — the fallback executor advances
    /// to the next candidate instead of failing the operation.
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 404 || *status == 405,
            Self::Transport(e) => matches!(
                e.status().map(|s| s.as_u16()),
                Some(404) | Some(405)
            ),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
