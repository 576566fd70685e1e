//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use guardly_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the panel")]
    #[diagnostic(
        code(guardly::connection_refused),
        help(
            "Check that the panel is running and the URL (including the port)\n\
             is correct: {detail}\n\
             For self-signed TLS, add --insecure (-k)."
        )
    )]
    ConnectionRefused { detail: String },

    #[error("Connection reset: {detail}")]
    #[diagnostic(
        code(guardly::connection_reset),
        help("A proxy or firewall between you and the panel likely cut the connection.")
    )]
    ConnectionReset { detail: String },

    #[error("Request timed out: {detail}")]
    #[diagnostic(
        code(guardly::timeout),
        help("Increase the timeout with --timeout or check panel responsiveness.")
    )]
    Timeout { detail: String },

    #[error("Network error: {detail}")]
    #[diagnostic(code(guardly::network))]
    Network { detail: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(guardly::auth_failed),
        help(
            "The panel rejected the bearer token: {detail}\n\
             Store a fresh one with: guardly config set-token"
        )
    )]
    AuthFailed { detail: String },

    #[error("No panel token configured for profile '{profile}'")]
    #[diagnostic(
        code(guardly::no_token),
        help(
            "Configure a token with: guardly config set-token --profile {profile}\n\
             Or set the GUARDLY_TOKEN environment variable."
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {detail}")]
    #[diagnostic(code(guardly::not_found))]
    NotFound { detail: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Panel rejected the request: {detail}")]
    #[diagnostic(code(guardly::validation))]
    Rejected { detail: String },

    #[error("API error: {detail}")]
    #[diagnostic(code(guardly::api_error))]
    ApiError { detail: String },

    #[error("Operation '{operation}' is not supported by this panel deployment")]
    #[diagnostic(
        code(guardly::unsupported),
        help(
            "Every known endpoint shape for this operation answered 404/405.\n\
             The panel version may be too old or too new for this client."
        )
    )]
    Unsupported { operation: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(guardly::profile_not_found),
        help("Create one with: guardly config init")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration error: {detail}")]
    #[diagnostic(
        code(guardly::config),
        help("Inspect the config with: guardly config show")
    )]
    Config { detail: String },

    #[error("Billing commands require `billing_url` in the profile")]
    #[diagnostic(
        code(guardly::no_billing),
        help(
            "The billing sidecar is configured separately from the panel.\n\
             Add `billing_url` to your profile or pass --billing-url."
        )
    )]
    NoBillingUrl,

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(guardly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Validation / internal ────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(guardly::validation))]
    Validation { field: String, reason: String },

    #[error("Internal error: {detail}")]
    #[diagnostic(code(guardly::internal))]
    Internal { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionRefused { .. } | Self::ConnectionReset { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::Rejected { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Timeout(detail) => Self::Timeout { detail },
            CoreError::ConnectionRefused(detail) => Self::ConnectionRefused { detail },
            CoreError::ConnectionReset(detail) => Self::ConnectionReset { detail },
            CoreError::Io(detail) => Self::Network { detail },
            CoreError::AuthenticationFailed(detail) => Self::AuthFailed { detail },
            CoreError::ValidationFailed(detail) => Self::Rejected { detail },
            CoreError::NotFound(detail) => Self::NotFound { detail },
            CoreError::Unsupported(operation) => Self::Unsupported { operation },
            CoreError::Api(detail) => Self::ApiError { detail },
            CoreError::Config(detail) => {
                if detail.contains("billing_url") {
                    Self::NoBillingUrl
                } else {
                    Self::Config { detail }
                }
            }
            CoreError::Internal(detail) => Self::Internal { detail },
        }
    }
}

impl From<guardly_config::ConfigError> for CliError {
    fn from(err: guardly_config::ConfigError) -> Self {
        match err {
            guardly_config::ConfigError::UnknownProfile { profile } => {
                Self::ProfileNotFound { name: profile }
            }
            guardly_config::ConfigError::NoToken { profile } => Self::NoToken { profile },
            guardly_config::ConfigError::Validation { field, reason } => {
                Self::Validation { field, reason }
            }
            other => Self::Config {
                detail: other.to_string(),
            },
        }
    }
}
