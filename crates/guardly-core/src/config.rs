// Resolved runtime configuration for a panel connection.
//
// This is the post-resolution form: profile file, environment, and CLI
// flags have already been merged (guardly-config does that), secrets
// are already in `SecretString`. `billing_url` stays optional — the
// billing sidecar is an explicitly configured, independent service and
// is never derived from the panel URL.

use std::time::Duration;

use guardly_api::transport::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Everything needed to talk to one panel deployment.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Panel API base URL, e.g. `https://panel.example.com:8000/api`.
    pub panel_url: Url,
    /// Bearer token for the panel API.
    pub token: SecretString,
    /// Billing sidecar base URL; billing operations fail with a
    /// configuration error when unset.
    pub billing_url: Option<Url>,
    /// Accept invalid TLS certificates (self-signed panels).
    pub insecure: bool,
    /// Overall request timeout.
    pub timeout: Duration,
    /// Connect timeout for the billing sidecar.
    pub billing_connect_timeout: Duration,
}

impl PanelConfig {
    pub fn new(panel_url: Url, token: SecretString) -> Self {
        Self {
            panel_url,
            token,
            billing_url: None,
            insecure: false,
            timeout: Duration::from_secs(30),
            billing_connect_timeout: Duration::from_secs(10),
        }
    }

    /// Transport settings for the panel client.
    pub fn panel_transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: self.timeout,
            connect_timeout: None,
        }
    }

    /// Transport settings for the billing client (short connect
    /// timeout so an absent sidecar fails fast).
    pub fn billing_transport(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: Some(self.billing_connect_timeout),
            ..self.panel_transport()
        }
    }
}
