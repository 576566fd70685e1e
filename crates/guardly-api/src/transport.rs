// Shared transport configuration for building reqwest::Client instances.
//
// Both panel and billing clients share TLS and timeout settings through
// this module. The panel client injects its bearer token as a default
// header; the billing client gets a short connect timeout so that a
// missing sidecar service fails fast instead of hanging a screen load.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

// ── Response classification ─────────────────────────────────────────

/// Pass through 2xx responses; classify everything else.
///
/// 401/403 become `Authentication`, 422 becomes `Validation` with the
/// backend-provided detail, all other statuses become `Api`. 404/405
/// land in `Api` too; the fallback executor treats those as skippable
/// via `Error::is_skippable`.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, crate::error::Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body);

    Err(match status.as_u16() {
        401 | 403 => crate::error::Error::Authentication {
            message: if detail.is_empty() {
                "token rejected by panel".to_owned()
            } else {
                detail
            },
        },
        422 => crate::error::Error::Validation {
            status: 422,
            detail: if detail.is_empty() {
                "request rejected by backend validation".to_owned()
            } else {
                detail
            },
        },
        code => crate::error::Error::Api {
            status: code,
            message: if detail.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                detail
            },
        },
    })
}

/// Decode a JSON body into `T`, keeping the raw body for debugging.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    body: &str,
) -> Result<T, crate::error::Error> {
    serde_json::from_str(body).map_err(|e| crate::error::Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Pull a human-readable message out of an error body.
///
/// Panels wrap error text inconsistently: `{"detail": "..."}` (FastAPI
/// style), `{"message": "..."}`, or plain text.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
    }
    body.trim().to_owned()
}

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-hosted panels behind self-signed TLS).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            connect_timeout: None,
        }
    }
}

impl TransportConfig {
    /// A config suited to the billing sidecar: short connect timeout so
    /// an absent service is detected quickly.
    pub fn billing() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(10)),
            ..Self::default()
        }
    }

    /// Build a plain `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        self.builder()?
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Build a `reqwest::Client` that sends `Authorization: Bearer {token}`
    /// on every request. Used by the panel client.
    pub fn build_bearer_client(
        &self,
        token: &SecretString,
    ) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| crate::error::Error::Tls(format!("invalid token header: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        self.builder()?
            .default_headers(headers)
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    fn builder(&self) -> Result<reqwest::ClientBuilder, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("guardly/", env!("CARGO_PKG_VERSION")));

        if let Some(connect) = self.connect_timeout {
            builder = builder.connect_timeout(connect);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| {
                    crate::error::Error::Tls(format!("failed to read CA cert: {e}"))
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        Ok(builder)
    }
}
