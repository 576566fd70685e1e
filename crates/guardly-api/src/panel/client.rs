// Panel API HTTP client.
//
// Wraps `reqwest::Client` with panel-specific URL construction, status
// classification, and the fallback-chain entry point. The bearer token
// rides as a default header on the underlying client.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::fallback::{self, Candidate};
use crate::transport::{TransportConfig, decode, ensure_success};

/// Raw HTTP client for the panel REST API.
///
/// Response bodies are untyped JSON subject to shape normalization and
/// field resolution; the typed request helpers here only guarantee
/// transport and status handling.
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PanelClient {
    /// Create a panel client from a `TransportConfig` and bearer token.
    ///
    /// `base_url` should be the API root (e.g. `https://panel:8000/api`).
    pub fn new(
        base_url: Url,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_bearer_client(token)?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a panel client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // Relative joins need the trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// The panel API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// GET a path and return the raw JSON value.
    pub(crate) async fn get_value(&self, path: &str) -> Result<Value, Error> {
        self.get_json(path).await
    }

    /// GET a path and decode the body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let response = self.http.get(url).send().await.map_err(Error::Transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(Error::Transport)?;
        decode(&body)
    }

    /// PUT a JSON body and decode the response into `T`.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let response = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let response = ensure_success(response).await?;
        let text = response.text().await.map_err(Error::Transport)?;
        decode(&text)
    }

    /// Run a fallback chain against this client's base URL.
    pub(crate) async fn run_chain(
        &self,
        operation: &str,
        candidates: &[Candidate],
    ) -> Result<Value, Error> {
        fallback::run_chain(&self.http, &self.base_url, operation, candidates).await
    }
}
