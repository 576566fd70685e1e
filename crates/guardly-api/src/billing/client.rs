// Billing sidecar HTTP client.
//
// The billing service runs next to the panel and carries no
// authentication of its own; it is expected to be reachable only over
// the panel operator's network. Its base URL is explicit configuration
// and is never derived from the panel URL.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::billing::types::{
    BillingSubscription, Payment, PaymentQuery, ServerReboot, SubscriptionUrl, Tariff,
};
use crate::error::Error;
use crate::normalize::normalize_records;
use crate::transport::{TransportConfig, decode, ensure_success};

/// HTTP client for the billing sidecar API.
pub struct BillingClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BillingClient {
    /// Create a billing client with the short-connect-timeout transport
    /// preset so an absent sidecar fails fast.
    pub fn new(base_url: Url) -> Result<Self, Error> {
        let http = TransportConfig::billing().build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a billing client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// The billing API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Look up the subscription link for a panel user id.
    pub async fn subscription_url(&self, vpn_user_id: i64) -> Result<SubscriptionUrl, Error> {
        self.get(&format!("api/subscription/{vpn_user_id}"), &[])
            .await
    }

    /// Look up the subscription link by username.
    pub async fn subscription_url_by_username(
        &self,
        username: &str,
    ) -> Result<SubscriptionUrl, Error> {
        self.get(&format!("api/subscription/by-username/{username}"), &[])
            .await
    }

    /// List payments, optionally filtered by status and paginated.
    pub async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref status) = query.status {
            params.push(("status", status.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = query.offset {
            params.push(("offset", offset.to_string()));
        }
        let value: serde_json::Value = self.get("api/payments", &params).await?;
        Ok(normalize_records(&value, "payments"))
    }

    /// Fetch a single payment.
    pub async fn get_payment(&self, id: i64) -> Result<Payment, Error> {
        self.get(&format!("api/payments/{id}"), &[]).await
    }

    /// Confirm a pending payment.
    pub async fn confirm_payment(&self, id: i64) -> Result<Payment, Error> {
        let url = self.base_url.join(&format!("api/payments/{id}/confirm"))?;
        debug!("PUT {url}");

        let response = self.http.put(url).send().await.map_err(Error::Transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(Error::Transport)?;
        decode(&body)
    }

    /// List available tariff plans.
    pub async fn list_tariffs(&self) -> Result<Vec<Tariff>, Error> {
        let value: serde_json::Value = self.get("api/tariffs", &[]).await?;
        Ok(normalize_records(&value, "tariffs"))
    }

    /// List billing-side subscriptions, optionally filtered.
    pub async fn list_subscriptions(
        &self,
        user_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<Vec<BillingSubscription>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(user_id) = user_id {
            params.push(("user_id", user_id.to_string()));
        }
        if let Some(status) = status {
            params.push(("status", status.to_owned()));
        }
        let value: serde_json::Value = self.get("api/subscriptions", &params).await?;
        Ok(normalize_records(&value, "subscriptions"))
    }

    /// Fetch a single billing-side subscription.
    pub async fn get_subscription(&self, id: i64) -> Result<BillingSubscription, Error> {
        self.get(&format!("api/subscriptions/{id}"), &[]).await
    }

    /// Request a reboot of a backend server by its address.
    pub async fn reboot_server(&self, server_ip: &str) -> Result<ServerReboot, Error> {
        let url = self.base_url.join(&format!("api/server/{server_ip}/reboot"))?;
        debug!("POST {url}");

        let response = self.http.post(url).send().await.map_err(Error::Transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(Error::Transport)?;
        decode(&body)
    }

    // ── Request helper ───────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url}");

        let mut request = self.http.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await.map_err(Error::Transport)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(Error::Transport)?;
        decode(&body)
    }
}
