// Panel facade.
//
// One handle wrapping both API clients, exposing canonical types and
// the dashboard overview. Billing operations require `billing_url` in
// the configuration; there is no fallback derivation from the panel
// URL.

use chrono::Utc;
use guardly_api::billing::BillingClient;
use guardly_api::billing::types::{BillingSubscription, Payment, PaymentQuery, ServerReboot, Tariff};
use guardly_api::panel::PanelClient;
use guardly_api::panel::models::{
    CreateUserRequest, PanelStats, SystemMetrics, UpdateUserRequest, UserStatsRecord,
};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use crate::config::PanelConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{Inbound, Node, User};
use crate::overview::Overview;

/// High-level handle for one panel deployment.
pub struct Panel {
    client: PanelClient,
    billing: Option<BillingClient>,
    base_url: Url,
}

impl Panel {
    /// Connect a panel handle from resolved configuration.
    pub fn connect(config: &PanelConfig) -> Result<Self, CoreError> {
        let client = PanelClient::new(
            config.panel_url.clone(),
            &config.token,
            &config.panel_transport(),
        )?;

        let billing = match &config.billing_url {
            Some(url) => {
                let http = config.billing_transport().build_client()?;
                Some(BillingClient::with_client(http, url.clone()))
            }
            None => None,
        };

        Ok(Self {
            client,
            billing,
            base_url: config.panel_url.clone(),
        })
    }

    fn billing(&self) -> Result<&BillingClient, CoreError> {
        self.billing.as_ref().ok_or_else(|| {
            CoreError::Config(
                "billing operations require `billing_url` in the profile".to_owned(),
            )
        })
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let records = self.client.list_users().await?;
        let now = Utc::now();
        Ok(records
            .iter()
            .map(|r| convert::user_from_record(r, &self.base_url, now))
            .collect())
    }

    pub async fn get_user(&self, id: i64) -> Result<User, CoreError> {
        let record = self.client.get_user(id).await?;
        Ok(convert::user_from_record(&record, &self.base_url, Utc::now()))
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, CoreError> {
        let record = self.client.create_user(request).await?;
        Ok(convert::user_from_record(&record, &self.base_url, Utc::now()))
    }

    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
    ) -> Result<User, CoreError> {
        let record = self.client.update_user(id, request).await?;
        Ok(convert::user_from_record(&record, &self.base_url, Utc::now()))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), CoreError> {
        Ok(self.client.delete_user(id).await?)
    }

    /// Per-protocol subscription links as reported by the panel.
    pub async fn user_subscription(
        &self,
        id: i64,
    ) -> Result<std::collections::HashMap<String, String>, CoreError> {
        Ok(self.client.user_subscription(id).await?)
    }

    /// Raw client configuration map for a user.
    pub async fn user_config(&self, id: i64) -> Result<Map<String, Value>, CoreError> {
        Ok(self.client.user_config(id).await?)
    }

    pub async fn user_stats(&self, id: i64) -> Result<UserStatsRecord, CoreError> {
        Ok(self.client.user_stats(id).await?)
    }

    /// Best-effort subscription link for one user: the panel-provided
    /// fragment wins, then a billing-side lookup, then the conventional
    /// `{base}/sub/{username}` path.
    pub async fn subscription_link(&self, id: i64) -> Result<String, CoreError> {
        let record = self.client.get_user(id).await?;
        let user = convert::user_from_record(&record, &self.base_url, Utc::now());

        if record.subscription_fragment().is_some() {
            return Ok(user.subscription_url);
        }

        if let Some(billing) = &self.billing {
            match billing.subscription_url(id).await {
                Ok(lookup) => {
                    if let Some(url) = lookup.url {
                        return Ok(url);
                    }
                }
                Err(e) => warn!("billing subscription lookup failed: {e}"),
            }
        }

        Ok(user.subscription_url)
    }

    // ── System ───────────────────────────────────────────────────────

    pub async fn system_metrics(&self) -> Result<SystemMetrics, CoreError> {
        Ok(self.client.system_metrics().await?)
    }

    pub async fn stats(&self) -> Result<PanelStats, CoreError> {
        Ok(self.client.stats().await?)
    }

    pub async fn users_stats(&self) -> Result<Value, CoreError> {
        Ok(self.client.users_stats().await?)
    }

    pub async fn nodes_stats(&self) -> Result<Value, CoreError> {
        Ok(self.client.nodes_stats().await?)
    }

    /// Dashboard snapshot from three concurrent fetches.
    ///
    /// A failed fetch degrades its contribution to zeros (with a
    /// warning); the overview only fails when every fetch fails.
    pub async fn overview(&self) -> Result<Overview, CoreError> {
        let (users, metrics, stats) = tokio::join!(
            self.list_users(),
            self.system_metrics(),
            self.stats(),
        );

        if let (Err(users_err), Err(_), Err(_)) = (&users, &metrics, &stats) {
            return Err(CoreError::Api(format!(
                "every overview fetch failed; first error: {users_err}"
            )));
        }

        let users = degrade("user list", users);
        let metrics = degrade("system metrics", metrics);
        let stats = degrade("panel stats", stats);

        Ok(Overview::assemble(
            users.as_deref(),
            metrics.as_ref(),
            stats.as_ref(),
        ))
    }

    // ── Nodes / inbounds ─────────────────────────────────────────────

    pub async fn list_nodes(&self) -> Result<Vec<Node>, CoreError> {
        let records = self.client.list_nodes().await?;
        Ok(records.iter().map(convert::node_from_record).collect())
    }

    pub async fn get_node(&self, id: i64) -> Result<Node, CoreError> {
        let record = self.client.get_node(id).await?;
        Ok(convert::node_from_record(&record))
    }

    pub async fn list_inbounds(&self) -> Result<Vec<Inbound>, CoreError> {
        let records = self.client.list_inbounds().await?;
        Ok(records.iter().map(convert::inbound_from_record).collect())
    }

    pub async fn get_inbound(&self, id: i64) -> Result<Inbound, CoreError> {
        let record = self.client.get_inbound(id).await?;
        Ok(convert::inbound_from_record(&record))
    }

    // ── Billing ──────────────────────────────────────────────────────

    pub async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, CoreError> {
        Ok(self.billing()?.list_payments(query).await?)
    }

    pub async fn get_payment(&self, id: i64) -> Result<Payment, CoreError> {
        Ok(self.billing()?.get_payment(id).await?)
    }

    pub async fn confirm_payment(&self, id: i64) -> Result<Payment, CoreError> {
        Ok(self.billing()?.confirm_payment(id).await?)
    }

    pub async fn list_tariffs(&self) -> Result<Vec<Tariff>, CoreError> {
        Ok(self.billing()?.list_tariffs().await?)
    }

    pub async fn list_subscriptions(
        &self,
        user_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<Vec<BillingSubscription>, CoreError> {
        Ok(self.billing()?.list_subscriptions(user_id, status).await?)
    }

    pub async fn get_subscription(&self, id: i64) -> Result<BillingSubscription, CoreError> {
        Ok(self.billing()?.get_subscription(id).await?)
    }

    pub async fn reboot_server(&self, server_ip: &str) -> Result<ServerReboot, CoreError> {
        Ok(self.billing()?.reboot_server(server_ip).await?)
    }
}

/// Collapse a degraded fetch into `None`, keeping a warning as the
/// visible signal.
fn degrade<T>(what: &str, result: Result<T, CoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("overview: {what} fetch degraded: {e}");
            None
        }
    }
}
