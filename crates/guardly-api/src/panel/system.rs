// System and aggregate-stats endpoints.

use serde_json::Value;

use crate::error::Error;
use crate::panel::client::PanelClient;
use crate::panel::models::{PanelStats, SystemMetrics};

impl PanelClient {
    /// Fetch the server metrics snapshot (`GET system`).
    pub async fn system_metrics(&self) -> Result<SystemMetrics, Error> {
        self.get_json("system").await
    }

    /// Fetch aggregate panel statistics (`GET stats`).
    pub async fn stats(&self) -> Result<PanelStats, Error> {
        self.get_json("stats").await
    }

    /// Raw per-user statistics dump (`GET stats/users`), passed through
    /// untyped since the shape is deployment-specific.
    pub async fn users_stats(&self) -> Result<Value, Error> {
        self.get_value("stats/users").await
    }

    /// Raw per-node statistics dump (`GET stats/nodes`).
    pub async fn nodes_stats(&self) -> Result<Value, Error> {
        self.get_value("stats/nodes").await
    }
}
