// Billing sidecar wire types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tariff plan offered by the billing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub traffic_limit: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Subscription record on the billing side (distinct from the panel's
/// per-protocol subscription links).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSubscription {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub vpn_user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub tariff_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Subscription link lookup result. The sidecar sends the link under
/// `subscription_url`; older builds used a bare `url` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionUrl {
    #[serde(default, alias = "subscription_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement returned from a server reboot request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerReboot {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filter parameters for payment listing.
#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
