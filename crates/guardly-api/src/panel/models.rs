// Panel API wire types.
//
// The panel API is inconsistent about field names across deployments:
// the same logical value arrives under 2-3 alternate keys, so every
// aliased field is kept as its own `Option` and resolution happens in
// accessors (or in `guardly-core` conversion). `#[serde(default)]` is
// used liberally because field presence varies by backend version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolve::{Quantity, resolve, resolve_u64};

// ── User ─────────────────────────────────────────────────────────────

/// User object as the panel sends it, aliases and all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    /// Alternate key for `expiry`.
    #[serde(default)]
    pub expire: Option<String>,
    #[serde(default)]
    pub traffic_limit: Option<i64>,
    /// Alternate key for `traffic_limit`.
    #[serde(default)]
    pub data_limit: Option<i64>,
    #[serde(default)]
    pub traffic_used: Option<i64>,
    /// Alternate key for `traffic_used`.
    #[serde(default)]
    pub used_traffic: Option<i64>,
    /// Lifetime counter; preferred over the per-period fields.
    #[serde(default)]
    pub lifetime_used_traffic: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last-connection timestamp (RFC 3339), used for online derivation.
    #[serde(default)]
    pub online_at: Option<String>,
    #[serde(default)]
    pub subscription_url: Option<String>,
    /// Alternate key for `subscription_url`.
    #[serde(default)]
    pub subscription: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Canonical traffic limit: `traffic_limit` → `data_limit` → 0.
    pub fn traffic_limit(&self) -> i64 {
        self.traffic_limit.or(self.data_limit).unwrap_or(0)
    }

    /// Canonical traffic used: lifetime counter first (it survives
    /// resets), then `traffic_used`, then `used_traffic`, then 0.
    pub fn traffic_used(&self) -> i64 {
        self.lifetime_used_traffic
            .or(self.traffic_used)
            .or(self.used_traffic)
            .unwrap_or(0)
    }

    /// Canonical expiry timestamp string.
    pub fn expiry(&self) -> Option<&str> {
        self.expiry.as_deref().or(self.expire.as_deref())
    }

    /// Raw subscription fragment, whichever alias carried it.
    pub fn subscription_fragment(&self) -> Option<&str> {
        let raw = self
            .subscription_url
            .as_deref()
            .or(self.subscription.as_deref())?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Request body for user creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub protocol: String,
    pub inbound_id: i64,
    pub expiry: String,
    pub traffic_limit: i64,
}

impl CreateUserRequest {
    /// New request with the panel's default protocol.
    pub fn new(username: impl Into<String>, inbound_id: i64, expiry: impl Into<String>, traffic_limit: i64) -> Self {
        Self {
            username: username.into(),
            email: None,
            protocol: "vless".to_owned(),
            inbound_id,
            expiry: expiry.into(),
            traffic_limit,
        }
    }
}

/// Request body for user update / soft-deactivation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Per-user stats from `GET users/{id}/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsRecord {
    #[serde(default)]
    pub traffic_used: Option<i64>,
    #[serde(default)]
    pub used_traffic: Option<i64>,
    #[serde(default)]
    pub traffic_limit: Option<i64>,
    #[serde(default)]
    pub data_limit: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserStatsRecord {
    pub fn traffic_used(&self) -> i64 {
        self.traffic_used.or(self.used_traffic).unwrap_or(0)
    }

    pub fn traffic_limit(&self) -> i64 {
        self.traffic_limit.or(self.data_limit).unwrap_or(0)
    }
}

// ── Nodes / Inbounds ─────────────────────────────────────────────────

/// Node reference record from `GET nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inbound reference record from `GET inbounds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub listen: Option<String>,
    #[serde(default)]
    pub settings: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── System metrics ───────────────────────────────────────────────────

/// Server snapshot from `GET system`.
///
/// Everything except version info is kept as the raw field bag and read
/// through the resolver, because the numeric fields move between names
/// and containers across backend versions. Ephemeral — recomputed on
/// every poll, no identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build_time: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SystemMetrics {
    pub fn cpu_percent(&self) -> f64 {
        resolve(Quantity::CpuPercent, &self.fields)
    }

    pub fn cpu_cores(&self) -> u64 {
        resolve_u64(Quantity::CpuCores, &self.fields)
    }

    pub fn ram_used(&self) -> u64 {
        resolve_u64(Quantity::RamUsed, &self.fields)
    }

    pub fn ram_total(&self) -> u64 {
        resolve_u64(Quantity::RamTotal, &self.fields)
    }

    /// RAM utilization derived from the resolved used/total pair.
    pub fn ram_percent(&self) -> f64 {
        let total = self.ram_total();
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.ram_used() as f64 / total as f64 * 100.0
        }
    }

    pub fn online_users(&self) -> u64 {
        resolve_u64(Quantity::OnlineUsers, &self.fields)
    }

    /// Server-side bandwidth counters, only when both directions are
    /// reported. The overview prefers these over summed per-user usage.
    pub fn bandwidth(&self) -> Option<(u64, u64)> {
        let incoming = self.fields.get("incoming_bandwidth")?.as_u64()?;
        let outgoing = self.fields.get("outgoing_bandwidth")?.as_u64()?;
        Some((incoming, outgoing))
    }
}

/// Aggregate stats from `GET stats`, same resolver treatment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelStats {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PanelStats {
    pub fn total_users(&self) -> u64 {
        self.fields
            .get("total_users")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn active_users(&self) -> u64 {
        self.fields
            .get("active_users")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Online count, falling back to the active count when the backend
    /// doesn't report online users at all.
    pub fn online_users(&self) -> u64 {
        let online = resolve_u64(Quantity::OnlineUsers, &self.fields);
        if online > 0 || self.fields.contains_key("online_users") {
            online
        } else {
            self.active_users()
        }
    }

    pub fn cpu_percent(&self) -> f64 {
        resolve(Quantity::CpuPercent, &self.fields)
    }

    pub fn cpu_cores(&self) -> u64 {
        resolve_u64(Quantity::CpuCores, &self.fields)
    }

    pub fn ram_used(&self) -> u64 {
        resolve_u64(Quantity::RamUsed, &self.fields)
    }

    pub fn ram_total(&self) -> u64 {
        resolve_u64(Quantity::RamTotal, &self.fields)
    }

    pub fn total_traffic(&self) -> u64 {
        resolve_u64(Quantity::TotalTraffic, &self.fields)
    }

    pub fn total_upload(&self) -> u64 {
        resolve_u64(Quantity::TotalUpload, &self.fields)
    }

    pub fn total_download(&self) -> u64 {
        resolve_u64(Quantity::TotalDownload, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::{SystemMetrics, UserRecord};

    #[test]
    fn user_aliases_resolve_in_priority_order() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 5,
            "data_limit": 100,
            "traffic_used": 30,
            "used_traffic": 20,
            "lifetime_used_traffic": 70,
            "expire": "2026-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(user.traffic_limit(), 100);
        assert_eq!(user.traffic_used(), 70);
        assert_eq!(user.expiry(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn user_defaults_to_zero_when_nothing_present() {
        let user: UserRecord = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(user.traffic_limit(), 0);
        assert_eq!(user.traffic_used(), 0);
        assert!(user.expiry().is_none());
        assert!(user.subscription_fragment().is_none());
    }

    #[test]
    fn blank_subscription_fragment_is_absent() {
        let user: UserRecord =
            serde_json::from_value(json!({"id": 1, "subscription_url": "  "})).unwrap();
        assert!(user.subscription_fragment().is_none());
    }

    #[test]
    fn metrics_survive_nested_container_shape() {
        let metrics: SystemMetrics = serde_json::from_value(json!({
            "version": "1.4.0",
            "mem": {"used": 1024, "total": 4096},
            "cpu_percent": "22.5",
        }))
        .unwrap();

        assert_eq!(metrics.ram_used(), 1024);
        assert_eq!(metrics.ram_total(), 4096);
        assert!((metrics.cpu_percent() - 22.5).abs() < f64::EPSILON);
        assert!((metrics.ram_percent() - 25.0).abs() < f64::EPSILON);
        assert!(metrics.bandwidth().is_none());
    }
}
