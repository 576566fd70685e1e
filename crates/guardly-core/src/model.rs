// Canonical domain types.
//
// One resolved value per logical quantity. The aliased, optional,
// deployment-dependent mess lives in `guardly-api`; conversion happens
// in `convert` and consumers only ever see these.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account lifecycle state as reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Disabled,
    Expired,
    /// Anything the panel reports that we don't recognize.
    Unknown,
}

impl UserStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("active") => Self::Active,
            Some("disabled" | "inactive" | "limited") => Self::Disabled,
            Some("expired") => Self::Expired,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

/// A VPN account, fully resolved.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    /// Best available label: username, email local part, or `user #id`.
    pub display_name: String,
    pub email: Option<String>,
    pub protocol: Option<String>,
    pub status: UserStatus,
    pub traffic_limit: i64,
    pub traffic_used: i64,
    /// Expiry as the panel reported it; kept verbatim since formats vary.
    pub expiry: Option<String>,
    pub online_at: Option<DateTime<Utc>>,
    /// Derived: active and seen within the online window.
    pub online: bool,
    /// Fully resolved subscription URL.
    pub subscription_url: String,
}

/// A backend node.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
    pub status: Option<String>,
}

/// An inbound listener.
#[derive(Debug, Clone, Serialize)]
pub struct Inbound {
    pub id: i64,
    pub name: String,
    pub port: Option<u16>,
    pub protocol: Option<String>,
    pub listen: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::UserStatus;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(UserStatus::parse(Some("Active")), UserStatus::Active);
        assert_eq!(UserStatus::parse(Some("DISABLED")), UserStatus::Disabled);
        assert_eq!(UserStatus::parse(Some("expired")), UserStatus::Expired);
    }

    #[test]
    fn unrecognized_status_is_unknown() {
        assert_eq!(UserStatus::parse(Some("on_hold")), UserStatus::Unknown);
        assert_eq!(UserStatus::parse(None), UserStatus::Unknown);
    }
}
