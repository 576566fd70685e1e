// Raw-wire to canonical conversion.
//
// Everything in here is a total function: malformed timestamps, blank
// fragments, and missing fields degrade to sensible defaults rather
// than errors, because a panel that reports garbage for one user must
// not break the whole listing.

use chrono::{DateTime, Duration, Utc};
use guardly_api::panel::models::{InboundRecord, NodeRecord, UserRecord};
use url::Url;

use crate::model::{Inbound, Node, User, UserStatus};

/// How recently a user must have connected to count as online.
pub const ONLINE_WINDOW: Duration = Duration::minutes(5);

/// Build a canonical `User` from a wire record.
///
/// `base` is the configured panel URL (used for subscription URL
/// resolution); `now` is injected for testability.
pub fn user_from_record(record: &UserRecord, base: &Url, now: DateTime<Utc>) -> User {
    let status = UserStatus::parse(record.status.as_deref());
    let online_at = record
        .online_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let display_name = display_name(record);
    let subscription_url = resolve_subscription_url(
        record.subscription_fragment(),
        base,
        record.username.as_deref().unwrap_or(&display_name),
    );

    User {
        id: record.id,
        username: record.username.clone(),
        display_name,
        email: record.email.clone(),
        protocol: record.protocol.clone(),
        status,
        traffic_limit: record.traffic_limit(),
        traffic_used: record.traffic_used(),
        expiry: record.expiry().map(str::to_owned),
        online_at,
        online: is_online(status, online_at, now),
        subscription_url,
    }
}

/// Username → email local part → `user #id`.
fn display_name(record: &UserRecord) -> String {
    if let Some(username) = record.username.as_deref() {
        let trimmed = username.trim();
        if !trimmed.is_empty() {
            return trimmed.to_owned();
        }
    }
    if let Some(email) = record.email.as_deref() {
        let local = email.split('@').next().unwrap_or_default().trim();
        if !local.is_empty() {
            return local.to_owned();
        }
    }
    format!("user #{}", record.id)
}

/// Online means: currently active AND last seen within the window.
/// A missing or unparseable timestamp is offline, never an error.
pub fn is_online(status: UserStatus, online_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    status == UserStatus::Active
        && online_at.is_some_and(|seen| now.signed_duration_since(seen) <= ONLINE_WINDOW)
}

/// Resolve a subscription URL from whatever the panel gave us.
///
/// Anything starting with `http` passes through untouched; relative
/// fragments are joined to the trimmed panel base with exactly one
/// slash; when the panel sent nothing, the conventional
/// `{base}/sub/{username}` path is assumed.
pub fn resolve_subscription_url(fragment: Option<&str>, base: &Url, username: &str) -> String {
    let trimmed_base = base.as_str().trim_end_matches('/');
    match fragment {
        Some(raw) if raw.starts_with("http") => raw.to_owned(),
        Some(raw) => format!("{trimmed_base}/{}", raw.trim_start_matches('/')),
        None => format!("{trimmed_base}/sub/{username}"),
    }
}

/// Node record, canonicalized.
pub fn node_from_record(record: &NodeRecord) -> Node {
    Node {
        id: record.id,
        name: record.name.clone(),
        address: record.address.clone(),
        port: record.port,
        status: record.status.clone(),
    }
}

/// Inbound record, canonicalized.
pub fn inbound_from_record(record: &InboundRecord) -> Inbound {
    Inbound {
        id: record.id,
        name: record.name.clone(),
        port: record.port,
        protocol: record.protocol.clone(),
        listen: record.listen.clone(),
    }
}
