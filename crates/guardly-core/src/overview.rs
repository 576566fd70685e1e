// Dashboard overview assembly.
//
// The overview merges three independent fetches (user list, system
// metrics, aggregate stats) into one snapshot. Merge policy: a field
// is only overwritten while it is still zero, except server-reported
// values (the online count and the bandwidth counters), which are
// authoritative and replace what was derived from the user list. The
// reverse never happens.

use guardly_api::panel::models::{PanelStats, SystemMetrics};
use serde::Serialize;

use crate::model::User;

/// Point-in-time dashboard snapshot. Recomputed on every call, no
/// identity, no caching.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overview {
    pub total_users: u64,
    pub active_users: u64,
    pub online_users: u64,
    /// Total traffic in bytes: server bandwidth sum when reported,
    /// otherwise summed per-user usage.
    pub total_traffic: u64,
    pub total_upload: u64,
    pub total_download: u64,
    pub cpu_percent: f64,
    pub cpu_cores: u64,
    pub ram_used: u64,
    pub ram_total: u64,
    pub version: Option<String>,
}

impl Overview {
    /// Merge the three fetch results. Any of them may have failed and
    /// arrive as `None`; its contribution simply stays zero.
    pub fn assemble(
        users: Option<&[User]>,
        metrics: Option<&SystemMetrics>,
        stats: Option<&PanelStats>,
    ) -> Self {
        let mut overview = Self::default();

        if let Some(users) = users {
            overview.apply_users(users);
        }
        if let Some(stats) = stats {
            overview.apply_stats(stats);
        }
        if let Some(metrics) = metrics {
            overview.apply_metrics(metrics);
        }

        overview
    }

    /// Counts and traffic estimate derived from the user list.
    fn apply_users(&mut self, users: &[User]) {
        self.total_users = users.len() as u64;
        self.active_users = users
            .iter()
            .filter(|u| u.status == crate::model::UserStatus::Active)
            .count() as u64;
        self.online_users = users.iter().filter(|u| u.online).count() as u64;
        self.total_traffic = users
            .iter()
            .map(|u| u64::try_from(u.traffic_used).unwrap_or(0))
            .sum();
    }

    /// Aggregate stats fill in whatever is still zero.
    fn apply_stats(&mut self, stats: &PanelStats) {
        merge_if_zero(&mut self.total_users, stats.total_users());
        merge_if_zero(&mut self.active_users, stats.active_users());
        merge_if_zero(&mut self.online_users, stats.online_users());
        merge_if_zero(&mut self.total_traffic, stats.total_traffic());
        merge_if_zero(&mut self.total_upload, stats.total_upload());
        merge_if_zero(&mut self.total_download, stats.total_download());
        merge_if_zero_f64(&mut self.cpu_percent, stats.cpu_percent());
        merge_if_zero(&mut self.cpu_cores, stats.cpu_cores());
        merge_if_zero(&mut self.ram_used, stats.ram_used());
        merge_if_zero(&mut self.ram_total, stats.ram_total());
    }

    /// System metrics fill remaining gaps; server-reported values that
    /// are authoritative (the online count and the bandwidth counters)
    /// override what was derived from the user list, never the reverse.
    fn apply_metrics(&mut self, metrics: &SystemMetrics) {
        merge_if_zero_f64(&mut self.cpu_percent, metrics.cpu_percent());
        merge_if_zero(&mut self.cpu_cores, metrics.cpu_cores());
        merge_if_zero(&mut self.ram_used, metrics.ram_used());
        merge_if_zero(&mut self.ram_total, metrics.ram_total());

        let online = metrics.online_users();
        if online > 0 {
            self.online_users = online;
        }

        if let Some((incoming, outgoing)) = metrics.bandwidth() {
            self.total_download = incoming;
            self.total_upload = outgoing;
            self.total_traffic = incoming.saturating_add(outgoing);
        }

        if self.version.is_none() {
            self.version = metrics.version.clone();
        }
    }
}

fn merge_if_zero(slot: &mut u64, value: u64) {
    if *slot == 0 {
        *slot = value;
    }
}

fn merge_if_zero_f64(slot: &mut f64, value: f64) {
    if *slot == 0.0 {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    use super::Overview;
    use crate::convert::user_from_record;
    use crate::model::User;

    fn users(values: serde_json::Value) -> Vec<User> {
        let base = Url::parse("https://panel.example.com").unwrap();
        let now = Utc::now();
        let records: Vec<guardly_api::panel::models::UserRecord> =
            serde_json::from_value(values).unwrap();
        records
            .iter()
            .map(|r| user_from_record(r, &base, now))
            .collect()
    }

    #[test]
    fn user_list_alone_drives_counts_and_traffic_sum() {
        let users = users(json!([
            {"id": 1, "status": "active", "traffic_used": 100},
            {"id": 2, "status": "disabled", "traffic_used": 50},
        ]));

        let overview = Overview::assemble(Some(&users), None, None);
        assert_eq!(overview.total_users, 2);
        assert_eq!(overview.active_users, 1);
        assert_eq!(overview.total_traffic, 150);
    }

    #[test]
    fn stats_do_not_overwrite_nonzero_user_counts() {
        let users = users(json!([{"id": 1, "status": "active"}]));
        let stats = serde_json::from_value(json!({
            "total_users": 99,
            "cpu_usage": 12.0,
        }))
        .unwrap();

        let overview = Overview::assemble(Some(&users), None, Some(&stats));
        // The user list already said 1; stats must not bump it to 99.
        assert_eq!(overview.total_users, 1);
        // But the CPU slot was empty, so stats fill it.
        assert!((overview.cpu_percent - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn server_bandwidth_overrides_summed_user_traffic() {
        let users = users(json!([{"id": 1, "traffic_used": 5}]));
        let metrics = serde_json::from_value(json!({
            "incoming_bandwidth": 1000,
            "outgoing_bandwidth": 400,
        }))
        .unwrap();

        let overview = Overview::assemble(Some(&users), Some(&metrics), None);
        assert_eq!(overview.total_traffic, 1400);
        assert_eq!(overview.total_download, 1000);
        assert_eq!(overview.total_upload, 400);
    }

    #[test]
    fn metrics_online_count_overrides_derived_count() {
        // One user looks online from the list, but the server says 9.
        let now = chrono::Utc::now().to_rfc3339();
        let users = users(json!([
            {"id": 1, "status": "active", "online_at": now},
        ]));
        let metrics = serde_json::from_value(json!({"online_users": 9})).unwrap();

        let overview = Overview::assemble(Some(&users), Some(&metrics), None);
        assert_eq!(overview.online_users, 9);
    }

    #[test]
    fn derived_online_count_survives_metrics_without_one() {
        let now = chrono::Utc::now().to_rfc3339();
        let users = users(json!([
            {"id": 1, "status": "active", "online_at": now},
        ]));
        let metrics = serde_json::from_value(json!({"cpu_usage": 5.0})).unwrap();

        let overview = Overview::assemble(Some(&users), Some(&metrics), None);
        assert_eq!(overview.online_users, 1);
    }

    #[test]
    fn partial_bandwidth_keeps_derived_estimate() {
        let users = users(json!([{"id": 1, "traffic_used": 5}]));
        let metrics = serde_json::from_value(json!({
            "incoming_bandwidth": 1000,
        }))
        .unwrap();

        let overview = Overview::assemble(Some(&users), Some(&metrics), None);
        assert_eq!(overview.total_traffic, 5);
    }

    #[test]
    fn all_sources_missing_yields_empty_snapshot() {
        let overview = Overview::assemble(None, None, None);
        assert_eq!(overview.total_users, 0);
        assert_eq!(overview.total_traffic, 0);
        assert!(overview.version.is_none());
    }
}
