// Aliased-field resolution.
//
// Numeric quantities in panel responses arrive under 2-4 alternate key
// names, sometimes nested inside alternate container objects (`mem`,
// `memory`, `system`, `cpu`, `traffic`), depending on backend version.
// Each logical quantity has a fixed candidate table: direct keys first,
// then nested containers, first parseable number wins. Nothing found
// resolves to zero — this layer exists to absorb wire instability, not
// to encode domain logic, and it never fails.

use serde_json::{Map, Value};

/// A logical numeric quantity that may arrive under several names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// CPU utilization percentage.
    CpuPercent,
    /// CPU core count.
    CpuCores,
    /// RAM in use, bytes.
    RamUsed,
    /// RAM installed, bytes.
    RamTotal,
    /// Total traffic, bytes.
    TotalTraffic,
    /// Total upload, bytes.
    TotalUpload,
    /// Total download, bytes.
    TotalDownload,
    /// Currently-online user count.
    OnlineUsers,
}

/// Candidate keys for one quantity: direct top-level names, then
/// `(container, keys-within-container)` pairs, all in priority order.
struct Candidates {
    direct: &'static [&'static str],
    nested: &'static [(&'static str, &'static [&'static str])],
}

fn candidates(quantity: Quantity) -> Candidates {
    match quantity {
        Quantity::CpuPercent => Candidates {
            direct: &["cpu_usage", "cpu_percent"],
            nested: &[
                ("system", &["cpu_usage", "cpu_percent"]),
                ("cpu", &["usage", "percent", "cpu_usage"]),
            ],
        },
        Quantity::CpuCores => Candidates {
            direct: &["cpu_cores"],
            nested: &[
                ("system", &["cpu_cores", "cores"]),
                ("cpu", &["cores", "cpu_cores"]),
            ],
        },
        Quantity::RamUsed => Candidates {
            direct: &["ram_usage", "memory_usage", "mem_used", "mem_usage"],
            nested: &[
                ("mem", &["usage", "used", "mem_usage"]),
                ("memory", &["usage", "used", "memory_usage"]),
                ("system", &["mem_usage", "memory_usage", "ram_usage"]),
            ],
        },
        Quantity::RamTotal => Candidates {
            direct: &["ram_total", "memory_total", "mem_total"],
            nested: &[
                ("system", &["ram_total", "memory_total", "mem_total"]),
                ("memory", &["total", "memory_total"]),
                ("mem", &["total", "mem_total"]),
            ],
        },
        Quantity::TotalTraffic => Candidates {
            direct: &["total_traffic"],
            nested: &[
                ("traffic", &["total", "total_traffic"]),
                ("system", &["total_traffic", "traffic"]),
            ],
        },
        Quantity::TotalUpload => Candidates {
            direct: &["total_up"],
            nested: &[
                ("traffic", &["up", "upload", "total_up"]),
                ("system", &["total_up", "upload"]),
            ],
        },
        Quantity::TotalDownload => Candidates {
            direct: &["total_down"],
            nested: &[
                ("traffic", &["down", "download", "total_down"]),
                ("system", &["total_down", "download"]),
            ],
        },
        Quantity::OnlineUsers => Candidates {
            direct: &["online_users"],
            nested: &[("system", &["online_users"])],
        },
    }
}

/// Resolve a logical quantity from a raw record.
///
/// Total function: returns `0.0` when no candidate field is present.
/// For `RamUsed`, a direct field holding zero is treated as absent
/// (zero usage readings are a known backend artifact), and when no
/// candidate matches at all but `ram_percent` and a total are both
/// available, usage is derived as `round(percent * total / 100)`.
pub fn resolve(quantity: Quantity, record: &Map<String, Value>) -> f64 {
    let table = candidates(quantity);
    let require_nonzero = quantity == Quantity::RamUsed;

    if let Some(v) = lookup_direct(record, table.direct, require_nonzero) {
        return v;
    }
    if let Some(v) = lookup_nested(record, table.nested) {
        return v;
    }
    if quantity == Quantity::RamUsed {
        if let Some(v) = derived_ram_used(record) {
            return v;
        }
    }
    0.0
}

/// Resolve a quantity as a rounded unsigned integer (byte counts, core
/// counts). Negative readings clamp to zero.
pub fn resolve_u64(quantity: Quantity, record: &Map<String, Value>) -> u64 {
    let v = resolve(quantity, record);
    if v.is_finite() && v > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            v.round() as u64
        }
    } else {
        0
    }
}

fn lookup_direct(
    record: &Map<String, Value>,
    keys: &[&str],
    require_nonzero: bool,
) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(numeric))
        .find(|v| !require_nonzero || *v != 0.0)
}

fn lookup_nested(
    record: &Map<String, Value>,
    containers: &[(&str, &[&str])],
) -> Option<f64> {
    for (container, keys) in containers {
        // Only containers that are present and are themselves objects.
        let Some(inner) = record.get(*container).and_then(Value::as_object) else {
            continue;
        };
        if let Some(v) = keys.iter().find_map(|key| inner.get(*key).and_then(numeric)) {
            return Some(v);
        }
    }
    None
}

/// `usage = round(ram_percent * total / 100)` when both are available.
fn derived_ram_used(record: &Map<String, Value>) -> Option<f64> {
    let percent = record.get("ram_percent").and_then(numeric)?;
    let total = resolve(Quantity::RamTotal, record);
    (total > 0.0).then(|| (percent * total / 100.0).round())
}

/// A numeric-typed value, or a string parseable as a number.
/// Non-numeric strings are absent, not errors.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::{Map, Value, json};

    use super::{Quantity, resolve, resolve_u64};

    fn record(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn direct_field_first_candidate_wins() {
        let r = record(json!({"cpu_usage": 12.5, "cpu_percent": 99.0}));
        assert!((resolve(Quantity::CpuPercent, &r) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn direct_field_second_candidate_when_first_absent() {
        let r = record(json!({"cpu_percent": 33.0}));
        assert!((resolve(Quantity::CpuPercent, &r) - 33.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nested_container_consulted_when_direct_absent() {
        let r = record(json!({"system": {"cpu_usage": 41.0}}));
        assert!((resolve(Quantity::CpuPercent, &r) - 41.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nested_container_must_be_an_object() {
        let r = record(json!({"system": "busy", "cpu": {"usage": 7.0}}));
        assert!((resolve(Quantity::CpuPercent, &r) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn string_values_parse_as_numbers() {
        let r = record(json!({"mem": {"used": "2048"}}));
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), 2048);
    }

    #[test]
    fn non_numeric_strings_are_absent() {
        let r = record(json!({"ram_total": "lots", "mem": {"total": 4096}}));
        assert_eq!(resolve_u64(Quantity::RamTotal, &r), 4096);
    }

    #[test]
    fn missing_everywhere_resolves_to_zero() {
        let r = record(json!({"version": "1.2.3"}));
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), 0);
        assert_eq!(resolve_u64(Quantity::TotalTraffic, &r), 0);
        assert!((resolve(Quantity::CpuPercent, &r)).abs() < f64::EPSILON);
    }

    #[test]
    fn ram_used_direct_value_beats_percentage() {
        // Direct nonzero usage wins even when percent*total disagrees.
        let r = record(json!({
            "ram_usage": 1000,
            "ram_percent": 50.0,
            "ram_total": 8000,
        }));
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), 1000);
    }

    #[test]
    fn ram_used_zero_direct_falls_through_to_derived() {
        let total: u64 = 17_179_869_184; // 16 GiB
        let r = record(json!({
            "ram_usage": 0,
            "ram_percent": 54.2,
            "ram_total": total,
        }));
        #[allow(clippy::cast_precision_loss)]
        let expected = (54.2_f64 * total as f64 / 100.0).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = expected as u64;
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), expected);
        // Sanity: roughly 54.2% of 16 GiB.
        assert!(expected > 9_300_000_000 && expected < 9_320_000_000);
    }

    #[test]
    fn ram_used_derived_requires_positive_total() {
        let r = record(json!({"ram_percent": 54.2}));
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), 0);
    }

    #[test]
    fn ram_used_nested_beats_derived() {
        let r = record(json!({
            "mem": {"used": 512},
            "ram_percent": 50.0,
            "ram_total": 8000,
        }));
        assert_eq!(resolve_u64(Quantity::RamUsed, &r), 512);
    }

    #[test]
    fn traffic_quantities_from_traffic_container() {
        let r = record(json!({
            "traffic": {"up": 100, "down": 250, "total": 350}
        }));
        assert_eq!(resolve_u64(Quantity::TotalUpload, &r), 100);
        assert_eq!(resolve_u64(Quantity::TotalDownload, &r), 250);
        assert_eq!(resolve_u64(Quantity::TotalTraffic, &r), 350);
    }

    #[test]
    fn online_users_from_system_container() {
        let r = record(json!({"system": {"online_users": 17}}));
        assert_eq!(resolve_u64(Quantity::OnlineUsers, &r), 17);
    }
}
