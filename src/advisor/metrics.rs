use std::collections::BTreeMap;
use std::sync::RwLock;

/// Counter sink for advisor events.
pub trait Metrics: Send + Sync {
    fn increment(&self, name: &str, labels: &[(&str, &str)]);
}

/// Writes each increment to the debug log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMetrics;

impl Metrics for LogMetrics {
    fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        log::debug!("metric {}{}", name, render(labels));
    }
}

/// In-memory counters, kept per name and per labelled series.
#[derive(Debug, Default)]
pub struct Counters(RwLock<BTreeMap<String, u64>>);

impl Counters {
    /// Total across every label set.
    pub fn get(&self, name: &str) -> u64 {
        self.0.read().ok().and_then(|m| m.get(name).copied()).unwrap_or(0)
    }
    /// Count for one labelled series, e.g. `policy_lookup_miss{node_key=..}`.
    pub fn series(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        let ref key = format!("{}{}", name, render(labels));
        self.0.read().ok().and_then(|m| m.get(key).copied()).unwrap_or(0)
    }
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.0.read().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Metrics for Counters {
    fn increment(&self, name: &str, labels: &[(&str, &str)]) {
        if let Ok(mut map) = self.0.write() {
            *map.entry(name.to_string()).or_default() += 1;
            if !labels.is_empty() {
                *map.entry(format!("{}{}", name, render(labels))).or_default() += 1;
            }
        }
    }
}

fn render(labels: &[(&str, &str)]) -> String {
    match labels {
        [] => String::new(),
        labels => format!(
            "{{{}}}",
            labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(",")
        ),
    }
}
