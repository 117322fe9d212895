//! Saturating counters describing the engine's layout activity.

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    children_placed: u64,
    rows_opened: u64,
    groups_touched: u64,
    cache_cleans: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, children: usize, rows: usize, groups: usize) {
        self.passes = self.passes.saturating_add(1);
        self.children_placed = self.children_placed.saturating_add(children as u64);
        self.rows_opened = self.rows_opened.saturating_add(rows as u64);
        self.groups_touched = self.groups_touched.saturating_add(groups as u64);
    }

    pub fn record_cache_clean(&mut self) {
        self.cache_cleans = self.cache_cleans.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            children_placed: self.children_placed,
            rows_opened: self.rows_opened,
            groups_touched: self.groups_touched,
            cache_cleans: self.cache_cleans,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub children_placed: u64,
    pub rows_opened: u64,
    pub groups_touched: u64,
    pub cache_cleans: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "layout_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("children_placed".to_string(), json!(self.children_placed));
        map.insert("rows_opened".to_string(), json!(self.rows_opened));
        map.insert("groups_touched".to_string(), json!(self.groups_touched));
        map.insert("cache_cleans".to_string(), json!(self.cache_cleans));
        map
    }
}
