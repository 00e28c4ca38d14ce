use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use crate::models::cluster::Node;
use crate::quantity::GI;
use crate::resources::{CPU, MEMORY, NodeResources, PODS};

pub fn ellipsize(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let mut s: String = name.chars().take(max_chars).collect();
        s.push('…');
        s
    } else {
        name.to_string()
    }
}

/// Hover text for a node's gauges. Sections for absent resources are skipped.
pub fn resource_tooltip(resources: &NodeResources) -> String {
    let mut sections = Vec::new();

    if let Some(cpu) = resources.get(CPU) {
        sections.push(format!(
            "CPU:\n\t\t Capacity  : {}\n\t\t Reserved  : {:.2}\n\t\t Requested : {:.2}\n\t\t Used      : {:.2}\n",
            cpu.capacity, cpu.reserved, cpu.requested, cpu.used
        ));
    }
    if let Some(mem) = resources.get(MEMORY) {
        sections.push(format!(
            "Memory:\n\t\t Capacity  : {:.2} GiB\n\t\t Reserved  : {:.2} GiB\n\t\t Requested : {:.2} GiB\n\t\t Used      : {:.2} GiB\n",
            mem.capacity / GI,
            mem.reserved / GI,
            mem.requested / GI,
            mem.used / GI
        ));
    }
    if let Some(pods) = resources.get(PODS) {
        sections.push(format!(
            "Pods:\n\t\t Capacity  : {}\n\t\t Used      : {}\n",
            pods.capacity, pods.used
        ));
    }

    sections.join("\n")
}

pub fn labels_tooltip(node: &Node) -> String {
    let mut s = node.name.clone();
    s.push_str("\nLabels:");
    for (key, value) in &node.labels {
        s.push_str(&format!("\n  {}: {}", key, value));
    }
    s
}

/// Opacity of a cluster drawing given the age of its snapshot. Stale
/// clusters pulse once per second between 0.4 and 1.0.
pub fn pulse_opacity(stale_secs: f64, stale_after_secs: f64, phase_ms: u64) -> f64 {
    if stale_secs <= stale_after_secs {
        return 1.0;
    }
    let v = ((phase_ms % 1000) as f64 / 1000.0 * PI).sin();
    0.4 + v * 0.6
}

pub fn refreshed_ago(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - t).num_seconds();
    if secs < 5 {
        "just now".to_string()
    } else if secs < 120 {
        format!("{} seconds ago", secs)
    } else if secs < 7200 {
        format!("{} minutes ago", secs / 60)
    } else if secs < 2 * 86400 {
        format!("{} hours ago", secs / 3600)
    } else {
        t.format("%b %e, %Y").to_string()
    }
}
