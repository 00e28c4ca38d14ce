//! Per-node accounting of capacity, reservation, requests and usage.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, TopologyError};
use crate::models::cluster::Node;
use crate::quantity::parse_quantity;

pub const CPU: &str = "cpu";
pub const MEMORY: &str = "memory";
pub const PODS: &str = "pods";

/// All values are in the resource's base unit. `used` and `requested` may
/// exceed `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ResourceRecord {
    pub capacity: f64,
    pub reserved: f64,
    pub requested: f64,
    pub used: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NodeResources(BTreeMap<String, ResourceRecord>);

impl NodeResources {
    pub fn get(&self, key: &str) -> Option<&ResourceRecord> {
        self.0.get(key)
    }

    /// Lookup for keys the caller knows must be present.
    pub fn require(&self, key: &str) -> Result<&ResourceRecord> {
        self.0
            .get(key)
            .ok_or_else(|| TopologyError::MissingResourceKey(key.to_string()))
    }
}

/// Derive the resource records of a node.
///
/// Only keys present in `status.capacity` are accounted, except `pods`, which
/// is always present and counts every pod regardless of phase. Requests of
/// `Succeeded` pods are released and not summed. A reservation is passed
/// through unclamped, so allocatable > capacity yields a negative value.
pub fn resource_usage(node: &Node) -> Result<NodeResources> {
    let mut records = BTreeMap::new();

    for (key, capacity) in &node.status.capacity {
        let capacity = parse_quantity(capacity)?;
        let reserved = match node.status.allocatable.get(key) {
            Some(allocatable) => capacity - parse_quantity(allocatable)?,
            None => 0.0,
        };
        let used = match node.usage.as_ref().and_then(|u| u.get(key)) {
            Some(used) => parse_quantity(used)?,
            None => 0.0,
        };
        records.insert(
            key.clone(),
            ResourceRecord {
                capacity,
                reserved,
                requested: 0.0,
                used,
            },
        );
    }

    for pod in node.pods.values().filter(|p| !p.is_succeeded()) {
        for container in &pod.containers {
            let Some(requests) = &container.resources.requests else {
                continue;
            };
            for (key, amount) in requests {
                if let Some(record) = records.get_mut(key) {
                    record.requested += parse_quantity(amount)?;
                }
            }
        }
    }

    let pod_count = node.pods.len() as f64;
    let pods = records.entry(PODS.to_string()).or_default();
    pods.requested = pod_count;
    pods.used = pod_count;

    Ok(NodeResources(records))
}
