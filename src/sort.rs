use serde::Deserialize;
use std::cmp::Ordering;

use crate::models::cluster::Pod;
use crate::quantity::parse_quantity;
use crate::resources::{CPU, MEMORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodSort {
    #[default]
    Name,
    Cpu,
    Memory,
}

impl PodSort {
    pub fn comparator(self) -> impl Fn(&Pod, &Pod) -> Ordering {
        move |a, b| match self {
            PodSort::Name => a.name.cmp(&b.name).then_with(|| a.namespace.cmp(&b.namespace)),
            PodSort::Cpu => requested(b, CPU).total_cmp(&requested(a, CPU)),
            PodSort::Memory => requested(b, MEMORY).total_cmp(&requested(a, MEMORY)),
        }
    }
}

// Ordering only: an unparseable request sorts as zero here and is reported
// by the accounting pass instead.
fn requested(pod: &Pod, key: &str) -> f64 {
    pod.containers
        .iter()
        .filter_map(|c| c.resources.requests.as_ref()?.get(key))
        .map(|q| parse_quantity(q).unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cluster::{Container, ResourceRequirements};

    fn pod(name: &str, namespace: &str, cpu: &str) -> Pod {
        Pod {
            name: name.to_string(),
            namespace: namespace.to_string(),
            containers: vec![Container {
                resources: ResourceRequirements {
                    requests: Some([("cpu".to_string(), cpu.to_string())].into()),
                    limits: None,
                },
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_by_name() {
        let cmp = PodSort::Name.comparator();
        assert_eq!(cmp(&pod("a", "x", "1"), &pod("b", "a", "1")), Ordering::Less);
        assert_eq!(cmp(&pod("a", "b", "1"), &pod("a", "a", "1")), Ordering::Greater);
    }

    #[test]
    fn test_sort_by_cpu_descending() {
        let mut pods = vec![pod("small", "d", "100m"), pod("big", "d", "2"), pod("bad", "d", "??")];
        let cmp = PodSort::Cpu.comparator();
        pods.sort_by(|a, b| cmp(a, b));
        let names: Vec<&str> = pods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["big", "small", "bad"]);
    }

    #[test]
    fn test_sort_from_query_value() {
        let sort: PodSort = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(sort, PodSort::Memory);
    }
}
