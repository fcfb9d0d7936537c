use crate::resource::DiscoveredResource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Derived counts over an inventory's resources. Rebuilt post-dedup; never stored
/// independently of the resource list it summarizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Total resource count.
    pub total_resources: usize,
    /// Count by neutral service name.
    pub resources_by_service: IndexMap<String, usize>,
    /// Count by region (the `"global"` sentinel is kept as its own distinct
    /// bucket rather than folded into the primary region; see DESIGN.md's
    /// resolution of the corresponding open question).
    pub resources_by_region: IndexMap<String, usize>,
    /// Count by neutral resource type.
    pub resources_by_type: IndexMap<String, usize>,
}

impl InventorySummary {
    /// Derive a summary from a resource list.
    pub fn from_resources(resources: &[DiscoveredResource]) -> Self {
        let mut by_service = IndexMap::new();
        let mut by_region = IndexMap::new();
        let mut by_type = IndexMap::new();
        for resource in resources {
            *by_service.entry(resource.service.clone()).or_insert(0) += 1;
            *by_region.entry(resource.region.clone()).or_insert(0) += 1;
            *by_type.entry(resource.resource_type.clone()).or_insert(0) += 1;
        }
        Self {
            total_resources: resources.len(),
            resources_by_service: by_service,
            resources_by_region: by_region,
            resources_by_type: by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::NewResource;

    fn resource(service: &str, region: &str, resource_type: &str, arn: &str) -> DiscoveredResource {
        let new = NewResource::new(arn, arn, "Native::Type", service, region);
        DiscoveredResource {
            id: new.id,
            arn: new.arn,
            resource_type: resource_type.to_string(),
            native_type: new.native_type,
            service: new.service,
            region: new.region,
            name: new.name,
            resource_group: new.resource_group,
            tags: new.tags,
            properties: new.properties,
            relationships: new.relationships,
            created_at: new.created_at,
            status: new.status,
        }
    }

    #[test]
    fn sums_to_total_resources() {
        let resources = vec![
            resource("A", "us-east-1", "aws_a", "arn:a1"),
            resource("A", "us-east-1", "aws_a", "arn:a2"),
            resource("B", "global", "aws_b", "arn:b1"),
        ];
        let summary = InventorySummary::from_resources(&resources);
        assert_eq!(summary.total_resources, 3);
        let sum_by_service: usize = summary.resources_by_service.values().sum();
        assert_eq!(sum_by_service, summary.total_resources);
        assert_eq!(summary.resources_by_service.get("A"), Some(&2));
        assert_eq!(summary.resources_by_service.get("B"), Some(&1));
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = InventorySummary::from_resources(&[]);
        assert_eq!(summary.total_resources, 0);
        assert!(summary.resources_by_service.is_empty());
    }
}
