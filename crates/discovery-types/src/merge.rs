use crate::relationship::push_relationship;
use crate::resource::DiscoveredResource;
use indexmap::IndexMap;
use serde_json::Value;

/// Deduplicate and merge a resource list keyed on `arn`, preserving the order of
/// each arn's first appearance.
///
/// This is what lets an overlapping coarse scanner (e.g. the AWS Resource-Groups
/// Tagging API) run before a service-specific scanner and still end up superseded:
/// callers arrange for the richer scanner to produce its resources *later* in the
/// input list, and on collision:
/// - scalar fields (name, native_type, status, created_at, ...) take the later
///   resource's value outright;
/// - `tags` are unioned, the later resource winning on key collision;
/// - `properties` are merged key-by-key (when both sides are JSON objects), the
///   later resource winning on key collision — this is how a thin
///   `{discovered_via: "tagging-api"}` view and a rich `{versioning: {...}}` view
///   combine into one resource instead of one clobbering the other outright;
/// - `relationships` are unioned, deduplicated on `(type, target_arn)`.
///
/// `output.len() <= input.len()`, every output resource's arn appeared in the
/// input, and every input arn appears exactly once in the output.
pub fn merge_resources(resources: Vec<DiscoveredResource>) -> Vec<DiscoveredResource> {
    let mut merged: IndexMap<String, DiscoveredResource> = IndexMap::new();
    for incoming in resources {
        match merged.get_mut(&incoming.arn) {
            None => {
                merged.insert(incoming.arn.clone(), incoming);
            }
            Some(existing) => merge_into(existing, incoming),
        }
    }
    merged.into_values().collect()
}

fn merge_into(existing: &mut DiscoveredResource, incoming: DiscoveredResource) {
    let arn = existing.arn.clone();
    let merged_tags = {
        let mut tags = existing.tags.clone();
        for (key, value) in incoming.tags {
            tags.insert(key, value);
        }
        tags
    };
    let merged_properties = merge_properties(existing.properties.clone(), incoming.properties);
    let mut merged_relationships = existing.relationships.clone();
    for relationship in incoming.relationships {
        push_relationship(&mut merged_relationships, &arn, relationship);
    }

    // Later resource wins on every scalar field; this intentionally overwrites
    // `existing` wholesale before re-applying the union'd collection fields above.
    *existing = incoming;
    existing.tags = merged_tags;
    existing.properties = merged_properties;
    existing.relationships = merged_relationships;
}

fn merge_properties(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                base_map.insert(key, value);
            }
            Value::Object(base_map)
        }
        (_, overlay) if !matches!(overlay, Value::Null) => overlay,
        (base, _) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{RelationshipType, ResourceRelationship};
    use crate::resource::NewResource;
    use serde_json::json;

    fn resource(arn: &str, service: &str, properties: Value) -> DiscoveredResource {
        let new = NewResource::new(arn, arn, "Native::Type", service, "us-east-1")
            .with_properties(properties);
        DiscoveredResource {
            id: new.id,
            arn: new.arn,
            resource_type: "aws_s3_bucket".to_string(),
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
    fn dedup_output_len_never_exceeds_input() {
        let resources = vec![
            resource("arn:a", "A", json!({})),
            resource("arn:a", "A", json!({})),
            resource("arn:b", "B", json!({})),
        ];
        let input_len = resources.len();
        let merged = merge_resources(resources);
        assert!(merged.len() <= input_len);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn every_input_arn_present_in_output() {
        let resources = vec![
            resource("arn:a", "A", json!({})),
            resource("arn:b", "B", json!({})),
            resource("arn:a", "A", json!({})),
        ];
        let merged = merge_resources(resources);
        let arns: Vec<&str> = merged.iter().map(|r| r.arn.as_str()).collect();
        assert!(arns.contains(&"arn:a"));
        assert!(arns.contains(&"arn:b"));
    }

    #[test]
    fn tagging_then_specific_scanner_merges_properties() {
        // The tagging-scanner view merges with the richer service-specific view.
        let tagging = resource(
            "arn:aws:s3:::x",
            "resourcegroupstaggingapi",
            json!({"discovered_via": "tagging-api"}),
        );
        let specific = resource(
            "arn:aws:s3:::x",
            "s3",
            json!({"versioning": {"status": "Enabled"}}),
        );
        let merged = merge_resources(vec![tagging, specific]);
        assert_eq!(merged.len(), 1);
        let resource = &merged[0];
        assert_eq!(resource.service, "s3");
        assert_eq!(
            resource.properties,
            json!({
                "discovered_via": "tagging-api",
                "versioning": {"status": "Enabled"},
            })
        );
    }

    #[test]
    fn later_resource_wins_on_scalar_collision() {
        let mut first = resource("arn:a", "A", json!({}));
        first.status = Some("stale".to_string());
        let mut second = resource("arn:a", "A", json!({}));
        second.status = Some("fresh".to_string());
        let merged = merge_resources(vec![first, second]);
        assert_eq!(merged[0].status.as_deref(), Some("fresh"));
    }

    #[test]
    fn tags_union_with_later_key_winning() {
        let mut first = resource("arn:a", "A", json!({}));
        first.tags.insert("Owner".to_string(), "team-a".to_string());
        first.tags.insert("Env".to_string(), "staging".to_string());
        let mut second = resource("arn:a", "A", json!({}));
        second.tags.insert("Env".to_string(), "prod".to_string());
        let merged = merge_resources(vec![first, second]);
        assert_eq!(merged[0].tags.get("Owner").map(String::as_str), Some("team-a"));
        assert_eq!(merged[0].tags.get("Env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn relationships_union_deduplicated() {
        let mut first = resource("arn:a", "A", json!({}));
        first.relationships.push(ResourceRelationship::new(
            RelationshipType::DependsOn,
            "arn:b",
            None,
        ));
        let mut second = resource("arn:a", "A", json!({}));
        second.relationships.push(ResourceRelationship::new(
            RelationshipType::DependsOn,
            "arn:b",
            None,
        ));
        second.relationships.push(ResourceRelationship::new(
            RelationshipType::Contains,
            "arn:c",
            None,
        ));
        let merged = merge_resources(vec![first, second]);
        assert_eq!(merged[0].relationships.len(), 2);
    }

    #[test]
    fn no_collisions_preserves_all_and_first_seen_order() {
        let resources = vec![
            resource("arn:a", "A", json!({})),
            resource("arn:b", "B", json!({})),
            resource("arn:c", "C", json!({})),
        ];
        let merged = merge_resources(resources);
        let arns: Vec<&str> = merged.iter().map(|r| r.arn.as_str()).collect();
        assert_eq!(arns, vec!["arn:a", "arn:b", "arn:c"]);
    }
}
