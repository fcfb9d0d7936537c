use serde::{Deserialize, Serialize};

/// The kind of edge a [`ResourceRelationship`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// The owning resource contains the target (e.g. a subnet contains instances).
    Contains,
    /// The owning resource references the target without owning it.
    References,
    /// The owning resource is attached to the target (e.g. a volume attached to an instance).
    AttachedTo,
    /// The owning resource depends on the target to function.
    DependsOn,
}

/// A directed edge from the resource that owns it to some `target_arn`.
///
/// Dangling targets (an ARN not present elsewhere in the same inventory) are
/// permitted; callers must not assume `target_arn` resolves to a known resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRelationship {
    /// The kind of edge.
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// The provider-scoped identifier of the referent (ARN for AWS, resource ID for Azure).
    pub target_arn: String,
    /// The neutral type of the referent, if known.
    pub target_type: Option<String>,
}

impl ResourceRelationship {
    /// Build a new relationship edge.
    pub fn new(
        relationship_type: RelationshipType,
        target_arn: impl Into<String>,
        target_type: impl Into<Option<String>>,
    ) -> Self {
        Self {
            relationship_type,
            target_arn: target_arn.into(),
            target_type: target_type.into(),
        }
    }

    /// The `(type, target_arn)` identity used to deduplicate edges within one resource.
    pub fn dedupe_key(&self) -> (RelationshipType, &str) {
        (self.relationship_type, self.target_arn.as_str())
    }
}

/// Append `relationship` to `relationships` unless it would self-reference `owner_arn`
/// or duplicate an existing `(type, target_arn)` pair already present.
///
/// This is the single sanctioned way scanners grow a resource's relationship list,
/// so the two invariants from the data model (no self-references, no duplicate
/// edges) can never be violated by construction.
pub fn push_relationship(
    relationships: &mut Vec<ResourceRelationship>,
    owner_arn: &str,
    relationship: ResourceRelationship,
) {
    if relationship.target_arn == owner_arn {
        return;
    }
    if relationships
        .iter()
        .any(|existing| existing.dedupe_key() == relationship.dedupe_key())
    {
        return;
    }
    relationships.push(relationship);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_self_reference() {
        let mut rels = Vec::new();
        push_relationship(
            &mut rels,
            "arn:aws:ec2:us-east-1:1:instance/i-1",
            ResourceRelationship::new(
                RelationshipType::References,
                "arn:aws:ec2:us-east-1:1:instance/i-1",
                Some("aws_instance".to_string()),
            ),
        );
        assert!(rels.is_empty());
    }

    #[test]
    fn dedupes_type_and_target() {
        let mut rels = Vec::new();
        let owner = "arn:aws:ec2:us-east-1:1:instance/i-1";
        for _ in 0..3 {
            push_relationship(
                &mut rels,
                owner,
                ResourceRelationship::new(
                    RelationshipType::AttachedTo,
                    "arn:aws:ec2:us-east-1:1:volume/vol-1",
                    Some("aws_ebs_volume".to_string()),
                ),
            );
        }
        assert_eq!(rels.len(), 1);
    }

    #[test]
    fn allows_same_target_different_type() {
        let mut rels = Vec::new();
        let owner = "arn:aws:ec2:us-east-1:1:instance/i-1";
        push_relationship(
            &mut rels,
            owner,
            ResourceRelationship::new(
                RelationshipType::AttachedTo,
                "arn:aws:ec2:us-east-1:1:volume/vol-1",
                None,
            ),
        );
        push_relationship(
            &mut rels,
            owner,
            ResourceRelationship::new(
                RelationshipType::References,
                "arn:aws:ec2:us-east-1:1:volume/vol-1",
                None,
            ),
        );
        assert_eq!(rels.len(), 2);
    }
}
