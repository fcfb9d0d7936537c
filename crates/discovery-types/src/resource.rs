use crate::relationship::ResourceRelationship;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The canonical, provider-neutral unit of the inventory graph.
///
/// Every scanner maps its provider's DTOs into this shape. `arn` is the sole
/// identity used by deduplication and merge (see [`crate::merge_resources`]);
/// two resources with the same `arn` are the same resource, full stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredResource {
    /// Provider-scoped identifier, stable across scans of the same resource.
    pub id: String,
    /// Globally-unique identifier: an ARN for AWS, a resource ID for Azure.
    pub arn: String,
    /// Provider-neutral type, derived from `native_type` via a pure mapping.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The provider-native type string (e.g. `AWS::S3::Bucket`).
    pub native_type: String,
    /// The scanner's service name (e.g. `ec2`, `s3`).
    pub service: String,
    /// The resource's region, or the sentinel `"global"` for global-service resources.
    pub region: String,
    /// Human-friendly name, if one could be derived (e.g. from a `Name` tag).
    pub name: Option<String>,
    /// Azure-only: the resource group this resource belongs to.
    pub resource_group: Option<String>,
    /// Tags. Never absent — an empty map stands in for "no tags".
    #[serde(default)]
    pub tags: IndexMap<String, String>,
    /// Open, provider-specific properties, shaped like the provider's describe-call
    /// response with sensitive fields redacted.
    #[serde(default = "default_properties")]
    pub properties: Value,
    /// Outbound relationship edges from this resource.
    #[serde(default)]
    pub relationships: Vec<ResourceRelationship>,
    /// Creation timestamp, if the provider exposes one.
    pub created_at: Option<DateTime<Utc>>,
    /// Provider-reported status/state string, if any.
    pub status: Option<String>,
}

fn default_properties() -> Value {
    Value::Object(Default::default())
}

/// Sentinel used for `region` on resources produced by a scanner whose
/// `ServiceScanner::is_global()` is `true`.
pub const GLOBAL_REGION: &str = "global";

/// Parameters accepted by the scanner base helper that constructs a
/// [`DiscoveredResource`]. Kept separate from the resource itself so callers can't
/// forget a required field and so defaulting (empty tags, empty relationships,
/// `type` derived rather than supplied) happens in exactly one place.
#[derive(Debug, Clone)]
pub struct NewResource {
    /// See [`DiscoveredResource::id`].
    pub id: String,
    /// See [`DiscoveredResource::arn`].
    pub arn: String,
    /// See [`DiscoveredResource::native_type`].
    pub native_type: String,
    /// See [`DiscoveredResource::service`].
    pub service: String,
    /// See [`DiscoveredResource::region`].
    pub region: String,
    /// See [`DiscoveredResource::name`].
    pub name: Option<String>,
    /// See [`DiscoveredResource::resource_group`].
    pub resource_group: Option<String>,
    /// See [`DiscoveredResource::tags`].
    pub tags: IndexMap<String, String>,
    /// See [`DiscoveredResource::properties`].
    pub properties: Value,
    /// See [`DiscoveredResource::relationships`].
    pub relationships: Vec<ResourceRelationship>,
    /// See [`DiscoveredResource::created_at`].
    pub created_at: Option<DateTime<Utc>>,
    /// See [`DiscoveredResource::status`].
    pub status: Option<String>,
}

impl NewResource {
    /// Start building a [`NewResource`] with only the required identity fields set.
    pub fn new(
        id: impl Into<String>,
        arn: impl Into<String>,
        native_type: impl Into<String>,
        service: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            arn: arn.into(),
            native_type: native_type.into(),
            service: service.into(),
            region: region.into(),
            name: None,
            resource_group: None,
            tags: IndexMap::new(),
            properties: default_properties(),
            relationships: Vec::new(),
            created_at: None,
            status: None,
        }
    }

    /// Set the resource's name.
    pub fn with_name(mut self, name: impl Into<Option<String>>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the resource's tags.
    pub fn with_tags(mut self, tags: IndexMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the resource's properties.
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    /// Set the resource's relationships.
    pub fn with_relationships(mut self, relationships: Vec<ResourceRelationship>) -> Self {
        self.relationships = relationships;
        self
    }

    /// Set the resource's Azure resource group.
    pub fn with_resource_group(mut self, resource_group: impl Into<Option<String>>) -> Self {
        self.resource_group = resource_group.into();
        self
    }

    /// Set the resource's creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<Option<DateTime<Utc>>>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Set the resource's status.
    pub fn with_status(mut self, status: impl Into<Option<String>>) -> Self {
        self.status = status.into();
        self
    }
}
