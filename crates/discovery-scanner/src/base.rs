//! Free-function helpers shared across concrete scanners.
//!
//! These are deliberately free functions rather than methods on a scanner base
//! class: the `ServiceScanner` trait has no inheritance root, so a scanner
//! composes whichever of these helpers it needs.

use discovery_types::{DiscoveredResource, NewResource};
use indexmap::IndexMap;
use serde_json::Value;

/// Value substituted for a sensitive field's contents during the map phase.
pub const REDACTED: &str = "[REDACTED]";

/// Case-insensitive substrings that mark a properties key as sensitive: TLS
/// certificate/key bodies, captured header values, and OIDC/OAuth issuer
/// secrets are the fields describe-call responses are known to carry.
const SENSITIVE_KEY_MARKERS: &[&str] = &[
    "certificate",
    "cert_body",
    "certbody",
    "private_key",
    "privatekey",
    "client_secret",
    "clientsecret",
    "issuer_secret",
    "header_value",
    "headervalue",
    "secret",
    "password",
];

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_KEY_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Walk a properties value and replace any object value keyed by something
/// that looks sensitive with [`REDACTED`], recursing into nested objects and
/// arrays. Scalars and non-sensitive keys pass through unchanged.
pub fn redact_sensitive_properties(properties: Value) -> Value {
    match properties {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if is_sensitive_key(&key) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact_sensitive_properties(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_sensitive_properties).collect()),
        other => other,
    }
}

/// Construct a [`DiscoveredResource`] from a [`NewResource`], resolving
/// `native_type` to a neutral `type` via `resolve_type` (a per-provider
/// native-to-neutral lookup with a deterministic fallback already folded in)
/// and redacting sensitive fields out of `properties`.
pub fn create_resource(
    new: NewResource,
    resolve_type: impl Fn(&str) -> String,
) -> DiscoveredResource {
    let resource_type = resolve_type(&new.native_type);
    DiscoveredResource {
        id: new.id,
        arn: new.arn,
        resource_type,
        native_type: new.native_type,
        service: new.service,
        region: new.region,
        name: new.name,
        resource_group: new.resource_group,
        tags: new.tags,
        properties: redact_sensitive_properties(new.properties),
        relationships: new.relationships,
        created_at: new.created_at,
        status: new.status,
    }
}

/// One tag as returned by a provider's describe/list API, before normalization.
/// Covers both common native shapes: `{Key, Value}` (AWS) and `{key, value}`
/// (Azure, lowercased already as a JSON map — see `tags_from_map` for that shape).
#[derive(Debug, Clone)]
pub struct NativeTag {
    /// The tag key, if present. A tag with no key is dropped.
    pub key: Option<String>,
    /// The tag value. Absent or empty becomes `""`.
    pub value: Option<String>,
}

/// Normalize a list of `{Key, Value}`-shaped native tags into the canonical
/// mapping. Entries without a key are dropped; a missing/empty value becomes
/// `""`. Insensitive to input order on output-map equality.
pub fn tags_to_record(native_tags: impl IntoIterator<Item = NativeTag>) -> IndexMap<String, String> {
    let mut tags = IndexMap::new();
    for tag in native_tags {
        if let Some(key) = tag.key {
            if key.is_empty() {
                continue;
            }
            tags.insert(key, tag.value.unwrap_or_default());
        }
    }
    tags
}

/// Normalize a provider's native `{key: value}` tag map (Azure's shape) into the
/// canonical mapping. Values are never null in the canonical map.
pub fn tags_from_map(native_tags: impl IntoIterator<Item = (String, Option<String>)>) -> IndexMap<String, String> {
    native_tags
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect()
}

/// Return the value of the `Name` tag, or `fallback` if absent.
pub fn get_name_from_tags(tags: &IndexMap<String, String>, fallback: &str) -> String {
    tags.get("Name")
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// Parameters for [`build_arn`].
#[derive(Debug, Clone)]
pub struct ArnParams<'a> {
    /// ARN partition. Defaults to `"aws"`.
    pub partition: Option<&'a str>,
    /// Service namespace segment (e.g. `"ec2"`, `"s3"`).
    pub service: &'a str,
    /// Region segment. Empty for global services.
    pub region: &'a str,
    /// Account id segment.
    pub account_id: &'a str,
    /// Resource-type segment, if the service's ARN format includes one.
    pub resource_type: Option<&'a str>,
    /// Resource identifier segment.
    pub resource: &'a str,
}

/// Deterministically build an ARN: `arn:{partition}:{service}:{region}:{account}:{resourceType?/}resource`.
pub fn build_arn(params: ArnParams<'_>) -> String {
    let partition = params.partition.unwrap_or("aws");
    let resource_part = match params.resource_type {
        Some(resource_type) => format!("{resource_type}/{}", params.resource),
        None => params.resource.to_string(),
    };
    format!(
        "arn:{partition}:{}:{}:{}:{resource_part}",
        params.service, params.region, params.account_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_arn_with_resource_type() {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "ec2",
            region: "us-east-1",
            account_id: "123456789012",
            resource_type: Some("instance"),
            resource: "i-0abc123",
        });
        assert_eq!(arn, "arn:aws:ec2:us-east-1:123456789012:instance/i-0abc123");
    }

    #[test]
    fn builds_arn_without_resource_type() {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "s3",
            region: "",
            account_id: "123456789012",
            resource_type: None,
            resource: "my-bucket",
        });
        assert_eq!(arn, "arn:aws:s3::123456789012:my-bucket");
    }

    #[test]
    fn tags_to_record_drops_keyless_entries_and_defaults_empty_value() {
        let tags = tags_to_record(vec![
            NativeTag { key: Some("Name".into()), value: Some("web-1".into()) },
            NativeTag { key: None, value: Some("orphan".into()) },
            NativeTag { key: Some("Empty".into()), value: None },
        ]);
        assert_eq!(tags.get("Name").map(String::as_str), Some("web-1"));
        assert_eq!(tags.get("Empty").map(String::as_str), Some(""));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn tags_to_record_is_order_insensitive_on_output() {
        let a = tags_to_record(vec![
            NativeTag { key: Some("A".into()), value: Some("1".into()) },
            NativeTag { key: Some("B".into()), value: Some("2".into()) },
        ]);
        let b = tags_to_record(vec![
            NativeTag { key: Some("B".into()), value: Some("2".into()) },
            NativeTag { key: Some("A".into()), value: Some("1".into()) },
        ]);
        assert_eq!(a.into_iter().collect::<std::collections::BTreeMap<_, _>>(),
                   b.into_iter().collect::<std::collections::BTreeMap<_, _>>());
    }

    #[test]
    fn name_from_tags_falls_back() {
        let tags = IndexMap::new();
        assert_eq!(get_name_from_tags(&tags, "i-0abc123"), "i-0abc123");
    }

    #[test]
    fn redacts_sensitive_keys_at_any_depth() {
        let properties = serde_json::json!({
            "discoveredVia": "describe-call",
            "tlsCertificateBody": "-----BEGIN CERTIFICATE-----...",
            "oidc": { "issuerSecret": "s3cr3t", "issuerUrl": "https://issuer.example.com" },
            "headers": [{ "name": "Authorization", "headerValue": "Bearer abc" }],
        });
        let redacted = redact_sensitive_properties(properties);
        assert_eq!(redacted["discoveredVia"], "describe-call");
        assert_eq!(redacted["tlsCertificateBody"], REDACTED);
        assert_eq!(redacted["oidc"]["issuerSecret"], REDACTED);
        assert_eq!(redacted["oidc"]["issuerUrl"], "https://issuer.example.com");
        assert_eq!(redacted["headers"][0]["headerValue"], REDACTED);
        assert_eq!(redacted["headers"][0]["name"], "Authorization");
    }

    #[test]
    fn create_resource_redacts_properties() {
        let new = NewResource::new("id-1", "arn:aws:example", "AWS::Example::Thing", "example", "us-east-1")
            .with_properties(serde_json::json!({ "clientSecret": "hunter2" }));
        let resource = create_resource(new, |native| native.to_string());
        assert_eq!(resource.properties["clientSecret"], REDACTED);
    }
}
