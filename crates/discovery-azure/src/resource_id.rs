use thiserror::Error;

/// A parsed Azure resource ID (distinct in shape from an AWS ARN; Azure's own
/// `resourceId` identity format).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResourceId {
    /// Subscription id segment.
    pub subscription_id: String,
    /// Resource group name segment.
    pub resource_group: String,
    /// Resource provider namespace (e.g. `Microsoft.Storage`).
    pub provider_namespace: String,
    /// Resource type segment (e.g. `storageAccounts`), possibly with a nested
    /// `parentType/parentName/childType` chain joined by `/`.
    pub resource_type: String,
    /// Resource name segment.
    pub resource_name: String,
}

/// Why [`parse_resource_id`] rejected an input string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceIdParseError {
    /// The id didn't start with `/subscriptions/`.
    #[error("not an Azure resource id (missing /subscriptions/ prefix): {0:?}")]
    MissingSubscriptionsPrefix(String),
    /// Too few path segments to contain subscription/resourceGroup/provider/type/name.
    #[error("Azure resource id has too few segments: {0:?}")]
    TooFewSegments(String),
}

/// Build an Azure resource ID:
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{type}/{name}`.
pub fn build_resource_id(
    subscription_id: &str,
    resource_group: &str,
    provider_namespace: &str,
    resource_type: &str,
    resource_name: &str,
) -> String {
    format!(
        "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/{provider_namespace}/{resource_type}/{resource_name}"
    )
}

/// Parse an Azure resource ID produced by [`build_resource_id`] (or the real
/// Azure Resource Manager). Never panics; malformed input is reported as `Err`.
pub fn parse_resource_id(id: &str) -> Result<ParsedResourceId, ResourceIdParseError> {
    let trimmed = id.trim_start_matches('/');
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.first().copied() != Some("subscriptions") {
        return Err(ResourceIdParseError::MissingSubscriptionsPrefix(id.to_string()));
    }
    if segments.len() < 7 {
        return Err(ResourceIdParseError::TooFewSegments(id.to_string()));
    }
    let subscription_id = segments[1].to_string();
    let resource_group = segments[3].to_string();
    let provider_namespace = segments[5].to_string();
    let resource_type = segments[6].to_string();
    let resource_name = segments.get(7).copied().unwrap_or("").to_string();

    Ok(ParsedResourceId {
        subscription_id,
        resource_group,
        provider_namespace,
        resource_type,
        resource_name,
    })
}
