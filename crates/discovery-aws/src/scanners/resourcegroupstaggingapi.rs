use crate::arn::parse_arn;
use crate::clients::{tags_to_map, TaggedResourceDto, TaggingClient};
use crate::types::{native_type_from_arn_parts, resolve_type};
use async_trait::async_trait;
use discovery_ratelimit::RateLimiterError;
use discovery_scanner::{
    collect_all, create_resource, get_name_from_tags, paginate, ScanBuffer, ScanOutcome, ScannerContext,
    ServiceScanner,
};
use discovery_types::{NewResource, ScanError};
use serde_json::json;
use std::sync::Arc;

/// The cross-service Resource Groups Tagging API scanner. Its view of a resource is thin — it only ever sees an ARN and tags — so
/// when a service-specific scanner later emits the same ARN with a richer
/// `properties` value, the dedup/merge step in `discovery-types` lets that richer
/// view supersede this one. Regional per the real API, despite scanning "every"
/// service's resources in one call.
#[derive(Debug)]
pub struct ResourceGroupsTaggingApiScanner {
    client: Arc<dyn TaggingClient>,
}

impl ResourceGroupsTaggingApiScanner {
    /// Build a scanner over the given region-scoped tagging client.
    pub fn new(client: Arc<dyn TaggingClient>) -> Self {
        Self { client }
    }

    /// Map one tagging-API row into a resource, or `None` if its ARN is malformed.
    fn map(&self, dto: TaggedResourceDto, ctx: &ScannerContext) -> Option<discovery_types::DiscoveredResource> {
        let parsed = parse_arn(&dto.resource_arn).ok()?;
        let native_type = native_type_from_arn_parts(&parsed.service, parsed.resource_type.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("AWS::{}::Resource", parsed.service));
        let tags = tags_to_map(&dto.tags);
        let resource_id = parsed.resource_id.clone();
        let name = get_name_from_tags(&tags, &resource_id);
        let new = NewResource::new(resource_id, dto.resource_arn.clone(), native_type, self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_tags(tags)
            .with_properties(json!({ "discoveredVia": "tagging-api" }));
        Some(create_resource(new, resolve_type))
    }
}

#[async_trait]
impl ServiceScanner for ResourceGroupsTaggingApiScanner {
    fn service_name(&self) -> &str {
        "resourcegroupstaggingapi"
    }

    fn is_global(&self) -> bool {
        false
    }

    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome {
        let mut buffer = ScanBuffer::new(self.service_name(), ctx.region.clone());

        let client = self.client.clone();
        let fetch_ctx = ctx.clone();
        let stream = paginate(move |token: Option<String>| {
            let client = client.clone();
            let ctx = fetch_ctx.clone();
            async move {
                if ctx.is_cancelled() {
                    return Err(RateLimiterError::Cancelled);
                }
                ctx.rate_limiter
                    .with_backoff(|| client.get_resources(token.clone()))
                    .await
                    .map(|page| (page.items, page.next_token))
            }
        });
        let (dtos, error) = collect_all(stream).await;
        let resources = dtos.into_iter().filter_map(|dto| self.map(dto, ctx)).collect();
        match error {
            None => {}
            Some(RateLimiterError::Cancelled) => {
                buffer.record_error(ScanError::CANCEL_OPERATION, "cancelled by user");
            }
            Some(RateLimiterError::Terminal(inner)) | Some(RateLimiterError::RetriesExhausted(inner)) => {
                buffer.record_error_with_code("GetResources", inner.message, inner.code);
            }
        }

        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AwsCallError, Page};
    use discovery_ratelimit::RateLimiter;
    use discovery_scanner::Credential;
    use discovery_types::AccountContext;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct FakeTagging {
        rows: Vec<TaggedResourceDto>,
    }

    #[async_trait]
    impl TaggingClient for FakeTagging {
        async fn get_resources(&self, _next_token: Option<String>) -> Result<Page<TaggedResourceDto>, AwsCallError> {
            Ok(Page { items: self.rows.clone(), next_token: None })
        }
    }

    fn context() -> ScannerContext {
        let cancellation = CancellationToken::new();
        ScannerContext::new(
            "us-east-1",
            Credential::new(()),
            Arc::new(RateLimiter::new(cancellation.clone())),
            AccountContext { account_id: Some("1".to_string()), subscription_id: None },
            cancellation,
        )
    }

    #[tokio::test]
    async fn drops_malformed_arn_silently() {
        // A malformed ARN is silently dropped, no error recorded.
        let client = Arc::new(FakeTagging {
            rows: vec![
                TaggedResourceDto { resource_arn: "arn:aws:ec2".to_string(), tags: Vec::new() },
                TaggedResourceDto {
                    resource_arn: "arn:aws:s3:::my-bucket".to_string(),
                    tags: vec![("env".to_string(), "prod".to_string())],
                },
            ],
        });
        let scanner = ResourceGroupsTaggingApiScanner::new(client);
        let (resources, errors) = scanner.scan(&context()).await;
        assert!(errors.is_empty());
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].arn, "arn:aws:s3:::my-bucket");
        assert_eq!(resources[0].properties["discoveredVia"], "tagging-api");
    }
}
