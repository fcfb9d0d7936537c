use crate::clients::{tags_to_map, S3BucketDto, S3Client};
use crate::types::resolve_type;
use async_trait::async_trait;
use discovery_scanner::{build_arn, create_resource, get_name_from_tags, ArnParams, ScanBuffer, ScanOutcome, ScannerContext, ServiceScanner};
use discovery_types::NewResource;
use serde_json::json;
use std::sync::Arc;

/// Scans S3 buckets. `ListBuckets` is a global, account-wide call; each bucket's
/// region/tags/versioning require a second, regional call. `is_global()` is still `false`:
/// the resources this scanner produces carry real per-bucket regions, unlike a
/// scanner whose entire API surface is unpartitioned.
#[derive(Debug)]
pub struct S3BucketsScanner {
    client: Arc<dyn S3Client>,
}

impl S3BucketsScanner {
    /// Build a scanner over the given S3 client.
    pub fn new(client: Arc<dyn S3Client>) -> Self {
        Self { client }
    }

    fn map(&self, dto: S3BucketDto, properties: crate::clients::S3BucketProperties, account_id: &str) -> discovery_types::DiscoveredResource {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "s3",
            region: "",
            account_id,
            resource_type: None,
            resource: &dto.name,
        });
        let tags = tags_to_map(&properties.tags);
        let name = get_name_from_tags(&tags, &dto.name);
        let props = json!({ "versioning": { "status": properties.versioning_status } });
        let new = NewResource::new(dto.name.clone(), arn, "AWS::S3::Bucket", self.service_name(), properties.region)
            .with_name(Some(name))
            .with_tags(tags)
            .with_properties(props);
        create_resource(new, resolve_type)
    }
}

#[async_trait]
impl ServiceScanner for S3BucketsScanner {
    fn service_name(&self) -> &str {
        "s3_buckets"
    }

    fn is_global(&self) -> bool {
        false
    }

    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome {
        let mut buffer = ScanBuffer::new(self.service_name(), ctx.region.clone());
        let mut resources = Vec::new();
        let account_id = ctx.account.account_id.clone().unwrap_or_default();

        let buckets = match ctx.rate_limiter.with_backoff(|| self.client.list_buckets()).await {
            Ok(buckets) => buckets,
            Err(err) => {
                if let Some(inner) = err.into_inner() {
                    buffer.record_error_with_code("ListBuckets", inner.message, inner.code);
                }
                let (errors, _warnings) = buffer.into_parts();
                return (resources, errors);
            }
        };

        for dto in buckets {
            if ctx.is_cancelled() {
                buffer.record_error(discovery_types::ScanError::CANCEL_OPERATION, "cancelled by user");
                break;
            }
            match ctx
                .rate_limiter
                .with_backoff(|| self.client.get_bucket_properties(&dto.name))
                .await
            {
                Ok(properties) => resources.push(self.map(dto.clone(), properties, &account_id)),
                Err(err) => {
                    if let Some(inner) = err.into_inner() {
                        buffer.record_error_with_code("GetBucketProperties", inner.message, inner.code);
                    }
                }
            }
        }

        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        vec![resolve_type("AWS::S3::Bucket")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AwsCallError, S3BucketProperties};
    use discovery_ratelimit::RateLimiter;
    use discovery_scanner::Credential;
    use discovery_types::AccountContext;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct FakeS3 {
        buckets: Vec<S3BucketDto>,
    }

    #[async_trait]
    impl S3Client for FakeS3 {
        async fn list_buckets(&self) -> Result<Vec<S3BucketDto>, AwsCallError> {
            Ok(self.buckets.clone())
        }

        async fn get_bucket_properties(&self, bucket: &str) -> Result<S3BucketProperties, AwsCallError> {
            Ok(S3BucketProperties {
                region: "eu-west-1".to_string(),
                tags: vec![("env".to_string(), "prod".to_string())],
                versioning_status: if bucket == "versioned" { Some("Enabled".to_string()) } else { None },
            })
        }
    }

    #[tokio::test]
    async fn maps_bucket_with_its_own_regional_properties() {
        let client = Arc::new(FakeS3 {
            buckets: vec![S3BucketDto { name: "versioned".to_string(), creation_date: None }],
        });
        let scanner = S3BucketsScanner::new(client);
        let cancellation = CancellationToken::new();
        let ctx = ScannerContext::new(
            "us-east-1",
            Credential::new(()),
            Arc::new(RateLimiter::new(cancellation.clone())),
            AccountContext { account_id: Some("1".to_string()), subscription_id: None },
            cancellation,
        );
        let (resources, errors) = scanner.scan(&ctx).await;
        assert!(errors.is_empty());
        assert_eq!(resources[0].arn, "arn:aws:s3::1:versioned");
        assert_eq!(resources[0].region, "eu-west-1");
        assert_eq!(resources[0].properties["versioning"]["status"], "Enabled");
    }
}
