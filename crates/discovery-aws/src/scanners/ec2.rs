use crate::clients::{tags_to_map, Ec2Client, Ec2InstanceDto, SecurityGroupDto};
use crate::types::resolve_type;
use async_trait::async_trait;
use discovery_ratelimit::RateLimiterError;
use discovery_scanner::{
    build_arn, collect_all, create_resource, get_name_from_tags, paginate, ArnParams, ScanBuffer, ScanOutcome,
    ScannerContext, ServiceScanner,
};
use discovery_types::{push_relationship, DiscoveredResource, NewResource, RelationshipType, ResourceRelationship, ScanError};
use futures_util::future::join;
use std::sync::Arc;

/// Scans EC2 instances and their security groups in one region.
///
/// These are independent resource families under the same client, so the two
/// list/describe/map pipelines run concurrently rather than as separate
/// top-level scanners, both still bounded by the shared rate limiter.
#[derive(Debug)]
pub struct Ec2Scanner {
    client: Arc<dyn Ec2Client>,
}

impl Ec2Scanner {
    /// Build a scanner over the given region-scoped EC2 client.
    pub fn new(client: Arc<dyn Ec2Client>) -> Self {
        Self { client }
    }

    async fn scan_instances(&self, ctx: &ScannerContext, account_id: &str) -> ScanOutcome {
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
                    .with_backoff(|| client.describe_instances(token.clone()))
                    .await
                    .map(|page| (page.items, page.next_token))
            }
        });
        let (dtos, error) = collect_all(stream).await;
        let resources = dtos.into_iter().map(|dto| self.map_instance(dto, ctx, account_id)).collect();
        record_pagination_error(&mut buffer, "DescribeInstances", error);
        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    async fn scan_security_groups(&self, ctx: &ScannerContext, account_id: &str) -> ScanOutcome {
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
                    .with_backoff(|| client.describe_security_groups(token.clone()))
                    .await
                    .map(|page| (page.items, page.next_token))
            }
        });
        let (dtos, error) = collect_all(stream).await;
        let resources = dtos.into_iter().map(|dto| self.map_security_group(dto, ctx, account_id)).collect();
        record_pagination_error(&mut buffer, "DescribeSecurityGroups", error);
        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn map_instance(&self, dto: Ec2InstanceDto, ctx: &ScannerContext, account_id: &str) -> DiscoveredResource {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "ec2",
            region: &ctx.region,
            account_id,
            resource_type: Some("instance"),
            resource: &dto.instance_id,
        });
        let tags = tags_to_map(&dto.tags);
        let mut relationships: Vec<ResourceRelationship> = Vec::new();
        for sg_id in &dto.security_group_ids {
            let sg_arn = build_arn(ArnParams {
                partition: None,
                service: "ec2",
                region: &ctx.region,
                account_id,
                resource_type: Some("security-group"),
                resource: sg_id,
            });
            push_relationship(
                &mut relationships,
                &arn,
                ResourceRelationship::new(RelationshipType::AttachedTo, sg_arn, Some(resolve_type("AWS::EC2::SecurityGroup"))),
            );
        }
        let name = get_name_from_tags(&tags, &dto.instance_id);
        let new = NewResource::new(dto.instance_id.clone(), arn, "AWS::EC2::Instance", self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_tags(tags)
            .with_relationships(relationships)
            .with_status(Some(dto.state));
        create_resource(new, resolve_type)
    }

    fn map_security_group(&self, dto: SecurityGroupDto, ctx: &ScannerContext, account_id: &str) -> DiscoveredResource {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "ec2",
            region: &ctx.region,
            account_id,
            resource_type: Some("security-group"),
            resource: &dto.group_id,
        });
        let tags = tags_to_map(&dto.tags);
        let name = get_name_from_tags(&tags, &dto.group_name);
        let new = NewResource::new(dto.group_id.clone(), arn, "AWS::EC2::SecurityGroup", self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_tags(tags);
        create_resource(new, resolve_type)
    }
}

/// Fold a pagination error (if any) into the buffer under `operation`'s name.
fn record_pagination_error(
    buffer: &mut ScanBuffer,
    operation: &str,
    error: Option<RateLimiterError<crate::clients::AwsCallError>>,
) {
    match error {
        None => {}
        Some(RateLimiterError::Cancelled) => {
            buffer.record_error(ScanError::CANCEL_OPERATION, "cancelled by user");
        }
        Some(RateLimiterError::Terminal(inner)) | Some(RateLimiterError::RetriesExhausted(inner)) => {
            buffer.record_error_with_code(operation, inner.message, inner.code);
        }
    }
}

#[async_trait]
impl ServiceScanner for Ec2Scanner {
    fn service_name(&self) -> &str {
        "ec2"
    }

    fn is_global(&self) -> bool {
        false
    }

    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome {
        let account_id = ctx.account.account_id.clone().unwrap_or_default();
        let (instances, security_groups) =
            join(self.scan_instances(ctx, &account_id), self.scan_security_groups(ctx, &account_id)).await;
        let (mut resources, mut errors) = instances;
        let (sg_resources, sg_errors) = security_groups;
        resources.extend(sg_resources);
        errors.extend(sg_errors);
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        vec![resolve_type("AWS::EC2::Instance"), resolve_type("AWS::EC2::SecurityGroup")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AwsCallError, Page};
    use discovery_ratelimit::RateLimiter;
    use discovery_scanner::Credential;
    use discovery_types::AccountContext;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct FakeEc2 {
        instances: Vec<Ec2InstanceDto>,
        groups: Vec<SecurityGroupDto>,
        instance_calls: AtomicUsize,
        group_calls: AtomicUsize,
    }

    #[async_trait]
    impl Ec2Client for FakeEc2 {
        async fn describe_instances(&self, _next_token: Option<String>) -> Result<Page<Ec2InstanceDto>, AwsCallError> {
            self.instance_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Page { items: self.instances.clone(), next_token: None })
        }

        async fn describe_security_groups(&self, _next_token: Option<String>) -> Result<Page<SecurityGroupDto>, AwsCallError> {
            self.group_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Page { items: self.groups.clone(), next_token: None })
        }
    }

    fn context() -> ScannerContext {
        let cancellation = CancellationToken::new();
        ScannerContext::new(
            "us-east-1",
            Credential::new(()),
            Arc::new(RateLimiter::new(cancellation.clone())),
            AccountContext { account_id: Some("123456789012".to_string()), subscription_id: None },
            cancellation,
        )
    }

    #[tokio::test]
    async fn scans_both_families_from_one_invocation() {
        let client = Arc::new(FakeEc2 {
            instances: vec![Ec2InstanceDto {
                instance_id: "i-0abc123".to_string(),
                state: "running".to_string(),
                security_group_ids: vec!["sg-1".to_string()],
                tags: vec![("Name".to_string(), "web-1".to_string())],
                launch_time: None,
            }],
            groups: vec![SecurityGroupDto {
                group_id: "sg-1".to_string(),
                group_name: "default".to_string(),
                tags: Vec::new(),
            }],
            instance_calls: AtomicUsize::new(0),
            group_calls: AtomicUsize::new(0),
        });
        let scanner = Ec2Scanner::new(client);
        let (resources, errors) = scanner.scan(&context()).await;
        assert!(errors.is_empty());
        assert_eq!(resources.len(), 2);
        let instance = resources.iter().find(|r| r.native_type == "AWS::EC2::Instance").unwrap();
        assert_eq!(instance.arn, "arn:aws:ec2:us-east-1:123456789012:instance/i-0abc123");
        assert_eq!(instance.name.as_deref(), Some("web-1"));
        assert_eq!(instance.relationships.len(), 1);
        assert_eq!(instance.relationships[0].target_arn, "arn:aws:ec2:us-east-1:123456789012:security-group/sg-1");
        let group = resources.iter().find(|r| r.native_type == "AWS::EC2::SecurityGroup").unwrap();
        assert_eq!(group.arn, "arn:aws:ec2:us-east-1:123456789012:security-group/sg-1");
        assert_eq!(group.name.as_deref(), Some("default"));
    }

    #[tokio::test]
    async fn cancellation_is_recorded_without_stalling_the_other_family() {
        let client = Arc::new(FakeEc2 {
            instances: vec![Ec2InstanceDto {
                instance_id: "i-0abc123".to_string(),
                state: "running".to_string(),
                security_group_ids: Vec::new(),
                tags: Vec::new(),
                launch_time: None,
            }],
            groups: Vec::new(),
            instance_calls: AtomicUsize::new(0),
            group_calls: AtomicUsize::new(0),
        });
        let scanner = Ec2Scanner::new(client);
        let ctx = context();
        ctx.cancellation.cancel();
        let (resources, errors) = scanner.scan(&ctx).await;
        assert!(resources.is_empty());
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.operation == ScanError::CANCEL_OPERATION));
    }
}
