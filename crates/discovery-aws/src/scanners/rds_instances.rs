use crate::clients::{tags_to_map, RdsClient, RdsInstanceDto};
use crate::types::resolve_type;
use async_trait::async_trait;
use discovery_ratelimit::RateLimiterError;
use discovery_scanner::{
    build_arn, collect_all, create_resource, get_name_from_tags, paginate, ArnParams, ScanBuffer, ScanOutcome,
    ScannerContext, ServiceScanner,
};
use discovery_types::{push_relationship, NewResource, RelationshipType, ResourceRelationship, ScanError};
use std::sync::Arc;

/// Scans RDS DB instances, recording `DependsOn` edges to the security groups an
/// instance is a member of.
#[derive(Debug)]
pub struct RdsInstancesScanner {
    client: Arc<dyn RdsClient>,
}

impl RdsInstancesScanner {
    /// Build a scanner over the given region-scoped RDS client.
    pub fn new(client: Arc<dyn RdsClient>) -> Self {
        Self { client }
    }

    fn map(&self, dto: RdsInstanceDto, ctx: &ScannerContext, account_id: &str) -> discovery_types::DiscoveredResource {
        let arn = build_arn(ArnParams {
            partition: None,
            service: "rds",
            region: &ctx.region,
            account_id,
            resource_type: Some("db"),
            resource: &dto.db_instance_identifier,
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
                ResourceRelationship::new(RelationshipType::DependsOn, sg_arn, Some(resolve_type("AWS::EC2::SecurityGroup"))),
            );
        }
        let name = get_name_from_tags(&tags, &dto.db_instance_identifier);
        let new = NewResource::new(dto.db_instance_identifier.clone(), arn, "AWS::RDS::DBInstance", self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_tags(tags)
            .with_relationships(relationships)
            .with_status(Some(dto.status));
        create_resource(new, resolve_type)
    }
}

#[async_trait]
impl ServiceScanner for RdsInstancesScanner {
    fn service_name(&self) -> &str {
        "rds_instances"
    }

    fn is_global(&self) -> bool {
        false
    }

    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome {
        let mut buffer = ScanBuffer::new(self.service_name(), ctx.region.clone());
        let account_id = ctx.account.account_id.clone().unwrap_or_default();

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
                    .with_backoff(|| client.describe_db_instances(token.clone()))
                    .await
                    .map(|page| (page.items, page.next_token))
            }
        });
        let (dtos, error) = collect_all(stream).await;
        let resources = dtos.into_iter().map(|dto| self.map(dto, ctx, &account_id)).collect();
        match error {
            None => {}
            Some(RateLimiterError::Cancelled) => {
                buffer.record_error(ScanError::CANCEL_OPERATION, "cancelled by user");
            }
            Some(RateLimiterError::Terminal(inner)) | Some(RateLimiterError::RetriesExhausted(inner)) => {
                buffer.record_error_with_code("DescribeDBInstances", inner.message, inner.code);
            }
        }

        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        vec![resolve_type("AWS::RDS::DBInstance")]
    }
}
