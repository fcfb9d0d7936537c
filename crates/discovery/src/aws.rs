use discovery_aws::{
    Ec2Client, Ec2Scanner, RdsClient, RdsInstancesScanner, ResourceGroupsTaggingApiScanner, S3BucketsScanner,
    S3Client, TaggingClient,
};
use discovery_scanner::ScannerRegistry;
use std::sync::Arc;

/// The opaque AWS API clients the registered scanners depend on.
#[derive(Clone)]
pub struct AwsClients {
    /// EC2 instances and security groups.
    pub ec2: Arc<dyn Ec2Client>,
    /// S3 bucket listing and per-bucket properties.
    pub s3: Arc<dyn S3Client>,
    /// RDS instance listing.
    pub rds: Arc<dyn RdsClient>,
    /// Resource Groups Tagging API, the cross-service coarse first pass.
    pub tagging: Arc<dyn TaggingClient>,
}

/// Build a registry with every scanner this crate ships for AWS.
///
/// Registration order matters for dedup: the tagging scanner is registered
/// first and the service-specific scanners after, so their richer views
/// supersede the tagging scanner's thin one when the orchestrator merges
/// resources discovered under the same arn.
pub fn aws_registry(clients: AwsClients) -> ScannerRegistry {
    let mut registry = ScannerRegistry::new();
    registry.register(Arc::new(ResourceGroupsTaggingApiScanner::new(clients.tagging)));
    registry.register(Arc::new(Ec2Scanner::new(clients.ec2)));
    registry.register(Arc::new(S3BucketsScanner::new(clients.s3)));
    registry.register(Arc::new(RdsInstancesScanner::new(clients.rds)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use discovery_aws::{AwsCallError, Page, SecurityGroupDto};

    #[derive(Debug)]
    struct EmptyClients;

    #[async_trait]
    impl Ec2Client for EmptyClients {
        async fn describe_instances(&self, _: Option<String>) -> Result<Page<discovery_aws::Ec2InstanceDto>, AwsCallError> {
            Ok(Page { items: Vec::new(), next_token: None })
        }
        async fn describe_security_groups(&self, _: Option<String>) -> Result<Page<SecurityGroupDto>, AwsCallError> {
            Ok(Page { items: Vec::new(), next_token: None })
        }
    }

    #[async_trait]
    impl S3Client for EmptyClients {
        async fn list_buckets(&self) -> Result<Vec<discovery_aws::S3BucketDto>, AwsCallError> {
            Ok(Vec::new())
        }
        async fn get_bucket_properties(&self, _: &str) -> Result<discovery_aws::S3BucketProperties, AwsCallError> {
            Ok(discovery_aws::S3BucketProperties::default())
        }
    }

    #[async_trait]
    impl RdsClient for EmptyClients {
        async fn describe_db_instances(&self, _: Option<String>) -> Result<Page<discovery_aws::RdsInstanceDto>, AwsCallError> {
            Ok(Page { items: Vec::new(), next_token: None })
        }
    }

    #[async_trait]
    impl TaggingClient for EmptyClients {
        async fn get_resources(&self, _: Option<String>) -> Result<Page<discovery_aws::TaggedResourceDto>, AwsCallError> {
            Ok(Page { items: Vec::new(), next_token: None })
        }
    }

    #[test]
    fn registers_every_aws_scanner_with_tagging_first() {
        let shared = Arc::new(EmptyClients);
        let registry = aws_registry(AwsClients {
            ec2: shared.clone(),
            s3: shared.clone(),
            rds: shared.clone(),
            tagging: shared,
        });
        let names = registry.get_service_names();
        assert_eq!(names[0], "resourcegroupstaggingapi");
        assert_eq!(names.len(), 4);
        assert!(registry.has("ec2"));
        assert!(registry.has("s3_buckets"));
        assert!(registry.has("rds_instances"));
    }
}
