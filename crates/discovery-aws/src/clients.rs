//! Opaque AWS client contracts each scanner depends on, kept provider-SDK-shaped
//! but free of any real SDK dependency. Production callers hand a real SDK-backed impl in; tests hand in an
//! in-memory fake.

use async_trait::async_trait;
use discovery_types::ClassifyScanError;
use discovery_types::ScanErrorKind;
use indexmap::IndexMap;
use std::fmt::Debug;
use thiserror::Error;

/// A single AWS API call's failure, carrying enough for [`ScanErrorKind::classify`].
#[derive(Debug, Error, Clone)]
#[error("{operation} failed: {message}")]
pub struct AwsCallError {
    /// The API operation that failed (e.g. `"DescribeInstances"`).
    pub operation: String,
    /// Provider error code (e.g. `"Throttling"`, `"AccessDenied"`), if known.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ClassifyScanError for AwsCallError {
    fn classify(&self) -> ScanErrorKind {
        ScanErrorKind::classify(self.code.as_deref(), &self.message)
    }
}

/// One page of a paginated AWS list/describe call.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items returned on this page.
    pub items: Vec<T>,
    /// Continuation token for the next page, or `None` if this was the last page.
    pub next_token: Option<String>,
}

/// A minimal EC2 instance DTO, shaped like the real SDK's `Instance`.
#[derive(Debug, Clone)]
pub struct Ec2InstanceDto {
    /// `i-...` instance id.
    pub instance_id: String,
    /// Instance state name (`"running"`, `"stopped"`, ...).
    pub state: String,
    /// Security group ids attached to this instance's primary network interface.
    pub security_group_ids: Vec<String>,
    /// Resource tags as returned by the API.
    pub tags: Vec<(String, String)>,
    /// Launch time, as an RFC3339 string (SDK types return a provider timestamp type
    /// in practice; this crate never depends on one).
    pub launch_time: Option<String>,
}

/// A minimal EC2 security group DTO.
#[derive(Debug, Clone)]
pub struct SecurityGroupDto {
    /// `sg-...` group id.
    pub group_id: String,
    /// Group name.
    pub group_name: String,
    /// Resource tags.
    pub tags: Vec<(String, String)>,
}

/// A minimal S3 bucket DTO. `ListBuckets` is global; region/tags require a
/// separate regional call per bucket.
#[derive(Debug, Clone)]
pub struct S3BucketDto {
    /// Bucket name, globally unique.
    pub name: String,
    /// Creation date, as an RFC3339 string.
    pub creation_date: Option<String>,
}

/// Per-bucket regional properties fetched after the global listing call.
#[derive(Debug, Clone, Default)]
pub struct S3BucketProperties {
    /// Bucket region.
    pub region: String,
    /// Resource tags.
    pub tags: Vec<(String, String)>,
    /// Bucket versioning status, if enabled.
    pub versioning_status: Option<String>,
}

/// A minimal RDS DB instance DTO.
#[derive(Debug, Clone)]
pub struct RdsInstanceDto {
    /// DB instance identifier.
    pub db_instance_identifier: String,
    /// Engine status (`"available"`, `"creating"`, ...).
    pub status: String,
    /// Security group ids this instance is a member of.
    pub security_group_ids: Vec<String>,
    /// Resource tags.
    pub tags: Vec<(String, String)>,
}

/// One row from the Resource Groups Tagging API's `GetResources` call.
#[derive(Debug, Clone)]
pub struct TaggedResourceDto {
    /// The resource's ARN, as reported by the tagging API. May be malformed.
    pub resource_arn: String,
    /// Resource tags.
    pub tags: Vec<(String, String)>,
}

/// EC2 list operations, paginated.
#[async_trait]
pub trait Ec2Client: Debug + Send + Sync {
    /// List EC2 instances in this client's region.
    async fn describe_instances(&self, next_token: Option<String>) -> Result<Page<Ec2InstanceDto>, AwsCallError>;

    /// List EC2 security groups in this client's region.
    async fn describe_security_groups(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<SecurityGroupDto>, AwsCallError>;
}

/// S3 list/describe operations. `list_buckets` is global; the rest are per-bucket
/// regional calls.
#[async_trait]
pub trait S3Client: Debug + Send + Sync {
    /// List every bucket in the account (global call).
    async fn list_buckets(&self) -> Result<Vec<S3BucketDto>, AwsCallError>;

    /// Fetch region/tags/versioning for one bucket.
    async fn get_bucket_properties(&self, bucket: &str) -> Result<S3BucketProperties, AwsCallError>;
}

/// RDS list operations, paginated.
#[async_trait]
pub trait RdsClient: Debug + Send + Sync {
    /// List DB instances in this client's region.
    async fn describe_db_instances(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<RdsInstanceDto>, AwsCallError>;
}

/// Resource Groups Tagging API operations, paginated.
#[async_trait]
pub trait TaggingClient: Debug + Send + Sync {
    /// List every tagged resource visible to the tagging API in this client's region.
    async fn get_resources(&self, next_token: Option<String>) -> Result<Page<TaggedResourceDto>, AwsCallError>;
}

/// Build the canonical tag-pair vector into the crate's tag map shape.
pub fn tags_to_map(tags: &[(String, String)]) -> IndexMap<String, String> {
    tags.iter().cloned().collect()
}
