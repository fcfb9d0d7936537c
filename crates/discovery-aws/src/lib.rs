//! AWS ARN handling, native-to-neutral type mapping, and concrete
//! `ServiceScanner` implementations for EC2, S3, RDS, and the Resource Groups
//! Tagging API.

mod arn;
mod clients;
mod scanners;
mod types;

pub use arn::{parse_arn, ArnParseError, ParsedArn};
pub use clients::{
    AwsCallError, Ec2Client, Ec2InstanceDto, Page, RdsClient, RdsInstanceDto, S3BucketDto, S3BucketProperties,
    S3Client, SecurityGroupDto, TaggedResourceDto, TaggingClient,
};
pub use scanners::{Ec2Scanner, RdsInstancesScanner, ResourceGroupsTaggingApiScanner, S3BucketsScanner};
pub use types::{native_type_from_arn_parts, resolve_type};
