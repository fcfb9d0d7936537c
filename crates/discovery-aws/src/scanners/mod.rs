//! Concrete AWS `ServiceScanner` implementations.

mod ec2;
mod rds_instances;
mod resourcegroupstaggingapi;
mod s3_buckets;

pub use ec2::Ec2Scanner;
pub use rds_instances::RdsInstancesScanner;
pub use resourcegroupstaggingapi::ResourceGroupsTaggingApiScanner;
pub use s3_buckets::S3BucketsScanner;
