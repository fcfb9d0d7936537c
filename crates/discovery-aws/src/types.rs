use discovery_types::synthesize_neutral_type;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Native AWS CloudFormation-style type strings mapped to this crate's neutral
/// vocabulary. Entries absent here fall back to
/// [`synthesize_neutral_type`].
static NATIVE_TO_NEUTRAL: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AWS::EC2::Instance", "aws_ec2_instance"),
        ("AWS::EC2::SecurityGroup", "aws_ec2_security_group"),
        ("AWS::S3::Bucket", "aws_s3_bucket"),
        ("AWS::RDS::DBInstance", "aws_rds_db_instance"),
    ])
});

/// Resolve a native AWS type string to this crate's neutral vocabulary,
/// consulting the static table first and falling back to the deterministic
/// synthesizer for anything unmapped.
pub fn resolve_type(native_type: &str) -> String {
    NATIVE_TO_NEUTRAL
        .get(native_type)
        .map(|neutral| neutral.to_string())
        .unwrap_or_else(|| synthesize_neutral_type(native_type))
}

/// The ARN `(service, resource_type)` pair to native-type mapping used by the
/// cross-service Tagging scanner, which only ever sees an ARN.
static ARN_PREFIX_TO_NATIVE_TYPE: Lazy<HashMap<(&'static str, Option<&'static str>), &'static str>> =
    Lazy::new(|| {
        HashMap::from([
            (("ec2", Some("instance")), "AWS::EC2::Instance"),
            (("ec2", Some("security-group")), "AWS::EC2::SecurityGroup"),
            (("s3", None), "AWS::S3::Bucket"),
            (("rds", Some("db")), "AWS::RDS::DBInstance"),
        ])
    });

/// Recover a native type string from an ARN's `(service, resource_type)`, for
/// resources the Tagging scanner discovers without a service-specific DTO.
/// Returns `None` when the pair isn't one of the mapped families; the caller
/// falls back to a generic native type derived from the service name alone.
pub fn native_type_from_arn_parts(service: &str, resource_type: Option<&str>) -> Option<&'static str> {
    ARN_PREFIX_TO_NATIVE_TYPE.get(&(service, resource_type)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_mapped_type() {
        assert_eq!(resolve_type("AWS::S3::Bucket"), "aws_s3_bucket");
    }

    #[test]
    fn falls_back_for_unmapped_type() {
        assert_eq!(resolve_type("AWS::Lambda::Function"), "lambda_function");
    }

    #[test]
    fn recovers_native_type_from_arn_parts() {
        assert_eq!(
            native_type_from_arn_parts("s3", None),
            Some("AWS::S3::Bucket")
        );
        assert_eq!(native_type_from_arn_parts("unknown", None), None);
    }
}
