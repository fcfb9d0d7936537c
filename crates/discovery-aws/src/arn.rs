use thiserror::Error;

/// A successfully parsed ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArn {
    /// ARN partition (e.g. `aws`, `aws-cn`).
    pub partition: String,
    /// Service namespace segment.
    pub service: String,
    /// Region segment. Empty for global services.
    pub region: String,
    /// Account id segment.
    pub account_id: String,
    /// Resource-type segment, if the ARN's resource part used a `type/id` or
    /// `type:id` form.
    pub resource_type: Option<String>,
    /// Resource identifier segment.
    pub resource_id: String,
}

/// Why [`parse_arn`] rejected an input string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArnParseError {
    /// Fewer than 6 colon-separated segments.
    #[error("ARN has too few segments: {0:?}")]
    TooFewSegments(String),
    /// The first segment wasn't the literal `arn`.
    #[error("not an ARN (missing `arn` prefix): {0:?}")]
    NotAnArn(String),
    /// The resource part (everything after the 5th colon) was empty.
    #[error("ARN has an empty resource part: {0:?}")]
    EmptyResource(String),
}

/// Parse an ARN string: split on `:`, rejoin the resource part (so
/// embedded colons in e.g. `db:my-instance` survive), then distinguish the
/// `type/id` and `type:id` resource forms. Never panics; malformed input is
/// reported as `Err`, never dropped silently by this function itself — callers
/// (e.g. the tagging scanner's map phase) decide whether to drop the row.
pub fn parse_arn(arn: &str) -> Result<ParsedArn, ArnParseError> {
    let segments: Vec<&str> = arn.split(':').collect();
    if segments.len() < 6 {
        return Err(ArnParseError::TooFewSegments(arn.to_string()));
    }
    if segments[0] != "arn" {
        return Err(ArnParseError::NotAnArn(arn.to_string()));
    }
    let partition = segments[1].to_string();
    let service = segments[2].to_string();
    let region = segments[3].to_string();
    let account_id = segments[4].to_string();
    let resource_part = segments[5..].join(":");
    if resource_part.is_empty() {
        return Err(ArnParseError::EmptyResource(arn.to_string()));
    }

    let (resource_type, resource_id) = if let Some(idx) = resource_part.find('/') {
        (
            Some(resource_part[..idx].to_string()),
            resource_part[idx + 1..].to_string(),
        )
    } else if let Some(idx) = resource_part.find(':') {
        (
            Some(resource_part[..idx].to_string()),
            resource_part[idx + 1..].to_string(),
        )
    } else {
        (None, resource_part)
    };

    Ok(ParsedArn {
        partition,
        service,
        region,
        account_id,
        resource_type,
        resource_id,
    })
}
