const VENDOR_PREFIXES: [&str; 2] = ["aws_", "microsoft_"];

/// Derive a neutral type string for a native type that has no explicit mapping.
///
/// Rule: lowercase, replace `::`/`/` (and, for Azure-style `Vendor.Namespace/type`
/// natives, `.`) with `_`, collapse repeated underscores, trim leading/trailing
/// underscores, then strip a leading vendor prefix (`aws_`/`microsoft_`).
pub fn synthesize_neutral_type(native_type: &str) -> String {
    let lowered = native_type.to_ascii_lowercase();
    let mut replaced = String::with_capacity(lowered.len());
    let mut last_was_sep = false;
    for ch in lowered.chars() {
        if ch == ':' || ch == '/' || ch == '.' {
            if !last_was_sep && !replaced.is_empty() {
                replaced.push('_');
            }
            last_was_sep = true;
        } else {
            replaced.push(ch);
            last_was_sep = false;
        }
    }
    let trimmed = replaced.trim_matches('_');
    let mut result = trimmed.to_string();
    for prefix in VENDOR_PREFIXES {
        if let Some(stripped) = result.strip_prefix(prefix) {
            result = stripped.to_string();
            break;
        }
    }
    if result.is_empty() {
        "unknown_resource".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_style_native_type() {
        assert_eq!(synthesize_neutral_type("AWS::S3::Bucket"), "s3_bucket");
    }

    #[test]
    fn azure_style_native_type() {
        assert_eq!(
            synthesize_neutral_type("Microsoft.Storage/storageAccounts"),
            "storage_storageaccounts"
        );
    }

    #[test]
    fn is_deterministic() {
        let a = synthesize_neutral_type("AWS::Lambda::Function");
        let b = synthesize_neutral_type("AWS::Lambda::Function");
        assert_eq!(a, b);
    }

    #[test]
    fn handles_no_separators() {
        assert_eq!(synthesize_neutral_type("Widget"), "widget");
    }

    #[test]
    fn handles_empty_after_strip() {
        assert_eq!(synthesize_neutral_type(""), "unknown_resource");
    }
}
