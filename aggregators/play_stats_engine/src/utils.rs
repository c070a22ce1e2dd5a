pub const NOT_AVAILABLE: &str = "N/A";

/// Value or the "N/A" placeholder used in reports.
pub fn or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Makes a tournament id or category usable inside a file name.
pub fn sanitize_for_filename(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// clap value parser rejecting blank positional arguments.
pub fn non_empty_arg(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder(Some("Lobos")), "Lobos");
        assert_eq!(or_placeholder(Some("  ")), "N/A");
        assert_eq!(or_placeholder(None), "N/A");
    }

    #[test]
    fn test_sanitize_for_filename() {
        assert_eq!(sanitize_for_filename("Liga 2024/25"), "Liga_2024_25");
        assert_eq!(sanitize_for_filename("sub-17_varonil"), "sub-17_varonil");
        assert_eq!(sanitize_for_filename("  "), "_");
    }

    #[test]
    fn test_non_empty_arg() {
        assert_eq!(non_empty_arg(" t1 "), Ok("t1".to_string()));
        assert!(non_empty_arg("   ").is_err());
    }
}
