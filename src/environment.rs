use std::str::FromStr;

/// Splits a delimited setting into trimmed, non-empty entries.
///
/// # Arguments
/// - `value`: The raw setting, if present.
/// - `delimiter`: The character to split the value by.
///
/// # Returns
/// - `Vec<String>`
pub fn split_list(value: Option<String>, delimiter: char) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses a setting, falling back to `default` when it is missing or malformed.
pub fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, in any case.
pub fn parse_bool(value: Option<String>) -> Option<bool> {
    match value?.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Returns the value unless it is missing or blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(Some("https://a.com, https://b.com,,".to_string()), ','),
            vec!["https://a.com", "https://b.com"]
        );
        assert!(split_list(None, ',').is_empty());
    }

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(Some(" 42 ".to_string()), 7u32), 42);
        assert_eq!(parse_or(Some("abc".to_string()), 7u32), 7);
        assert_eq!(parse_or::<f32>(None, 0.7), 0.7);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(Some("TRUE".to_string())), Some(true));
        assert_eq!(parse_bool(Some("off".to_string())), Some(false));
        assert_eq!(parse_bool(Some("maybe".to_string())), None);
        assert_eq!(parse_bool(None), None);
    }
}
