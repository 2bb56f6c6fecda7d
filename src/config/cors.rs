use serde::Deserialize;

/// Origins used when `APP_CORS_ALLOWED_ORIGINS` is not set at all
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins for `/api/**`, in configuration order
    pub allowed_origins: Vec<String>,

    /// Refuse to start when `allowed_origins` ends up empty
    pub require_origins: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: parse_origins(None),
            require_origins: false,
        }
    }
}

/// Parse a comma-separated origin list.
///
/// `None` means the value was never configured and yields the two local
/// development origins. A configured value is split on `,`, each piece is
/// trimmed and blank pieces are dropped. Order and duplicates are kept, and
/// entries are not checked for URL well-formedness.
///
/// # Examples
///
/// ```
/// use bigsofa_api::config::parse_origins;
///
/// assert_eq!(
///     parse_origins(Some("  , ,http://a.com ,  ")),
///     vec!["http://a.com".to_string()]
/// );
/// assert!(parse_origins(Some("")).is_empty());
/// assert_eq!(parse_origins(None).len(), 2);
/// ```
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or(DEFAULT_ALLOWED_ORIGINS)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_origins_with_spaces() {
        let origins = parse_origins(Some("http://localhost:5173, http://localhost:5174"));
        assert_eq!(origins, vec!["http://localhost:5173", "http://localhost:5174"]);
    }

    #[test]
    fn test_unset_uses_default() {
        assert_eq!(
            parse_origins(None),
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
    }

    #[test]
    fn test_empty_string_is_empty_list() {
        assert!(parse_origins(Some("")).is_empty());
        assert!(parse_origins(Some(" , ,, ")).is_empty());
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let origins = parse_origins(Some("https://b.com,https://a.com,https://b.com"));
        assert_eq!(origins, vec!["https://b.com", "https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_malformed_origin_passes_through() {
        assert_eq!(parse_origins(Some("localhost:5173")), vec!["localhost:5173"]);
    }

    #[test]
    fn test_default_config() {
        let config = CorsConfig::default();
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(!config.require_origins);
    }
}
