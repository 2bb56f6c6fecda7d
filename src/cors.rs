//! Cross-origin policy for the `/api/**` routes.
//!
//! Only the origin list comes from configuration. Methods, request headers,
//! the credentials flag and the preflight max-age are fixed. The policy is
//! built once at startup and handed to tower-http, which answers preflights
//! and decorates actual responses on every request under the prefix.

use crate::config::CorsConfig;
use crate::error::AppResult;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Path prefix the policy is registered on (matches `/api` and `/api/**`)
pub const API_PATH_PREFIX: &str = "/api";

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Header used by the admin frontend
pub const X_ADMIN_TOKEN: HeaderName = HeaderName::from_static("x-admin-token");

pub const ALLOWED_HEADERS: [HeaderName; 5] = [
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::ORIGIN,
    X_ADMIN_TOKEN,
];

pub const ALLOW_CREDENTIALS: bool = false;

/// How long browsers may cache a preflight answer
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(1800);

const WILDCARD_ORIGIN: &str = "*";

/// Sent by sandboxed iframes and `file:` pages
const NULL_ORIGIN: &str = "null";

/// Immutable CORS policy for the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    origins: Vec<String>,
}

impl CorsPolicy {
    /// Build a policy from an already parsed origin list.
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    /// Build the policy from configuration, logging anything that will make
    /// an origin unusable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` when the origin list is empty and
    /// `require_origins` is set.
    pub fn from_config(config: &CorsConfig) -> AppResult<Self> {
        config.validate()?;

        if config.allowed_origins.is_empty() {
            warn!(
                "No CORS origins configured; every cross-origin request to {}/** will be refused",
                API_PATH_PREFIX
            );
        }

        for origin in &config.allowed_origins {
            if let Some(reason) = unmatchable_reason(origin) {
                warn!(origin = %origin, "CORS origin can never match a browser Origin header: {}", reason);
            }
        }

        info!(origins = ?config.allowed_origins, "CORS policy for {}/**", API_PATH_PREFIX);

        Ok(Self::new(config.allowed_origins.clone()))
    }

    /// Allowed origins in configuration order
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Exact, case-sensitive origin check
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.origins
            .iter()
            .any(|o| o == origin || o == WILDCARD_ORIGIN)
    }

    /// Translate the policy into the tower-http layer that enforces it.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.allow_origin())
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(ALLOWED_HEADERS)
            .allow_credentials(ALLOW_CREDENTIALS)
            .max_age(PREFLIGHT_MAX_AGE)
    }

    fn allow_origin(&self) -> AllowOrigin {
        if self.origins.iter().any(|o| o == WILDCARD_ORIGIN) {
            warn!("CORS origin list contains \"*\"; any origin is allowed");
            return AllowOrigin::any();
        }

        let origins: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Skipping CORS origin that is not a valid header value");
                    None
                }
            })
            .collect();

        AllowOrigin::list(origins)
    }

    /// JSON summary of the effective policy
    pub fn describe(&self) -> Value {
        json!({
            "path": format!("{}/**", API_PATH_PREFIX),
            "allowed_origins": self.origins,
            "allowed_methods": ALLOWED_METHODS.iter().map(Method::as_str).collect::<Vec<_>>(),
            "allowed_headers": ALLOWED_HEADERS.iter().map(HeaderName::as_str).collect::<Vec<_>>(),
            "allow_credentials": ALLOW_CREDENTIALS,
            "max_age_seconds": PREFLIGHT_MAX_AGE.as_secs(),
        })
    }
}

/// Install the policy on every route (and the fallback) of the API router.
///
/// The router is expected to be nested at [`API_PATH_PREFIX`]; routes outside
/// it never see the layer.
pub fn register_policy<S>(api: Router<S>, policy: &CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    api.layer(policy.layer())
}

/// Browsers send `scheme://host[:port]` with a lowercase host and no path.
fn unmatchable_reason(origin: &str) -> Option<String> {
    if origin == WILDCARD_ORIGIN || origin == NULL_ORIGIN {
        return None;
    }

    match url::Url::parse(origin) {
        Ok(parsed) => {
            let serialized = parsed.origin().ascii_serialization();
            if serialized == origin {
                None
            } else {
                Some(format!("browsers would send \"{}\"", serialized))
            }
        }
        Err(e) => Some(format!("not an absolute URL ({})", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_policy() -> CorsPolicy {
        CorsPolicy::from_config(&CorsConfig::default()).unwrap()
    }

    #[test]
    fn test_exact_match_only() {
        let policy = default_policy();

        assert!(policy.allows_origin("http://localhost:5173"));
        assert!(policy.allows_origin("http://localhost:5174"));
        assert!(!policy.allows_origin("http://localhost:5175"));
        assert!(!policy.allows_origin("HTTP://LOCALHOST:5173"));
        assert!(!policy.allows_origin("http://localhost:5173/"));
        assert!(!policy.allows_origin("http://evil.example"));
    }

    #[test]
    fn test_no_subdomain_wildcards() {
        let policy = CorsPolicy::new(vec!["https://bigsofa.example".to_string()]);
        assert!(!policy.allows_origin("https://shop.bigsofa.example"));
    }

    #[test]
    fn test_empty_policy_allows_nothing() {
        let config = CorsConfig {
            allowed_origins: vec![],
            require_origins: false,
        };
        let policy = CorsPolicy::from_config(&config).unwrap();

        assert!(policy.origins().is_empty());
        assert!(!policy.allows_origin("http://localhost:5173"));
    }

    #[test]
    fn test_empty_policy_fails_when_required() {
        let config = CorsConfig {
            allowed_origins: vec![],
            require_origins: true,
        };
        assert!(CorsPolicy::from_config(&config).is_err());
    }

    #[test]
    fn test_wildcard_entry() {
        let policy = CorsPolicy::new(vec!["*".to_string()]);
        assert!(policy.allows_origin("https://anything.example"));
    }

    #[test]
    fn test_unmatchable_reason() {
        assert!(unmatchable_reason("http://localhost:5173").is_none());
        assert!(unmatchable_reason("https://bigsofa.example").is_none());
        assert!(unmatchable_reason("http://localhost:5173/").is_some());
        assert!(unmatchable_reason("https://BigSofa.example").is_some());
        assert!(unmatchable_reason("localhost5173").is_some());
    }

    #[test]
    fn test_null_and_wildcard_origins_are_matchable() {
        assert!(unmatchable_reason("null").is_none());
        assert!(unmatchable_reason("*").is_none());

        let policy = CorsPolicy::new(vec!["null".to_string()]);
        assert!(policy.allows_origin("null"));
        assert!(!policy.allows_origin("http://localhost:5173"));
    }

    #[test]
    fn test_describe() {
        let summary = default_policy().describe();

        assert_eq!(summary["path"], "/api/**");
        assert_eq!(summary["allowed_origins"][0], "http://localhost:5173");
        assert_eq!(summary["allowed_methods"].as_array().unwrap().len(), 6);
        assert_eq!(summary["allowed_headers"][4], "x-admin-token");
        assert_eq!(summary["allow_credentials"], false);
        assert_eq!(summary["max_age_seconds"], 1800);
    }
}
