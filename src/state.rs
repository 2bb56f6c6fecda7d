use crate::cors::CorsPolicy;
use chrono::{DateTime, Utc};

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to handlers via Axum's State extraction.
/// Nothing in it changes after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The CORS policy registered on `/api/**`
    pub cors_policy: CorsPolicy,

    /// When the server finished bootstrapping
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(cors_policy: CorsPolicy) -> Self {
        Self {
            cors_policy,
            started_at: Utc::now(),
        }
    }
}
