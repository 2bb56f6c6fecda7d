//! bigsofa-api - CORS-governed API edge for the BigSofa frontends.
//!
//! The origin allow-list is read from `APP_CORS_ALLOWED_ORIGINS` once at
//! startup and applied, together with a fixed method/header/max-age policy,
//! to every route under `/api`.

pub mod admin;
pub mod config;
pub mod cors;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
