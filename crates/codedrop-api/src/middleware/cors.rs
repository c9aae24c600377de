//! CORS layer built from `server.cors`.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use codedrop_core::config::app::CorsConfig;

/// Builds the CORS layer. A `"*"` entry allows any origin (or header).
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(parse_entries::<Method>("method", &config.allowed_methods))
        .max_age(Duration::from_secs(config.max_age_seconds));

    let layer = if is_wildcard(&config.allowed_origins) {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parse_entries::<HeaderValue>("origin", &config.allowed_origins))
    };

    if is_wildcard(&config.allowed_headers) {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers(parse_entries::<HeaderName>("header", &config.allowed_headers))
    }
}

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|e| e.trim() == "*")
}

/// Parses each entry, skipping (and logging) the ones that do not parse.
fn parse_entries<T: FromStr>(what: &str, entries: &[String]) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match entry.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(entry = %entry, "Ignoring invalid CORS {}", what);
                None
            }
        })
        .collect()
}
