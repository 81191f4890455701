//! Tracing setup and per-request logging.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, Level, event, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// The caller's `X-Request-Id` when it is usable, otherwise a fresh UUID.
fn request_id(req: &Request) -> String {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn level_for(status: u16) -> Level {
    match status {
        500.. => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

/// Runs the request inside a span carrying its id, logs one line when the
/// response is ready and echoes the id back in `X-Request-Id`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let id = request_id(&req);
    let span = info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis();
    let level = level_for(status);
    span.in_scope(|| {
        if level == Level::ERROR {
            event!(Level::ERROR, status, latency_ms, "Request failed");
        } else if level == Level::WARN {
            event!(Level::WARN, status, latency_ms, "Request rejected");
        } else {
            event!(Level::INFO, status, latency_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // axum logs extractor rejections at TRACE under `axum::rejection`
        EnvFilter::new(format!(
            "{}=debug,brs_db=debug,brs_cache=info,tower_http=debug,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}
