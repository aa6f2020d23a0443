use std::future::Future;
use std::time::{Duration, Instant};

use spendview_domain::Result;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,spendview=debug";

/// Install the global subscriber.
///
/// `RUST_LOG` selects the filter; `SPENDVIEW_LOG_JSON=1` switches to
/// newline-delimited JSON output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("SPENDVIEW_LOG_JSON")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

/// Log the outcome of a route with structured fields.
///
/// `route` should be a stable identifier such as `"dashboard::view"`.
#[inline]
pub fn log_route_outcome(route: &str, elapsed: Duration, error: Option<&'static str>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(route, duration_ms, "route_success"),
        Some(reason) => warn!(route, duration_ms, reason, "route_failure"),
    }
}

/// Run a route body, timing it and logging the outcome.
pub async fn execute_logged<F, Fut, T>(route: &str, body: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = body().await;
    log_route_outcome(route, start.elapsed(), result.as_ref().err().map(|e| e.reason_code()));
    result
}
