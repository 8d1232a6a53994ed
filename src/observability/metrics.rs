use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Refresh cycle
    pub refresh_requests: IntCounter,

    // Cache
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    pub cache_corrupt: IntCounter,

    // Fetch
    pub fetch_requests: IntCounter,
    pub fetch_failures: IntCounter,
    pub fetch_duration: Histogram,

    // Store
    pub store_read_failures: IntCounter,
    pub store_write_failures: IntCounter,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenkeeper".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            refresh_requests: IntCounter::new("refresh_requests_total", "Total refresh calls").unwrap(),

            cache_hits: IntCounter::new("cache_hits_total", "Refreshes served from the cached slot").unwrap(),
            cache_misses: IntCounter::new("cache_misses_total", "Cache reads yielding no usable token").unwrap(),
            cache_corrupt: IntCounter::new("cache_corrupt_total", "Cached blobs that failed to decrypt or parse").unwrap(),

            fetch_requests: IntCounter::new("fetch_requests_total", "Token endpoint fetch phases").unwrap(),
            fetch_failures: IntCounter::new("fetch_failures_total", "Fetch phases that failed after retries").unwrap(),
            fetch_duration: Histogram::with_opts(HistogramOpts::new("fetch_duration_seconds", "Fetch phase duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).unwrap(),

            store_read_failures: IntCounter::new("store_read_failures_total", "Store backend read failures").unwrap(),
            store_write_failures: IntCounter::new("store_write_failures_total", "Store backend write failures").unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.refresh_requests.clone())).unwrap();
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.cache_corrupt.clone())).unwrap();
        reg.register(Box::new(metrics.fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.store_read_failures.clone())).unwrap();
        reg.register(Box::new(metrics.store_write_failures.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
