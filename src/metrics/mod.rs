use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for the order endpoints
// ============================================================================
//
// Tracks:
// - Draft orders created and items added
// - Rejected requests by operation and error kind
// - Request latency per operation
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub const CREATE_DRAFT_ORDER: &str = "create_draft_order";
pub const ADD_ITEM_TO_DRAFT_ORDER: &str = "add_item_to_draft_order";

pub struct Metrics {
    registry: Registry,

    pub draft_orders_created: IntCounter,
    pub order_items_added: IntCounter,
    pub requests_rejected: IntCounterVec,
    pub request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let draft_orders_created =
            IntCounter::new("draft_orders_created_total", "Total draft orders created")?;
        registry.register(Box::new(draft_orders_created.clone()))?;

        let order_items_added =
            IntCounter::new("order_items_added_total", "Total items added to draft orders")?;
        registry.register(Box::new(order_items_added.clone()))?;

        let requests_rejected = IntCounterVec::new(
            Opts::new("order_requests_rejected_total", "Total order requests that failed"),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(requests_rejected.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new("order_request_duration_seconds", "Order request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            draft_orders_created,
            order_items_added,
            requests_rejected,
            request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record a draft order created
    pub fn record_order_created(&self, duration_secs: f64) {
        self.draft_orders_created.inc();
        self.observe_duration(CREATE_DRAFT_ORDER, duration_secs);
    }

    /// Helper to record an item added to a draft order
    pub fn record_item_added(&self, duration_secs: f64) {
        self.order_items_added.inc();
        self.observe_duration(ADD_ITEM_TO_DRAFT_ORDER, duration_secs);
    }

    /// Helper to record a failed request by error kind
    pub fn record_rejection(&self, operation: &str, kind: &str, duration_secs: f64) {
        self.requests_rejected
            .with_label_values(&[operation, kind])
            .inc();
        self.observe_duration(operation, duration_secs);
    }

    fn observe_duration(&self, operation: &str, duration_secs: f64) {
        self.request_duration
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Render every registered metric in the Prometheus text format
    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
