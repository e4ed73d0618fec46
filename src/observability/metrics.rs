use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignments_total: IntCounterVec,
    pub jobs_active: IntGauge,
    pub pod_verifications_total: IntCounterVec,
    pub cascade_steps_total: IntCounterVec,
    pub cascade_latency_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Job assignment attempts by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let jobs_active = IntGauge::new("jobs_active", "Jobs currently held by couriers")
            .expect("valid jobs_active metric");

        let pod_verifications_total = IntCounterVec::new(
            Opts::new(
                "pod_verifications_total",
                "OTP verification attempts by role and outcome",
            ),
            &["role", "outcome"],
        )
        .expect("valid pod_verifications_total metric");

        let cascade_steps_total = IntCounterVec::new(
            Opts::new(
                "cascade_steps_total",
                "Cascade hop results by step and outcome",
            ),
            &["step", "outcome"],
        )
        .expect("valid cascade_steps_total metric");

        let cascade_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "cascade_latency_seconds",
                "Latency of confirmation cascades in seconds",
            ),
            &["kind"],
        )
        .expect("valid cascade_latency_seconds metric");

        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(jobs_active.clone()))
            .expect("register jobs_active");
        registry
            .register(Box::new(pod_verifications_total.clone()))
            .expect("register pod_verifications_total");
        registry
            .register(Box::new(cascade_steps_total.clone()))
            .expect("register cascade_steps_total");
        registry
            .register(Box::new(cascade_latency_seconds.clone()))
            .expect("register cascade_latency_seconds");

        Self {
            registry,
            assignments_total,
            jobs_active,
            pod_verifications_total,
            cascade_steps_total,
            cascade_latency_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
