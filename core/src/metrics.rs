use log::warn;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Teller som blir en no-op hvis den ikke kunne opprettes.
#[derive(Clone, Default)]
pub struct Counter(Option<IntCounter>);

impl Counter {
    pub fn inc(&self) {
        if let Some(c) = &self.0 {
            c.inc();
        }
    }

    pub fn inc_by(&self, v: u64) {
        if let Some(c) = &self.0 {
            c.inc_by(v);
        }
    }

    pub fn get(&self) -> u64 {
        self.0.as_ref().map_or(0, IntCounter::get)
    }
}

/// Prosess-tellere for analysekjøringene (kun monotone tellere, ingen lås i kjernen).
pub struct Metrics {
    registry: Registry,
    pub tracks_processed: Counter,
    pub tracks_insufficient: Counter,
    pub outliers_replaced: Counter,
    pub points_fused: Counter,
    pub wind_missing_points: Counter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Counter {
    let c = match IntCounter::new(name, help) {
        Ok(c) => c,
        Err(e) => {
            warn!("metrics: invalid counter {name}: {e}");
            return Counter::default();
        }
    };
    if let Err(e) = registry.register(Box::new(c.clone())) {
        warn!("metrics: could not register {name}: {e}");
    }
    Counter(Some(c))
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new_custom(Some("sailperf".into()), None)
            .unwrap_or_default();
        Self {
            tracks_processed: counter(&registry, "tracks_processed_total", "Tracks run through the pipeline"),
            tracks_insufficient: counter(
                &registry,
                "tracks_insufficient_data_total",
                "Tracks rejected with fewer than two points",
            ),
            outliers_replaced: counter(&registry, "speed_outliers_replaced_total", "Speed samples replaced by neighbour mean"),
            points_fused: counter(&registry, "points_fused_total", "Fused records produced"),
            wind_missing_points: counter(
                &registry,
                "wind_missing_points_total",
                "Fused records without wind data",
            ),
            registry,
        }
    }
}

static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Prometheus tekstformat for alle tellere.
pub fn gather_text() -> String {
    let mut buf = Vec::new();
    let families = METRICS.registry.gather();
    if let Err(e) = TextEncoder::new().encode(&families, &mut buf) {
        warn!("metrics: encode failed: {e}");
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
