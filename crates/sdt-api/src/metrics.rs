//! Prometheus counters for the `/metrics` endpoint.
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub normalized: IntCounter,
    pub rejected: IntCounterVec,
    pub pickers: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let normalized = IntCounter::new("sdt_values_normalized_total", "Submitted values accepted and normalized")?;
        let rejected = IntCounterVec::new(
            Opts::new("sdt_values_rejected_total", "Submitted values rejected, by error code"),
            &["code"],
        )?;
        let pickers = IntCounter::new("sdt_picker_configs_total", "Picker configurations built")?;

        registry.register(Box::new(normalized.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(pickers.clone()))?;

        Ok(Self {
            registry,
            normalized,
            rejected,
            pickers,
        })
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        encode(&self.registry)
    }
}

pub fn encode(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.normalized.inc();
        metrics.rejected.with_label_values(&["PARSE"]).inc();

        let text = metrics.encode().unwrap();
        assert!(text.contains("sdt_values_normalized_total 1"));
        assert!(text.contains("sdt_values_rejected_total{code=\"PARSE\"} 1"));
    }
}
