//! Prometheus counters for form jobs.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new_custom(Some("taxform".to_string()), None)
        .unwrap_or_default();
    static ref JOBS_TOTAL: IntCounterVec = {
        let counter = IntCounterVec::new(
            Opts::new("jobs_total", "Form jobs that reached a terminal status"),
            &["outcome"],
        )
        .expect("valid jobs_total metric");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("jobs_total registered once");
        counter
    };
    static ref JOBS_REJECTED: IntCounter = {
        let counter = IntCounter::new(
            "jobs_rejected_total",
            "Form jobs refused because the queue was full",
        )
        .expect("valid jobs_rejected_total metric");
        REGISTRY
            .register(Box::new(counter.clone()))
            .expect("jobs_rejected_total registered once");
        counter
    };
}

pub fn record_job_outcome(outcome: &str) {
    JOBS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_rejected_job() {
    JOBS_REJECTED.inc();
}

/// All counters in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    lazy_static::initialize(&JOBS_TOTAL);
    lazy_static::initialize(&JOBS_REJECTED);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
