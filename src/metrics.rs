#[cfg(feature = "metrics")]
use lazy_static::lazy_static;
#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

#[cfg(feature = "metrics")]
lazy_static! {
    static ref FRAGMENTS_EMITTED: IntCounter = register_int_counter!(
        "fragments_emitted_total",
        "Total number of element fragments handed to the decoder"
    ).expect("fragments_emitted_total registered once");
    static ref CARRY_BUFFER_BYTES: IntGauge = register_int_gauge!(
        "carry_buffer_bytes",
        "Bytes of the element currently carried across a chunk edge"
    ).expect("carry_buffer_bytes registered once");
    static ref RECORDS_SKIPPED: IntCounter = register_int_counter!(
        "records_skipped_total",
        "Total number of fragments that failed to decode and were skipped"
    ).expect("records_skipped_total registered once");
    static ref STREAMS_FAILED: IntCounter = register_int_counter!(
        "streams_failed_total",
        "Total number of response bodies aborted by a reassembly error"
    ).expect("streams_failed_total registered once");
}

pub(crate) fn fragments_emitted(_count: usize) {
    #[cfg(feature = "metrics")]
    FRAGMENTS_EMITTED.inc_by(_count as u64);
}

pub(crate) fn carry_bytes(_len: usize) {
    #[cfg(feature = "metrics")]
    CARRY_BUFFER_BYTES.set(_len as i64);
}

pub(crate) fn record_skipped() {
    #[cfg(feature = "metrics")]
    RECORDS_SKIPPED.inc();
}

pub(crate) fn stream_failed() {
    #[cfg(feature = "metrics")]
    STREAMS_FAILED.inc();
}

/// Renders every registered metric in the Prometheus text format.
#[cfg(feature = "metrics")]
pub fn gather_metrics() -> prometheus::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
