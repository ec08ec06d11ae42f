use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGaugeVec,
};

lazy_static! {
    pub static ref BATCH_DURATION: HistogramVec = register_histogram_vec!(
        "cfkit_batch_duration_seconds",
        "Mutation batch execution duration in seconds",
        &["executor", "status"]
    ).unwrap();

    pub static ref MUTATION_COUNTER: IntCounterVec = register_int_counter_vec!(
        "cfkit_mutations_total",
        "Total number of mutations queued",
        &["column_family", "op"]
    ).unwrap();

    pub static ref PENDING_MUTATIONS: IntGaugeVec = register_int_gauge_vec!(
        "cfkit_pending_mutations",
        "Mutations queued but not yet executed",
        &["column_family"]
    ).unwrap();
}

pub fn record_batch(executor: &str, success: bool, duration: f64) {
    let status = if success { "success" } else { "failure" };
    BATCH_DURATION
        .with_label_values(&[executor, status])
        .observe(duration);
}

pub fn record_mutation(column_family: &str, op: &str) {
    MUTATION_COUNTER.with_label_values(&[column_family, op]).inc();
}

pub fn set_pending(column_family: &str, pending: usize) {
    PENDING_MUTATIONS
        .with_label_values(&[column_family])
        .set(pending as i64);
}
