//! Prometheus metrics recording and background collection.

use crate::ledger::CreditLedger;
use crate::session::SessionStore;
use metrics::{counter, gauge, histogram};
use std::time::Duration;
use tweetview_core::PipelineStats;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records the outcome of one relevance pipeline run.
pub fn record_pipeline(stats: &PipelineStats, duration: Duration) {
    counter!("tweetview_pipeline_runs_total").increment(1);
    if stats.fallback {
        counter!("tweetview_pipeline_fallback_total").increment(1);
    }
    histogram!("tweetview_pipeline_duration_seconds").record(duration.as_secs_f64());
    histogram!("tweetview_vocabulary_terms").record(stats.vocabulary_size as f64);
    histogram!("tweetview_items_scored").record(stats.home_items as f64);
    histogram!("tweetview_items_returned").record(stats.returned as f64);
}

/// Records a page that did not contribute to the pipeline.
pub fn record_page_failure(collection: &str, status: u16) {
    counter!(
        "tweetview_page_failures_total",
        "collection" => collection.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Records a login attempt by outcome (`ranked`, `recharge`, `rejected`).
pub fn record_login(outcome: &str) {
    counter!("tweetview_logins_total", "outcome" => outcome.to_string()).increment(1);
}

/// Records a payment gateway operation by outcome.
pub fn record_payment(operation: &str, outcome: &str) {
    counter!(
        "tweetview_payment_operations_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Updates session and account gauges.
pub fn update_store_metrics(sessions: &dyn SessionStore, ledger: &dyn CreditLedger) {
    gauge!("tweetview_active_sessions").set(sessions.len() as f64);
    gauge!("tweetview_accounts_total").set(ledger.len() as f64);
}
