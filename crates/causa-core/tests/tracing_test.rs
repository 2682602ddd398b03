//! Tests for the causa tracing setup.

use std::sync::Mutex;

use causa_core::tracing::init_tracing;
use causa_core::tracing::spans::names;

/// Serializes tests that set `CAUSA_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn per_crate_filter_is_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSA_LOG", "causa_identify=debug,causa_core=warn");
    init_tracing();
    std::env::remove_var("CAUSA_LOG");
}

#[test]
fn init_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CAUSA_LOG", "=====");
    init_tracing();
    std::env::remove_var("CAUSA_LOG");
}

#[test]
fn spans_use_the_documented_names() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    let on = vec![1u32];
    let doing = vec![0u32];
    let span = causa_core::identification_span!(on, doing);
    if let Some(meta) = span.metadata() {
        assert_eq!(meta.name(), names::IDENTIFICATION);
    }
    let whatif = ["X"];
    let span = causa_core::counterfactual_span!(whatif);
    if let Some(meta) = span.metadata() {
        assert_eq!(meta.name(), names::COUNTERFACTUAL);
    }
}

#[test]
fn evaluation_span_records_the_node_count() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    let span = causa_core::evaluation_span!(7usize);
    if let Some(meta) = span.metadata() {
        assert_eq!(meta.name(), names::EVALUATION);
        assert!(meta.fields().field("nodes").is_some());
        assert!(meta.fields().field("depth").is_none());
    }
}
