//! Span definitions per operation: identification, adjustment search, evaluation, counterfactual.

/// Create an identification span.
#[macro_export]
macro_rules! identification_span {
    ($on:expr, $doing:expr) => {
        tracing::info_span!("causa.identification", on = ?$on, doing = ?$doing)
    };
}

/// Create an adjustment-set search span.
#[macro_export]
macro_rules! adjustment_span {
    ($kind:expr, $cause:expr, $effect:expr) => {
        tracing::debug_span!("causa.adjustment", kind = %$kind, cause = %$cause, effect = %$effect)
    };
}

/// Create a formula evaluation span.
#[macro_export]
macro_rules! evaluation_span {
    ($nodes:expr) => {
        tracing::debug_span!("causa.evaluation", nodes = $nodes)
    };
}

/// Create a counterfactual span.
#[macro_export]
macro_rules! counterfactual_span {
    ($whatif:expr) => {
        tracing::info_span!("causa.counterfactual", whatif = ?$whatif)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const IDENTIFICATION: &str = "causa.identification";
    pub const ADJUSTMENT: &str = "causa.adjustment";
    pub const EVALUATION: &str = "causa.evaluation";
    pub const COUNTERFACTUAL: &str = "causa.counterfactual";
}
