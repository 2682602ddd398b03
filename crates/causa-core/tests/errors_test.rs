use std::collections::BTreeSet;

use causa_core::errors::*;
use causa_core::VarId;

#[test]
fn graph_cycle_carries_path() {
    let err = GraphError::CycleDetected {
        path: "A -> B -> A".into(),
    };
    assert!(err.to_string().contains("A -> B -> A"));
    assert_eq!(err.error_code(), error_code::CYCLE_DETECTED);
}

#[test]
fn invalid_latent_carries_name_and_reason() {
    let err = GraphError::InvalidLatent {
        name: "U".into(),
        reason: "a latent confounder needs at least two distinct children".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("U"));
    assert!(msg.contains("two distinct children"));
    assert_eq!(err.coded_string(), format!("[STRUCTURAL_ERROR] {msg}"));
}

#[test]
fn hedge_keeps_its_witness() {
    let failure = IdentificationFailure::hedge(
        "hedge on {A,B} with witness {B}",
        BTreeSet::from([VarId(0), VarId(1)]),
        BTreeSet::from([VarId(1)]),
    );
    assert_eq!(failure.message(), "hedge on {A,B} with witness {B}");
    assert_eq!(failure.as_hedge().unwrap().witness, BTreeSet::from([VarId(1)]));
    assert_eq!(failure.error_code(), error_code::HEDGE);
    assert!(failure.to_string().starts_with("hedge found"));
}

#[test]
fn unidentifiable_has_no_hedge() {
    let failure = IdentificationFailure::unidentifiable("no district contains {Y}");
    assert!(failure.as_hedge().is_none());
    assert_eq!(failure.error_code(), error_code::UNIDENTIFIABLE);
}

#[test]
fn causal_error_wraps_every_subsystem() {
    let err: CausalError = ModelError::UnknownVariable { name: "Z".into() }.into();
    assert_eq!(err.error_code(), error_code::MODEL_ERROR);
    assert!(err.to_string().contains("Z"));

    let err: CausalError = EvaluationError::DivisionByZero {
        assignment: "[#0=1]".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::EVALUATION_ERROR);

    let err: CausalError = IdentificationFailure::unidentifiable("x").into();
    assert_eq!(err.error_code(), error_code::UNIDENTIFIABLE);

    let err = CausalError::InvalidQuery {
        reason: "no target variable".into(),
    };
    assert_eq!(err.coded_string(), "[INVALID_QUERY] invalid query: no target variable");
}

#[test]
fn inference_failures_keep_their_code_inside_evaluation() {
    let err: EvaluationError = ModelError::CycleDetected {
        from: "C".into(),
        to: "A".into(),
        path: "A -> B -> C -> A".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CYCLE_DETECTED);
}
