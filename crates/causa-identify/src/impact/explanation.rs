//! Explanation templates per identification strategy.

use std::collections::BTreeSet;

use causa_core::errors::IdentificationFailure;
use causa_core::{NameResolver, VarId};
use serde::{Deserialize, Serialize};

/// How a causal-impact query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Observational,
    NoConfounding,
    Backdoor,
    Frontdoor,
    DoCalculus,
}

/// Templates use `{set}` for the adjustment set.
pub fn template_for(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Observational => "No intervention: observational query.",
        Strategy::NoConfounding => "No confounding found.",
        Strategy::Backdoor => "backdoor [{set}] found.",
        Strategy::Frontdoor => "frontdoor [{set}] found.",
        Strategy::DoCalculus => "Do-calculus computations",
    }
}

pub fn render(strategy: Strategy, names: &dyn NameResolver, set: &BTreeSet<VarId>) -> String {
    let listed: Vec<String> = set.iter().map(|v| names.name_of(*v)).collect();
    template_for(strategy).replace("{set}", &listed.join(", "))
}

/// Explanation carried by an impact that could not be identified.
pub fn failure(failure: &IdentificationFailure) -> String {
    match failure {
        IdentificationFailure::Hedge(hedge) => format!("Hedge exception: {}", hedge.message),
        IdentificationFailure::Unidentifiable(u) => format!("Unidentifiable: {}", u.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names;

    impl NameResolver for Names {
        fn name_of(&self, id: VarId) -> String {
            format!("V{}", id.0)
        }
    }

    #[test]
    fn set_placeholder_is_filled() {
        let set = BTreeSet::from([VarId(2), VarId(0)]);
        assert_eq!(render(Strategy::Backdoor, &Names, &set), "backdoor [V0, V2] found.");
        assert_eq!(render(Strategy::NoConfounding, &Names, &set), "No confounding found.");
    }

    #[test]
    fn hedge_failures_are_labelled() {
        let f = IdentificationFailure::hedge("hedge on {A,B}", BTreeSet::new(), BTreeSet::new());
        assert_eq!(failure(&f), "Hedge exception: hedge on {A,B}");
    }
}
