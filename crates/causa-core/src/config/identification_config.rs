use serde::{Deserialize, Serialize};

use super::defaults;

/// Identification engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationConfig {
    /// Look for a backdoor adjustment set for single cause/effect queries.
    pub try_backdoor: bool,
    /// Look for a front-door adjustment set for single cause/effect queries.
    pub try_frontdoor: bool,
    /// Short-circuit the ID recursion with do-calculus rules 2 and 3.
    pub apply_rules: bool,
    /// Largest adjustment set the generators enumerate. `None` is unbounded.
    pub max_set_size: Option<usize>,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            try_backdoor: defaults::DEFAULT_TRY_BACKDOOR,
            try_frontdoor: defaults::DEFAULT_TRY_FRONTDOOR,
            apply_rules: defaults::DEFAULT_APPLY_RULES,
            max_set_size: None,
        }
    }
}
