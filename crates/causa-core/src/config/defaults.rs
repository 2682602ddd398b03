//! Compiled default values for every configuration knob.

/// Try the backdoor criterion before falling back to the ID recursion.
pub const DEFAULT_TRY_BACKDOOR: bool = true;

/// Try the front-door criterion before falling back to the ID recursion.
pub const DEFAULT_TRY_FRONTDOOR: bool = true;

/// Apply do-calculus rules 2 and 3 before the ID recursion.
pub const DEFAULT_APPLY_RULES: bool = true;

/// Absolute tolerance under which a denominator cell counts as zero.
pub const DEFAULT_ZERO_TOLERANCE: f64 = 0.0;
