/// causa version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Suffix given to hypothetical-world copies in a twin network.
pub const TWIN_SUFFIX: &str = "*";
