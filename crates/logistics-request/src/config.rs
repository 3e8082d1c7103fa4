use logistics_core::tree::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Tuning knobs for building request trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest crafting level a sub-request may sit at.
    pub max_depth: usize,
    /// Claim surplus left by other crafts in the same tree before asking
    /// suppliers.
    pub use_extras: bool,
    /// Fall back to crafters when stock runs out.
    pub allow_crafting: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            use_extras: true,
            allow_crafting: true,
        }
    }
}

impl ResolverConfig {
    /// Stock only: no crafting, no surplus.
    pub fn stock_only() -> Self {
        Self {
            use_extras: false,
            allow_crafting: false,
            ..Self::default()
        }
    }
}
