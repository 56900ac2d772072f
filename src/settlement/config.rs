use crate::core::money::Money;
use serde::{Deserialize, Serialize};

/// Tunables for the settlement pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifierConfig {
    /// Balances and remainders at or below this amount count as settled.
    pub tolerance: Money,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            tolerance: Money::CENT,
        }
    }
}

impl SimplifierConfig {
    pub fn with_tolerance(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}
