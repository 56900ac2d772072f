//! # settle-engine
//!
//! Shared-expense debt simplification.
//!
//! Given the pairwise debts inside a group ("A owes B 100"), this engine
//! computes every member's net position and collapses the whole web into a
//! short list of direct transfers that settles everybody.
//!
//! ## Architecture
//!
//! - **core**: participants, fixed-point money, debt edges, net balances
//!   and the expense ledger that produces the edges
//! - **settlement**: classification, greedy largest-first matching and the
//!   `Simplifier` that composes them
//! - **simulation**: random debt networks for benchmarks and stress tests
//!
//! Every amount is held as a whole number of cents, so no step can gain or
//! lose money to rounding.

pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{aggregate, NetBalance};
    pub use crate::core::debt::{DebtEdge, DebtSet};
    pub use crate::core::expense::{Expense, ExpenseLedger, Share};
    pub use crate::core::money::Money;
    pub use crate::core::participant::ParticipantId;
    pub use crate::settlement::classifier::{classify, Classification, ClassifiedParticipant};
    pub use crate::settlement::config::SimplifierConfig;
    pub use crate::settlement::matcher::GreedyMatcher;
    pub use crate::settlement::plan::{Anomaly, MatchOutcome, SettlementPlan, Transfer};
    pub use crate::settlement::simplifier::{SimplificationTrace, Simplifier};
    pub use crate::settlement::summary::ParticipantSummary;
}
