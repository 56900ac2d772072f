use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a debt edge.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebtError {
    #[error("debt amount must be positive, got {0}")]
    NonPositiveAmount(Money),
    #[error("participant {0} cannot owe themselves")]
    SelfDebt(ParticipantId),
    #[error("debt amount {0} exceeds the supported maximum of {max}", max = Money::MAX_ABS)]
    AmountTooLarge(Money),
}

/// A directed debt: `from` owes `to` the given `amount`.
///
/// Several edges between the same ordered pair are allowed; aggregation
/// simply sums them.
///
/// # Examples
///
/// ```
/// use settle_engine::core::debt::DebtEdge;
/// use settle_engine::core::money::Money;
/// use settle_engine::core::participant::ParticipantId;
///
/// let edge = DebtEdge::new(
///     ParticipantId::new("A"),
///     ParticipantId::new("B"),
///     Money::from_minor(10_000),
/// );
///
/// assert_eq!(edge.amount().to_string(), "100.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    /// The participant that owes.
    from: ParticipantId,
    /// The participant that is owed.
    to: ParticipantId,
    amount: Money,
}

impl DebtEdge {
    /// Create a new edge.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive. Use [`DebtEdge::try_new`] for
    /// input that has not been validated upstream.
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Money) -> Self {
        assert!(
            amount.is_positive(),
            "Debt amount must be positive, got {}",
            amount
        );
        Self { from, to, amount }
    }

    pub fn try_new(from: ParticipantId, to: ParticipantId, amount: Money) -> Result<Self, DebtError> {
        if !amount.is_positive() {
            return Err(DebtError::NonPositiveAmount(amount));
        }
        if !amount.is_within_limit() {
            return Err(DebtError::AmountTooLarge(amount));
        }
        if from == to {
            return Err(DebtError::SelfDebt(from));
        }
        Ok(Self { from, to, amount })
    }

    pub fn from(&self) -> &ParticipantId {
        &self.from
    }

    pub fn to(&self) -> &ParticipantId {
        &self.to
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// An ordered collection of debt edges, as handed over by the expense ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSet {
    edges: Vec<DebtEdge>,
}

impl DebtSet {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub fn add(&mut self, edge: DebtEdge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[DebtEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of every edge amount before any netting.
    pub fn gross_total(&self) -> Money {
        self.edges.iter().map(|e| e.amount()).sum()
    }

    /// All participants referenced by at least one edge, sorted.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut participants: Vec<ParticipantId> = self
            .edges
            .iter()
            .flat_map(|e| [e.from().clone(), e.to().clone()])
            .collect();
        participants.sort();
        participants.dedup();
        participants
    }
}

impl FromIterator<DebtEdge> for DebtSet {
    fn from_iter<T: IntoIterator<Item = DebtEdge>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DebtSet {
    type Item = &'a DebtEdge;
    type IntoIter = std::slice::Iter<'a, DebtEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
