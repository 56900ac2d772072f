use crate::core::debt::DebtEdge;
use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of every participant touched by a debt graph.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Entries are kept ordered by participant id so iteration is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalance {
    positions: BTreeMap<ParticipantId, Money>,
}

impl NetBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a list of edges into net positions. See [`aggregate`].
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a DebtEdge>,
    {
        let mut balance = Self::new();
        for edge in edges {
            balance.apply_edge(edge);
        }
        balance
    }

    /// Apply a debt: `from` loses, `to` gains.
    pub fn apply_edge(&mut self, edge: &DebtEdge) {
        *self
            .positions
            .entry(edge.from().clone())
            .or_insert(Money::ZERO) -= edge.amount();
        *self
            .positions
            .entry(edge.to().clone())
            .or_insert(Money::ZERO) += edge.amount();
    }

    /// Net position of a participant; zero for anyone not present.
    pub fn get(&self, participant: &ParticipantId) -> Money {
        self.positions
            .get(participant)
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Money)> + '_ {
        self.positions.iter().map(|(p, m)| (p, *m))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of every position. Zero for any closed debt graph.
    pub fn total(&self) -> Money {
        self.positions.values().sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total().is_zero()
    }

    /// Total owed to net creditors (equals the total owed by net debtors).
    pub fn creditor_total(&self) -> Money {
        self.positions.values().filter(|m| m.is_positive()).sum()
    }
}

/// Reduce raw pairwise debts to a net position per participant.
///
/// Participants that never appear in `edges` are absent from the result.
/// Amounts are not validated here.
pub fn aggregate(edges: &[DebtEdge]) -> NetBalance {
    NetBalance::from_edges(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str, cents: i64) -> DebtEdge {
        DebtEdge::new(from.into(), to.into(), Money::from_minor(cents))
    }

    #[test]
    fn test_aggregate_basic() {
        let net = aggregate(&[edge("A", "B", 10_000)]);
        assert_eq!(net.get(&"A".into()), Money::from_minor(-10_000));
        assert_eq!(net.get(&"B".into()), Money::from_minor(10_000));
        assert_eq!(net.get(&"Z".into()), Money::ZERO);
        assert_eq!(net.len(), 2);
    }

    #[test]
    fn test_parallel_edges_are_summed() {
        let net = aggregate(&[edge("A", "B", 2_500), edge("A", "B", 7_500)]);
        assert_eq!(net.get(&"A".into()), Money::from_minor(-10_000));
        assert_eq!(net.get(&"B".into()), Money::from_minor(10_000));
    }

    #[test]
    fn test_chain_positions() {
        let net = aggregate(&[edge("A", "B", 10_000), edge("B", "C", 5_000)]);
        assert_eq!(net.get(&"A".into()), Money::from_minor(-10_000));
        assert_eq!(net.get(&"B".into()), Money::from_minor(5_000));
        assert_eq!(net.get(&"C".into()), Money::from_minor(5_000));
        assert!(net.is_balanced());
        assert_eq!(net.creditor_total(), Money::from_minor(10_000));
    }

    #[test]
    fn test_circular_cancels() {
        let net = aggregate(&[
            edge("A", "B", 10_000),
            edge("B", "C", 10_000),
            edge("C", "A", 10_000),
        ]);
        // Everyone still appears, with a zero position.
        assert_eq!(net.len(), 3);
        assert!(net.iter().all(|(_, m)| m.is_zero()));
        assert_eq!(net.creditor_total(), Money::ZERO);
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let net = aggregate(&[edge("zed", "amy", 100), edge("mo", "amy", 100)]);
        let ids: Vec<&str> = net.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(ids, vec!["amy", "mo", "zed"]);
    }

    #[test]
    fn test_empty() {
        let net = aggregate(&[]);
        assert!(net.is_empty());
        assert!(net.is_balanced());
    }
}
