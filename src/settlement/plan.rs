use crate::core::debt::DebtEdge;
use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A single direct payment in a settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// The transfers that settle every outstanding position.
///
/// Transfers keep the order in which the matcher produced them: debtors in
/// processing order, and for each debtor the creditors in the order they
/// were paid. Each (debtor, creditor) pair appears at most once and no
/// transfer carries a zero amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPlan {
    transfers: Vec<Transfer>,
}

impl SettlementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount `debtor` pays `creditor`. Zero amounts are ignored.
    pub(crate) fn record(&mut self, debtor: &ParticipantId, creditor: &ParticipantId, amount: Money) {
        if amount.is_zero() {
            return;
        }
        match self
            .transfers
            .iter_mut()
            .find(|t| &t.from == debtor && &t.to == creditor)
        {
            Some(existing) => existing.amount = amount,
            None => self.transfers.push(Transfer {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            }),
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn amount_between(&self, debtor: &ParticipantId, creditor: &ParticipantId) -> Option<Money> {
        self.transfers
            .iter()
            .find(|t| &t.from == debtor && &t.to == creditor)
            .map(|t| t.amount)
    }

    pub fn transfers_from<'a>(
        &'a self,
        debtor: &'a ParticipantId,
    ) -> impl Iterator<Item = &'a Transfer> + 'a {
        self.transfers.iter().filter(move |t| &t.from == debtor)
    }

    /// Paying participants in the order they were processed.
    pub fn debtors(&self) -> Vec<&ParticipantId> {
        let mut seen: Vec<&ParticipantId> = Vec::new();
        for t in &self.transfers {
            if !seen.contains(&&t.from) {
                seen.push(&t.from);
            }
        }
        seen
    }

    /// Total money moved by the plan.
    pub fn total(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// The plan as debt edges, e.g. to feed it back into the simplifier.
    pub fn to_edges(&self) -> Vec<DebtEdge> {
        self.transfers
            .iter()
            .map(|t| DebtEdge::new(t.from.clone(), t.to.clone(), t.amount))
            .collect()
    }

    /// Nested `debtor -> creditor -> amount` view, keyed by id.
    pub fn by_debtor(&self) -> BTreeMap<ParticipantId, BTreeMap<ParticipantId, Money>> {
        let mut map: BTreeMap<ParticipantId, BTreeMap<ParticipantId, Money>> = BTreeMap::new();
        for t in &self.transfers {
            map.entry(t.from.clone())
                .or_default()
                .insert(t.to.clone(), t.amount);
        }
        map
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transfers.is_empty() {
            return writeln!(f, "  (all settled)");
        }
        for t in &self.transfers {
            writeln!(f, "  {} owes {}: {}", t.from, t.to, t.amount)?;
        }
        Ok(())
    }
}

/// A recoverable inconsistency noticed while building a plan.
///
/// None of these occur when net balances conserve money and the same
/// tolerance is used throughout; they point at rounding or input problems.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    #[error("creditors are owed {creditor_total} but debtors owe {debtor_total}")]
    ClassificationImbalance {
        creditor_total: Money,
        debtor_total: Money,
    },
    #[error("debtor {debtor} still owes {remaining} after all creditors were paid")]
    ResidualDebt {
        debtor: ParticipantId,
        remaining: Money,
    },
    #[error("creditor {creditor} is still owed {remaining} after all debtors paid")]
    UnsettledCredit {
        creditor: ParticipantId,
        remaining: Money,
    },
}

/// A plan together with whatever went wrong while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub plan: SettlementPlan,
    pub anomalies: Vec<Anomaly>,
}

impl MatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn sample() -> SettlementPlan {
        let mut plan = SettlementPlan::new();
        plan.record(&id("D"), &id("B"), Money::from_minor(1_000));
        plan.record(&id("A"), &id("B"), Money::from_minor(5_000));
        plan.record(&id("D"), &id("C"), Money::from_minor(4_000));
        plan
    }

    #[test]
    fn test_lookup_and_total() {
        let plan = sample();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.total(), Money::from_minor(10_000));
        assert_eq!(plan.amount_between(&id("D"), &id("C")), Some(Money::from_minor(4_000)));
        assert_eq!(plan.amount_between(&id("C"), &id("D")), None);
        assert_eq!(plan.transfers_from(&id("D")).count(), 2);
    }

    #[test]
    fn test_debtors_keep_processing_order() {
        let plan = sample();
        let debtors: Vec<&str> = plan.debtors().iter().map(|p| p.as_str()).collect();
        assert_eq!(debtors, vec!["D", "A"]);
    }

    #[test]
    fn test_record_sets_rather_than_sums() {
        let mut plan = SettlementPlan::new();
        plan.record(&id("A"), &id("B"), Money::from_minor(100));
        plan.record(&id("A"), &id("B"), Money::from_minor(300));
        plan.record(&id("A"), &id("C"), Money::ZERO);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.total(), Money::from_minor(300));
    }

    #[test]
    fn test_by_debtor_view() {
        let nested = sample().by_debtor();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[&id("D")][&id("B")], Money::from_minor(1_000));
    }

    #[test]
    fn test_display() {
        let rendered = sample().to_string();
        assert!(rendered.contains("A owes B: 50.00"));
        assert_eq!(SettlementPlan::new().to_string(), "  (all settled)\n");
    }

    #[test]
    fn test_anomaly_serializes_with_kind_tag() {
        let anomaly = Anomaly::ResidualDebt {
            debtor: id("A"),
            remaining: Money::from_minor(250),
        };
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["kind"], "residual_debt");
        assert_eq!(json["remaining"], "2.50");
        assert_eq!(anomaly.to_string(), "debtor A still owes 2.50 after all creditors were paid");
    }
}
