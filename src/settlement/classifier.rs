use crate::core::balance::NetBalance;
use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use crate::settlement::plan::Anomaly;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A participant with an outstanding position. `amount` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedParticipant {
    pub id: ParticipantId,
    pub amount: Money,
}

impl ClassifiedParticipant {
    pub fn new(id: ParticipantId, amount: Money) -> Self {
        Self { id, amount }
    }
}

/// Largest amount first, then participant id ascending.
pub(crate) fn settlement_order(a: &ClassifiedParticipant, b: &ClassifiedParticipant) -> Ordering {
    b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id))
}

/// Net balances split into the two sides of the settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Participants owed money, largest first.
    pub creditors: Vec<ClassifiedParticipant>,
    /// Participants owing money, largest first.
    pub debtors: Vec<ClassifiedParticipant>,
}

impl Classification {
    pub fn creditor_total(&self) -> Money {
        self.creditors.iter().map(|c| c.amount).sum()
    }

    pub fn debtor_total(&self) -> Money {
        self.debtors.iter().map(|d| d.amount).sum()
    }

    /// Reports a mismatch between both sides, which means positions close
    /// to zero were dropped unevenly.
    pub fn imbalance(&self) -> Option<Anomaly> {
        let creditor_total = self.creditor_total();
        let debtor_total = self.debtor_total();
        (creditor_total != debtor_total).then_some(Anomaly::ClassificationImbalance {
            creditor_total,
            debtor_total,
        })
    }
}

/// Split net balances into creditors and debtors.
///
/// Balances are already whole minor units, so no further rounding happens
/// here. A balance strictly above `tolerance` makes a creditor, strictly
/// below `-tolerance` a debtor; everything else is settled and dropped.
pub fn classify(net: &NetBalance, tolerance: Money) -> Classification {
    let mut classification = Classification::default();

    for (id, amount) in net.iter() {
        if amount > tolerance {
            classification
                .creditors
                .push(ClassifiedParticipant::new(id.clone(), amount));
        } else if amount < -tolerance {
            classification
                .debtors
                .push(ClassifiedParticipant::new(id.clone(), amount.abs()));
        }
    }

    classification.creditors.sort_by(settlement_order);
    classification.debtors.sort_by(settlement_order);
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debt::DebtEdge;

    fn net(edges: &[(&str, &str, i64)]) -> NetBalance {
        let edges: Vec<DebtEdge> = edges
            .iter()
            .map(|(f, t, c)| DebtEdge::new((*f).into(), (*t).into(), Money::from_minor(*c)))
            .collect();
        NetBalance::from_edges(&edges)
    }

    fn names(list: &[ClassifiedParticipant]) -> Vec<&str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_split_into_sides() {
        let c = classify(&net(&[("A", "B", 6_000), ("A", "C", 4_000), ("D", "A", 5_000)]), Money::CENT);
        assert_eq!(names(&c.creditors), vec!["B", "C"]);
        assert_eq!(names(&c.debtors), vec!["A", "D"]);
        assert_eq!(c.debtors[0].amount, Money::from_minor(5_000));
        assert!(c.imbalance().is_none());
    }

    #[test]
    fn test_ties_break_on_id() {
        let c = classify(&net(&[("X", "C", 5_000), ("X", "B", 5_000)]), Money::CENT);
        assert_eq!(names(&c.creditors), vec!["B", "C"]);
    }

    #[test]
    fn test_amounts_within_tolerance_are_settled() {
        // A is one cent short: exactly at the tolerance, so settled.
        let c = classify(&net(&[("A", "B", 1)]), Money::CENT);
        assert!(c.creditors.is_empty());
        assert!(c.debtors.is_empty());

        let c = classify(&net(&[("A", "B", 2)]), Money::CENT);
        assert_eq!(c.creditors.len(), 1);
        assert_eq!(c.debtors.len(), 1);
    }

    #[test]
    fn test_uneven_drop_reports_imbalance() {
        // B is owed 0.02, A and C each owe 0.01 and get dropped.
        let c = classify(&net(&[("A", "B", 1), ("C", "B", 1)]), Money::CENT);
        assert_eq!(
            c.imbalance(),
            Some(Anomaly::ClassificationImbalance {
                creditor_total: Money::from_minor(2),
                debtor_total: Money::ZERO,
            })
        );
    }

    #[test]
    fn test_amounts_are_positive() {
        let c = classify(&net(&[("A", "B", 12_345)]), Money::CENT);
        assert!(c.creditors.iter().chain(&c.debtors).all(|p| p.amount.is_positive()));
    }
}
