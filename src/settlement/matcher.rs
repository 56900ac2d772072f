use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use crate::settlement::classifier::ClassifiedParticipant;
use crate::settlement::plan::{Anomaly, MatchOutcome, SettlementPlan};
use log::{trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A creditor still waiting for money.
///
/// Heap order: larger remaining amount first, then smaller id first.
#[derive(Debug, PartialEq, Eq)]
struct OpenCredit {
    remaining: Money,
    id: ParticipantId,
}

impl Ord for OpenCredit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for OpenCredit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greedy largest-first matching of debtors against creditors.
///
/// # Algorithm
///
/// 1. Put every creditor into a max-heap keyed by (remaining desc, id asc).
/// 2. Walk the debtors in the order given (the classifier hands them over
///    largest first).
/// 3. While a debtor still owes anything, pop the largest open creditor and
///    pay `min(debt, credit)`.
/// 4. Push the creditor back while it is still owed something.
///
/// Amounts are exact minor units, so debts are paid down to zero. The
/// tolerance only decides which leftovers are worth an [`Anomaly`]; it
/// never leaves a cent unpaid when both sides balance.
///
/// Every payment settles the debtor, the creditor, or both, so a plan never
/// holds more than `debtors + creditors - 1` transfers. This is not
/// guaranteed to be the minimum possible number of transfers.
#[derive(Debug, Clone, Copy)]
pub struct GreedyMatcher {
    tolerance: Money,
}

impl GreedyMatcher {
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn run(
        &self,
        debtors: &[ClassifiedParticipant],
        creditors: &[ClassifiedParticipant],
    ) -> MatchOutcome {
        let mut open: BinaryHeap<OpenCredit> = creditors
            .iter()
            .filter(|c| c.amount.is_positive())
            .map(|c| OpenCredit {
                remaining: c.amount,
                id: c.id.clone(),
            })
            .collect();

        let mut plan = SettlementPlan::new();
        let mut anomalies = Vec::new();

        for debtor in debtors {
            let mut remaining_debt = debtor.amount;

            while remaining_debt.is_positive() {
                let Some(mut creditor) = open.pop() else {
                    break;
                };

                let payment = remaining_debt.min(creditor.remaining);
                plan.record(&debtor.id, &creditor.id, payment);
                trace!("{} pays {} {}", debtor.id, creditor.id, payment);

                remaining_debt -= payment;
                creditor.remaining -= payment;

                if creditor.remaining.is_positive() {
                    open.push(creditor);
                }
            }

            if remaining_debt > self.tolerance {
                warn!(
                    "debtor {} has {} left over after all creditors were paid",
                    debtor.id, remaining_debt
                );
                anomalies.push(Anomaly::ResidualDebt {
                    debtor: debtor.id.clone(),
                    remaining: remaining_debt,
                });
            }
        }

        let mut unpaid: Vec<OpenCredit> = open
            .into_iter()
            .filter(|c| c.remaining > self.tolerance)
            .collect();
        unpaid.sort_by(|a, b| b.cmp(a));
        for creditor in unpaid {
            warn!(
                "creditor {} is still owed {} after all debtors paid",
                creditor.id, creditor.remaining
            );
            anomalies.push(Anomaly::UnsettledCredit {
                creditor: creditor.id,
                remaining: creditor.remaining,
            });
        }

        MatchOutcome { plan, anomalies }
    }
}

/// Match with the given tolerance and return just the plan.
pub fn match_debts(
    debtors: &[ClassifiedParticipant],
    creditors: &[ClassifiedParticipant],
    tolerance: Money,
) -> SettlementPlan {
    GreedyMatcher::new(tolerance).run(debtors, creditors).plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(id: &str, cents: i64) -> ClassifiedParticipant {
        ClassifiedParticipant::new(id.into(), Money::from_minor(cents))
    }

    fn rendered(plan: &SettlementPlan) -> Vec<(String, String, i64)> {
        plan.transfers()
            .iter()
            .map(|t| (t.from.to_string(), t.to.to_string(), t.amount.minor_units()))
            .collect()
    }

    fn t(from: &str, to: &str, cents: i64) -> (String, String, i64) {
        (from.to_string(), to.to_string(), cents)
    }

    #[test]
    fn test_single_debtor_fans_out() {
        let outcome = GreedyMatcher::new(Money::CENT).run(
            &[party("A", 10_000)],
            &[party("B", 5_000), party("C", 5_000)],
        );
        assert!(outcome.is_clean());
        assert_eq!(
            rendered(&outcome.plan),
            vec![t("A", "B", 5_000), t("A", "C", 5_000)]
        );
    }

    #[test]
    fn test_creditor_reordered_after_partial_payment() {
        // After A pays B 50, C (40) outranks B (10) for D.
        let outcome = GreedyMatcher::new(Money::CENT).run(
            &[party("A", 5_000), party("D", 5_000)],
            &[party("B", 6_000), party("C", 4_000)],
        );
        assert!(outcome.is_clean());
        assert_eq!(
            rendered(&outcome.plan),
            vec![t("A", "B", 5_000), t("D", "C", 4_000), t("D", "B", 1_000)]
        );
    }

    #[test]
    fn test_ties_pay_lowest_id_first() {
        let plan = match_debts(
            &[party("Z", 3_000)],
            &[party("Y", 1_000), party("X", 1_000), party("W", 1_000)],
            Money::CENT,
        );
        assert_eq!(
            rendered(&plan),
            vec![t("Z", "W", 1_000), t("Z", "X", 1_000), t("Z", "Y", 1_000)]
        );
    }

    #[test]
    fn test_residual_debt_is_reported_and_partial_plan_kept() {
        let outcome = GreedyMatcher::new(Money::CENT).run(
            &[party("A", 10_000)],
            &[party("B", 7_500)],
        );
        assert_eq!(rendered(&outcome.plan), vec![t("A", "B", 7_500)]);
        assert_eq!(
            outcome.anomalies,
            vec![Anomaly::ResidualDebt {
                debtor: "A".into(),
                remaining: Money::from_minor(2_500),
            }]
        );
    }

    #[test]
    fn test_unsettled_credit_is_reported() {
        let outcome = GreedyMatcher::new(Money::CENT).run(
            &[party("A", 1_000)],
            &[party("B", 3_000)],
        );
        assert_eq!(
            outcome.anomalies,
            vec![Anomaly::UnsettledCredit {
                creditor: "B".into(),
                remaining: Money::from_minor(2_000),
            }]
        );
    }

    #[test]
    fn test_last_cent_is_paid() {
        // D clears B, then still owes a single cent to C.
        let outcome = GreedyMatcher::new(Money::CENT).run(
            &[party("D", 6), party("A", 4)],
            &[party("B", 5), party("C", 5)],
        );
        assert!(outcome.is_clean());
        assert_eq!(outcome.plan.total(), Money::from_minor(10));
        assert_eq!(
            rendered(&outcome.plan),
            vec![t("D", "B", 5), t("D", "C", 1), t("A", "C", 4)]
        );
    }

    #[test]
    fn test_wide_tolerance_still_pays_to_zero() {
        // Tolerance only filters what gets reported; amounts under it are
        // still paid once matching has started.
        let outcome = GreedyMatcher::new(Money::from_minor(5)).run(
            &[party("A", 1_003), party("D", 4)],
            &[party("B", 1_000), party("C", 3), party("E", 4)],
        );
        assert!(outcome.is_clean());
        assert_eq!(
            rendered(&outcome.plan),
            vec![t("A", "B", 1_000), t("A", "E", 3), t("D", "C", 3), t("D", "E", 1)]
        );
        assert_eq!(outcome.plan.total(), Money::from_minor(1_007));
    }

    #[test]
    fn test_leftovers_within_tolerance_are_not_reported() {
        let outcome = GreedyMatcher::new(Money::from_minor(5)).run(
            &[party("A", 1_004)],
            &[party("B", 1_000)],
        );
        assert_eq!(rendered(&outcome.plan), vec![t("A", "B", 1_000)]);
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_no_creditors() {
        let outcome = GreedyMatcher::new(Money::CENT).run(&[party("A", 500)], &[]);
        assert!(outcome.plan.is_empty());
        assert_eq!(outcome.anomalies.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let outcome = GreedyMatcher::new(Money::CENT).run(&[], &[]);
        assert!(outcome.plan.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_transfer_count_bound() {
        let debtors = [party("A", 700), party("B", 500), party("C", 300)];
        let creditors = [party("D", 600), party("E", 600), party("F", 300)];
        let outcome = GreedyMatcher::new(Money::CENT).run(&debtors, &creditors);
        assert!(outcome.is_clean());
        assert!(outcome.plan.len() <= debtors.len() + creditors.len() - 1);
        assert_eq!(outcome.plan.total(), Money::from_minor(1_500));
    }
}
