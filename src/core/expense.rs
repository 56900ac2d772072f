use crate::core::debt::{DebtEdge, DebtSet};
use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while recording an expense.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Money),
    #[error("expense must be shared by at least one participant")]
    NoShares,
    #[error("share of {participant} cannot be negative, got {amount}")]
    NegativeShare {
        participant: ParticipantId,
        amount: Money,
    },
    #[error("shares add up to {shares} but the expense amount is {amount}")]
    SharesMismatch { shares: Money, amount: Money },
}

/// The portion of an expense a participant is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant: ParticipantId,
    pub amount: Money,
}

impl Share {
    pub fn new(participant: ParticipantId, amount: Money) -> Self {
        Self {
            participant,
            amount,
        }
    }
}

/// A single paid expense and how it is divided.
///
/// Shares always add up to the expense amount exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    description: String,
    payer: ParticipantId,
    amount: Money,
    shares: Vec<Share>,
    incurred_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        payer: ParticipantId,
        amount: Money,
        shares: Vec<Share>,
    ) -> Result<Self, ExpenseError> {
        if !amount.is_positive() {
            return Err(ExpenseError::NonPositiveAmount(amount));
        }
        if shares.is_empty() {
            return Err(ExpenseError::NoShares);
        }
        if let Some(share) = shares.iter().find(|s| s.amount.is_negative()) {
            return Err(ExpenseError::NegativeShare {
                participant: share.participant.clone(),
                amount: share.amount,
            });
        }
        let total: Money = shares.iter().map(|s| s.amount).sum();
        if total != amount {
            return Err(ExpenseError::SharesMismatch {
                shares: total,
                amount,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            description: description.into(),
            payer,
            amount,
            shares,
            incurred_at: Utc::now(),
        })
    }

    /// Divide `amount` equally between `members`.
    ///
    /// Every member gets the same whole number of cents and the last member
    /// absorbs the remainder, so 100.00 across three members becomes
    /// 33.33, 33.33 and 33.34.
    pub fn split_equally(
        description: impl Into<String>,
        payer: ParticipantId,
        amount: Money,
        members: &[ParticipantId],
    ) -> Result<Self, ExpenseError> {
        if members.is_empty() {
            return Err(ExpenseError::NoShares);
        }
        let count = members.len() as i64;
        let per_member = Money::from_minor(amount.minor_units() / count);
        let mut shares: Vec<Share> = members
            .iter()
            .map(|m| Share::new(m.clone(), per_member))
            .collect();
        let allocated = Money::from_minor(per_member.minor_units() * count);
        if let Some(last) = shares.last_mut() {
            last.amount += amount - allocated;
        }
        Self::new(description, payer, amount, shares)
    }

    /// Override the timestamp, e.g. when replaying stored expenses.
    pub fn with_incurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.incurred_at = at;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn incurred_at(&self) -> DateTime<Utc> {
        self.incurred_at
    }
}

/// All expenses of one group, turned into pairwise debts on demand.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    expenses: Vec<Expense>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Total spent across all expenses.
    pub fn total_spent(&self) -> Money {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// One edge per ordered (ower, payer) pair, summing every share the
    /// ower has in expenses paid by someone else.
    ///
    /// Edges come out in the order each pair was first seen.
    pub fn debt_edges(&self) -> DebtSet {
        let mut order: Vec<(ParticipantId, ParticipantId)> = Vec::new();
        let mut totals: HashMap<(ParticipantId, ParticipantId), Money> = HashMap::new();

        for expense in &self.expenses {
            for share in expense.shares() {
                if &share.participant == expense.payer() || share.amount.is_zero() {
                    continue;
                }
                let key = (share.participant.clone(), expense.payer().clone());
                let total = totals.entry(key.clone()).or_insert_with(|| {
                    order.push(key);
                    Money::ZERO
                });
                *total += share.amount;
            }
        }

        order
            .into_iter()
            .map(|key| {
                let amount = totals[&key];
                let (from, to) = key;
                DebtEdge::new(from, to, amount)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    #[test]
    fn test_equal_split_assigns_remainder_to_last() {
        let expense = Expense::split_equally(
            "dinner",
            "A".into(),
            Money::from_minor(10_000),
            &ids(&["A", "B", "C"]),
        )
        .unwrap();
        let amounts: Vec<i64> = expense
            .shares()
            .iter()
            .map(|s| s.amount.minor_units())
            .collect();
        assert_eq!(amounts, vec![3333, 3333, 3334]);
    }

    #[test]
    fn test_equal_split_without_members() {
        assert_eq!(
            Expense::split_equally("x", "A".into(), Money::CENT, &[]).unwrap_err(),
            ExpenseError::NoShares
        );
    }

    #[test]
    fn test_shares_must_match_amount() {
        let err = Expense::new(
            "taxi",
            "A".into(),
            Money::from_minor(1_000),
            vec![Share::new("B".into(), Money::from_minor(900))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExpenseError::SharesMismatch {
                shares: Money::from_minor(900),
                amount: Money::from_minor(1_000),
            }
        );
    }

    #[test]
    fn test_rejects_negative_share_and_amount() {
        assert!(matches!(
            Expense::new("x", "A".into(), Money::ZERO, vec![]),
            Err(ExpenseError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            Expense::new(
                "x",
                "A".into(),
                Money::from_minor(100),
                vec![
                    Share::new("B".into(), Money::from_minor(200)),
                    Share::new("C".into(), Money::from_minor(-100)),
                ],
            ),
            Err(ExpenseError::NegativeShare { .. })
        ));
    }

    #[test]
    fn test_debt_edges_skip_payer_and_sum_pairs() {
        let mut ledger = ExpenseLedger::new();
        let members = ids(&["alice", "bob", "charlie"]);
        ledger.record(
            Expense::split_equally("dinner", "alice".into(), Money::from_minor(9_000), &members)
                .unwrap(),
        );
        ledger.record(
            Expense::split_equally("snacks", "alice".into(), Money::from_minor(3_000), &members)
                .unwrap(),
        );
        ledger.record(
            Expense::split_equally("gas", "bob".into(), Money::from_minor(6_000), &members)
                .unwrap(),
        );

        let edges = ledger.debt_edges();
        let rendered: Vec<(String, String, i64)> = edges
            .edges()
            .iter()
            .map(|e| {
                (
                    e.from().to_string(),
                    e.to().to_string(),
                    e.amount().minor_units(),
                )
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("bob".to_string(), "alice".to_string(), 4_000),
                ("charlie".to_string(), "alice".to_string(), 4_000),
                ("alice".to_string(), "bob".to_string(), 2_000),
                ("charlie".to_string(), "bob".to_string(), 2_000),
            ]
        );
        assert_eq!(ledger.total_spent(), Money::from_minor(18_000));
    }
}
