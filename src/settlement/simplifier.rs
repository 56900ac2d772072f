use crate::core::balance::{aggregate, NetBalance};
use crate::core::debt::DebtEdge;
use crate::settlement::classifier::{classify, ClassifiedParticipant};
use crate::settlement::config::SimplifierConfig;
use crate::settlement::matcher::GreedyMatcher;
use crate::settlement::plan::{Anomaly, MatchOutcome, SettlementPlan};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every intermediate stage of a simplification, for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplificationTrace {
    pub net_balances: NetBalance,
    pub creditors: Vec<ClassifiedParticipant>,
    pub debtors: Vec<ClassifiedParticipant>,
    pub plan: SettlementPlan,
    pub anomalies: Vec<Anomaly>,
}

/// Collapses a web of pairwise debts into a short list of direct transfers.
///
/// The pipeline is `aggregate -> classify -> match`. Each call is pure:
/// nothing is cached between calls, so one `Simplifier` can be shared
/// freely across threads.
///
/// # Examples
///
/// ```
/// use settle_engine::prelude::*;
///
/// let fifty = Money::from_minor(5_000);
/// let edges = vec![
///     DebtEdge::new("A".into(), "B".into(), Money::from_minor(10_000)),
///     DebtEdge::new("B".into(), "C".into(), fifty),
/// ];
///
/// let plan = Simplifier::default().simplify(&edges);
/// assert_eq!(plan.amount_between(&"A".into(), &"B".into()), Some(fifty));
/// assert_eq!(plan.amount_between(&"A".into(), &"C".into()), Some(fifty));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Simplifier {
    config: SimplifierConfig,
}

impl Simplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    pub fn simplify(&self, edges: &[DebtEdge]) -> SettlementPlan {
        self.simplify_with_diagnostics(edges).plan
    }

    /// Like [`Simplifier::simplify`], also returning any anomalies found.
    pub fn simplify_with_diagnostics(&self, edges: &[DebtEdge]) -> MatchOutcome {
        let trace = self.explain(edges);
        MatchOutcome {
            plan: trace.plan,
            anomalies: trace.anomalies,
        }
    }

    pub fn explain(&self, edges: &[DebtEdge]) -> SimplificationTrace {
        let net_balances = aggregate(edges);
        if !net_balances.is_balanced() {
            warn!(
                "net balances sum to {} instead of zero",
                net_balances.total()
            );
        }

        let classification = classify(&net_balances, self.config.tolerance);
        debug!(
            "{} edges -> {} participants: {} creditors, {} debtors",
            edges.len(),
            net_balances.len(),
            classification.creditors.len(),
            classification.debtors.len()
        );

        let mut anomalies = Vec::new();
        if let Some(imbalance) = classification.imbalance() {
            warn!("{}", imbalance);
            anomalies.push(imbalance);
        }

        let outcome = GreedyMatcher::new(self.config.tolerance)
            .run(&classification.debtors, &classification.creditors);
        debug!(
            "settlement plan has {} transfers totalling {}",
            outcome.plan.len(),
            outcome.plan.total()
        );
        anomalies.extend(outcome.anomalies);

        SimplificationTrace {
            net_balances,
            creditors: classification.creditors,
            debtors: classification.debtors,
            plan: outcome.plan,
            anomalies,
        }
    }
}

/// Simplify with the default one-cent tolerance.
pub fn simplify(edges: &[DebtEdge]) -> SettlementPlan {
    Simplifier::default().simplify(edges)
}

/// Trace a simplification with the default one-cent tolerance.
pub fn explain(edges: &[DebtEdge]) -> SimplificationTrace {
    Simplifier::default().explain(edges)
}

impl fmt::Display for SimplificationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Balance Simplification ===")?;
        writeln!(f, "\nNet Balances:")?;
        for (participant, amount) in self.net_balances.iter() {
            let sign = if amount.is_positive() { "+" } else { "" };
            writeln!(f, "  {}: {}{}", participant, sign, amount)?;
        }

        writeln!(f, "\nDebtors (owe money):")?;
        for d in &self.debtors {
            writeln!(f, "  {}: {}", d.id, d.amount)?;
        }
        writeln!(f, "Creditors (owed money):")?;
        for c in &self.creditors {
            writeln!(f, "  {}: {}", c.id, c.amount)?;
        }

        writeln!(f, "\nSimplified Balances:")?;
        write!(f, "{}", self.plan)?;
        writeln!(f, "Transfers: {}  Total: {}", self.plan.len(), self.plan.total())?;

        if !self.anomalies.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for anomaly in &self.anomalies {
                writeln!(f, "  {}", anomaly)?;
            }
        }
        Ok(())
    }
}
