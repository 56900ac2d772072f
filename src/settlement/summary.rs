use crate::core::money::Money;
use crate::core::participant::ParticipantId;
use crate::settlement::plan::SettlementPlan;
use serde::{Deserialize, Serialize};

/// One participant's view of a settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: ParticipantId,
    /// Who this participant has to pay, and how much.
    pub owes: Vec<(ParticipantId, Money)>,
    /// Who has to pay this participant, and how much.
    pub owed: Vec<(ParticipantId, Money)>,
    pub total_owes: Money,
    pub total_owed: Money,
    /// `total_owed - total_owes`.
    pub net: Money,
}

impl ParticipantSummary {
    pub fn from_plan(plan: &SettlementPlan, participant: &ParticipantId) -> Self {
        let mut owes = Vec::new();
        let mut owed = Vec::new();

        for transfer in plan.transfers() {
            if &transfer.from == participant {
                owes.push((transfer.to.clone(), transfer.amount));
            } else if &transfer.to == participant {
                owed.push((transfer.from.clone(), transfer.amount));
            }
        }

        let total_owes: Money = owes.iter().map(|(_, m)| *m).sum();
        let total_owed: Money = owed.iter().map(|(_, m)| *m).sum();

        Self {
            participant: participant.clone(),
            owes,
            owed,
            total_owes,
            total_owed,
            net: total_owed - total_owes,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.owes.is_empty() && self.owed.is_empty()
    }
}

impl std::fmt::Display for ParticipantSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== {} ===", self.participant)?;
        if self.is_settled() {
            return writeln!(f, "All settled up.");
        }
        for (to, amount) in &self.owes {
            writeln!(f, "  pays {} {}", to, amount)?;
        }
        for (from, amount) in &self.owed {
            writeln!(f, "  receives {} from {}", amount, from)?;
        }
        writeln!(f, "Total owes:  {}", self.total_owes)?;
        writeln!(f, "Total owed:  {}", self.total_owed)?;
        writeln!(f, "Net:         {}", self.net)
    }
}
