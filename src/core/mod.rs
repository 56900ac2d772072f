//! Foundational types: participants, money, debts, net balances and expenses.

pub mod balance;
pub mod debt;
pub mod expense;
pub mod money;
pub mod participant;
