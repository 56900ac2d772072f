//! A weekend trip: record expenses, then settle up.
//!
//! Demonstrates the path from raw expenses to a settlement plan and
//! per-member summaries.

use settle_engine::core::expense::{Expense, ExpenseLedger, Share};
use settle_engine::core::money::Money;
use settle_engine::core::participant::ParticipantId;
use settle_engine::settlement::simplifier::Simplifier;
use settle_engine::settlement::summary::ParticipantSummary;
use rust_decimal_macros::dec;

fn money(value: rust_decimal::Decimal) -> Money {
    Money::from_decimal(value).expect("demo amounts fit")
}

fn main() {
    println!("╔══════════════════════════════════════╗");
    println!("║  settle-engine: Group Trip Example   ║");
    println!("╚══════════════════════════════════════╝\n");

    let alice = ParticipantId::new("alice");
    let bob = ParticipantId::new("bob");
    let charlie = ParticipantId::new("charlie");
    let members = vec![alice.clone(), bob.clone(), charlie.clone()];

    let mut ledger = ExpenseLedger::new();
    ledger.record(
        Expense::split_equally("dinner", alice.clone(), money(dec!(100.00)), &members)
            .expect("valid expense"),
    );
    ledger.record(
        Expense::split_equally("fuel", bob.clone(), money(dec!(60.00)), &members)
            .expect("valid expense"),
    );
    ledger.record(
        Expense::new(
            "museum tickets",
            charlie.clone(),
            money(dec!(45.50)),
            vec![
                Share::new(alice.clone(), money(dec!(20.00))),
                Share::new(bob.clone(), money(dec!(12.75))),
                Share::new(charlie.clone(), money(dec!(12.75))),
            ],
        )
        .expect("valid expense"),
    );

    println!("━━━ Expenses ━━━\n");
    for expense in ledger.expenses() {
        println!(
            "  {:<16} paid by {:<8} {:>8}",
            expense.description(),
            expense.payer(),
            expense.amount()
        );
    }
    println!("  Total spent: {}\n", ledger.total_spent());

    let debts = ledger.debt_edges();
    println!("━━━ Pairwise Debts ━━━\n");
    for e in debts.edges() {
        println!("  {} owes {}: {}", e.from(), e.to(), e.amount());
    }
    println!();

    let trace = Simplifier::default().explain(debts.edges());
    println!("{}", trace);

    println!("━━━ Per-Member Summary ━━━\n");
    for member in &members {
        println!("{}", ParticipantSummary::from_plan(&trace.plan, member));
    }
}
