//! Classic simplification scenarios.
//!
//! Shows how chains, opposite debts and cycles collapse into a
//! handful of direct transfers.

use settle_engine::core::debt::DebtEdge;
use settle_engine::core::money::Money;
use settle_engine::settlement::simplifier::explain;

fn edge(from: &str, to: &str, units: i64) -> DebtEdge {
    DebtEdge::new(from.into(), to.into(), Money::from_minor(units * 100))
}

fn scenario(title: &str, edges: &[DebtEdge]) {
    println!("━━━ {} ━━━\n", title);
    println!("Input:");
    for e in edges {
        println!("  {} owes {}: {}", e.from(), e.to(), e.amount());
    }
    println!();
    println!("{}", explain(edges));
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  settle-engine: Chain Collapse Examples  ║");
    println!("╚══════════════════════════════════════════╝\n");

    scenario(
        "Scenario 1: Chain",
        &[edge("A", "B", 100), edge("B", "C", 50)],
    );
    scenario(
        "Scenario 2: Opposite Debts",
        &[edge("A", "B", 100), edge("B", "A", 50)],
    );
    scenario(
        "Scenario 3: Longer Chain",
        &[edge("A", "B", 100), edge("B", "C", 80), edge("C", "D", 50)],
    );
    scenario(
        "Scenario 4: Multiple Creditors",
        &[edge("A", "B", 60), edge("A", "C", 40), edge("D", "A", 50)],
    );
    scenario(
        "Scenario 5: Circular Debts",
        &[edge("A", "B", 100), edge("B", "C", 100), edge("C", "A", 100)],
    );
}
