//! settle-engine CLI
//!
//! Simplify a group's debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Collapse the debts in a JSON file into direct transfers
//! settle-engine simplify --input debts.json
//!
//! # Show every stage of the computation
//! settle-engine explain --input debts.json --format json
//!
//! # What one member pays and receives
//! settle-engine summary --input debts.json --participant alice
//!
//! # Generate a random debt network for testing
//! settle-engine generate --participants 10 --debts 30
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use settle_engine::core::debt::{DebtEdge, DebtSet};
use settle_engine::core::expense::{Expense, ExpenseLedger, Share};
use settle_engine::core::money::Money;
use settle_engine::core::participant::ParticipantId;
use settle_engine::settlement::config::SimplifierConfig;
use settle_engine::settlement::plan::{Anomaly, SettlementPlan};
use settle_engine::settlement::simplifier::Simplifier;
use settle_engine::settlement::summary::ParticipantSummary;
use settle_engine::simulation::stress_test::{generate_random_network, DebtNetworkConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settle-engine: shared-expense debt simplification

USAGE:
    settle-engine <COMMAND> [OPTIONS]

COMMANDS:
    simplify    Collapse pairwise debts into a minimal transfer plan
    explain     Show net balances, creditors, debtors and the plan
    summary     Show what a single participant pays and receives
    generate    Generate a random debt network (for testing)
    help        Show this message

OPTIONS (simplify, explain, summary):
    --input <FILE>         Path to JSON debts file
    --format <FORMAT>      Output format: text (default) or json
    --tolerance <AMOUNT>   Balances at or below this are settled (default: 0.01)
    --participant <ID>     Participant to summarise (summary only)

OPTIONS (generate):
    --participants <N>     Number of participants (default: 10)
    --debts <N>            Number of debts (default: 30)
    --seed <N>             Seed for a reproducible network
    --output <FILE>        Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG               Log filter, e.g. RUST_LOG=debug (default: warn)

EXAMPLES:
    settle-engine simplify --input debts.json
    settle-engine explain --input debts.json --format json
    settle-engine summary --input debts.json --participant alice
    settle-engine generate --participants 20 --debts 60 --output test.json"#
    );
}

/// JSON schema for a single input debt.
#[derive(Serialize, Deserialize)]
struct DebtInput {
    from: String,
    to: String,
    amount: String,
}

#[derive(Deserialize)]
struct ShareInput {
    participant: String,
    amount: String,
}

/// JSON schema for an expense; split equally unless explicit shares are given.
#[derive(Deserialize)]
struct ExpenseInput {
    #[serde(default)]
    description: String,
    paid_by: String,
    amount: String,
    #[serde(default)]
    split_among: Vec<String>,
    #[serde(default)]
    shares: Vec<ShareInput>,
}

#[derive(Deserialize)]
struct DebtsFile {
    #[serde(default)]
    debts: Vec<DebtInput>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
}

/// JSON output schema for `simplify`.
#[derive(Serialize)]
struct SimplifyOutput<'a> {
    gross_total: Money,
    settlement_total: Money,
    transfer_count: usize,
    transfers: &'a SettlementPlan,
    anomalies: &'a [Anomaly],
}

struct Options {
    input_path: Option<String>,
    format: String,
    tolerance: Money,
    participant: Option<String>,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn parse_amount(raw: &str) -> Money {
    raw.parse().unwrap_or_else(|e| fail(e))
}

fn parse_options(args: &[String]) -> Options {
    let mut options = Options {
        input_path: None,
        format: "text".to_string(),
        tolerance: SimplifierConfig::default().tolerance,
        participant: None,
    };
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--input" => {
                options.input_path =
                    Some(value.unwrap_or_else(|| fail("--input requires a file path")));
            }
            "--format" => {
                let format = value.unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
                if format != "text" && format != "json" {
                    fail(format!("unknown format '{}'", format));
                }
                options.format = format;
            }
            "--tolerance" => {
                let raw = value.unwrap_or_else(|| fail("--tolerance requires an amount"));
                options.tolerance = parse_amount(&raw);
            }
            "--participant" => {
                options.participant =
                    Some(value.unwrap_or_else(|| fail("--participant requires an id")));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 2;
    }
    options
}

fn load_debts(path: &str) -> DebtSet {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));

    let file: DebtsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "debts": [
    {{ "from": "alice", "to": "bob", "amount": "25.00" }}
  ],
  "expenses": [
    {{ "description": "dinner", "paid_by": "alice", "amount": "90.00",
      "split_among": ["alice", "bob", "charlie"] }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut set = DebtSet::new();
    for debt in file.debts {
        let edge = DebtEdge::try_new(
            ParticipantId::new(&debt.from),
            ParticipantId::new(&debt.to),
            parse_amount(&debt.amount),
        )
        .unwrap_or_else(|e| fail(e));
        set.add(edge);
    }

    if !file.expenses.is_empty() {
        let mut ledger = ExpenseLedger::new();
        for input in file.expenses {
            let payer = ParticipantId::new(&input.paid_by);
            let amount = parse_amount(&input.amount);
            let expense = if input.shares.is_empty() {
                let members: Vec<ParticipantId> =
                    input.split_among.iter().map(ParticipantId::new).collect();
                Expense::split_equally(input.description, payer, amount, &members)
            } else {
                let shares = input
                    .shares
                    .iter()
                    .map(|s| Share::new(ParticipantId::new(&s.participant), parse_amount(&s.amount)))
                    .collect();
                Expense::new(input.description, payer, amount, shares)
            };
            ledger.record(expense.unwrap_or_else(|e| fail(e)));
        }
        debug!(
            "{} expenses totalling {} recorded",
            ledger.expenses().len(),
            ledger.total_spent()
        );
        for edge in ledger.debt_edges().edges() {
            set.add(edge.clone());
        }
    }

    info!("loaded {} debts from {}", set.len(), path);
    set
}

fn require_input(options: &Options) -> DebtSet {
    let path = options
        .input_path
        .as_deref()
        .unwrap_or_else(|| fail("--input <FILE> is required"));
    load_debts(path)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e))
}

fn cmd_simplify(args: &[String]) {
    let options = parse_options(args);
    let set = require_input(&options);
    let simplifier = Simplifier::new(SimplifierConfig::with_tolerance(options.tolerance));
    let outcome = simplifier.simplify_with_diagnostics(set.edges());

    if options.format == "json" {
        let output = SimplifyOutput {
            gross_total: set.gross_total(),
            settlement_total: outcome.plan.total(),
            transfer_count: outcome.plan.len(),
            transfers: &outcome.plan,
            anomalies: &outcome.anomalies,
        };
        println!("{}", to_json(&output));
    } else {
        println!("=== Settlement Plan ===");
        print!("{}", outcome.plan);
        println!("Debts in:    {} ({})", set.len(), set.gross_total());
        println!("Transfers:   {} ({})", outcome.plan.len(), outcome.plan.total());
        for anomaly in &outcome.anomalies {
            println!("Warning:     {}", anomaly);
        }
    }
}

fn cmd_explain(args: &[String]) {
    let options = parse_options(args);
    let set = require_input(&options);
    let simplifier = Simplifier::new(SimplifierConfig::with_tolerance(options.tolerance));
    let trace = simplifier.explain(set.edges());

    if options.format == "json" {
        println!("{}", to_json(&trace));
    } else {
        println!("{}", trace);
    }
}

fn cmd_summary(args: &[String]) {
    let options = parse_options(args);
    let participant = options
        .participant
        .clone()
        .unwrap_or_else(|| fail("--participant <ID> is required"));
    let set = require_input(&options);
    let simplifier = Simplifier::new(SimplifierConfig::with_tolerance(options.tolerance));
    let plan = simplifier.simplify(set.edges());
    let summary = ParticipantSummary::from_plan(&plan, &ParticipantId::new(participant));

    if options.format == "json" {
        println!("{}", to_json(&summary));
    } else {
        print!("{}", summary);
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 10usize;
    let mut debts = 30usize;
    let mut seed: Option<u64> = None;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--participants" => {
                participants = value
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--participants requires a number"));
            }
            "--debts" => {
                debts = value
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--debts requires a number"));
            }
            "--seed" => {
                seed = Some(
                    value
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| fail("--seed requires a number")),
                );
            }
            "--output" => {
                output_path = Some(
                    value
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 2;
    }

    let config = DebtNetworkConfig {
        participant_count: participants,
        debt_count: Some(debts),
        seed,
        ..Default::default()
    };
    let set = generate_random_network(&config);

    #[derive(Serialize)]
    struct OutputFile {
        debts: Vec<DebtInput>,
    }

    let output = OutputFile {
        debts: set
            .edges()
            .iter()
            .map(|e| DebtInput {
                from: e.from().to_string(),
                to: e.to().to_string(),
                amount: e.amount().to_string(),
            })
            .collect(),
    };
    let json = to_json(&output);

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} debts across {} participants → {}",
            set.len(),
            participants,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simplify" => cmd_simplify(rest),
        "explain" => cmd_explain(rest),
        "summary" => cmd_summary(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
