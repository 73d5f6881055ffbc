//! ledger-engine CLI
//!
//! Run settlement, replay, and audit verification from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a batch of requests from a JSON file
//! ledger-engine settle --input batch.json
//!
//! # Output as JSON
//! ledger-engine settle --input batch.json --format json
//!
//! # Reconstruct a snapshot from an event log
//! ledger-engine replay --input events.json
//!
//! # Verify an audit chain
//! ledger-engine verify --input chain.json
//!
//! # Generate a random batch for testing
//! ledger-engine generate --accounts 10 --entries 50
//! ```

use ledger_engine::audit::{verify_chain_integrity, AuditEntry};
use ledger_engine::core::entry::SettlementRequest;
use ledger_engine::core::event::{Event, Snapshot};
use ledger_engine::resilience::replay::event_sourced_reconstruct;
use ledger_engine::scenario::{generate_requests, ScenarioConfig};
use ledger_engine::settlement::fees::{FeeSchedule, FeeTier};
use ledger_engine::settlement::pipeline::{PipelineConfig, SettlementPipeline};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"ledger-engine — ledger clearing and resilience engine

USAGE:
    ledger-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Run the settlement pipeline on a request batch
    replay      Reconstruct a snapshot from snapshots + events
    verify      Check audit-chain integrity
    generate    Generate a random request batch (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON batch file
    --format <FORMAT>   Output format: text (default) or json
    --collateral <N>    Posted collateral (default: 1000000)
    --cap <N>           Leverage cap (default: 10)
    --reserve <N>       Reserve ratio (default: 0.05)

OPTIONS (replay, verify):
    --input <FILE>      Path to JSON events/chain file

OPTIONS (generate):
    --accounts <N>      Number of accounts (default: 10)
    --entries <N>       Number of requests (default: 50)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    ledger-engine settle --input batch.json --format json
    ledger-engine replay --input events.json
    ledger-engine generate --accounts 5 --entries 20 --output batch.json"#
    );
}

#[derive(serde::Deserialize)]
struct BatchFile {
    requests: Vec<SettlementRequest>,
}

#[derive(serde::Deserialize)]
struct EventsFile {
    #[serde(default)]
    snapshots: Vec<Snapshot>,
    events: Vec<Event>,
}

#[derive(serde::Deserialize)]
struct ChainFile {
    entries: Vec<AuditEntry>,
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(content: &str, expected: &str) -> T {
    serde_json::from_str(content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:\n{}", expected);
        process::exit(1);
    })
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    args.get(*i).cloned().unwrap_or_else(|| {
        eprintln!("{flag} requires a value");
        process::exit(1);
    })
}

fn parse_decimal(raw: &str, flag: &str) -> Decimal {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("{flag}: invalid number '{raw}': {e}");
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut collateral = dec!(1_000_000);
    let mut cap = dec!(10);
    let mut reserve = dec!(0.05);

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(take_value(args, &mut i, "--input")),
            "--format" => format = take_value(args, &mut i, "--format"),
            "--collateral" => {
                let raw = take_value(args, &mut i, "--collateral");
                collateral = parse_decimal(&raw, "--collateral");
            }
            "--cap" => {
                let raw = take_value(args, &mut i, "--cap");
                cap = parse_decimal(&raw, "--cap");
            }
            "--reserve" => {
                let raw = take_value(args, &mut i, "--reserve");
                reserve = parse_decimal(&raw, "--reserve");
            }
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let batch: BatchFile = parse_json(
        &read_file(&path),
        r#"{ "requests": [ { "account": "ACC-A", "delta": "100.50" } ] }"#,
    );

    let fee_schedule = FeeSchedule::new(vec![
        FeeTier::new(dec!(10_000), dec!(0.001)),
        FeeTier::new(dec!(1_000_000), dec!(0.0005)),
    ])
    .unwrap_or_else(|e| {
        eprintln!("Invalid fee schedule: {}", e);
        process::exit(1);
    });

    let pipeline = SettlementPipeline::new(PipelineConfig {
        reserve_ratio: reserve,
        leverage_cap: cap,
        collateral,
        fee_schedule,
    });

    let outcome = pipeline.process(&batch.requests);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
    } else {
        println!("{}", outcome);
    }
}

fn cmd_replay(args: &[String]) {
    let mut input_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(take_value(args, &mut i, "--input")),
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let file: EventsFile = parse_json(
        &read_file(&path),
        r#"{ "snapshots": [], "events": [ { "version": 1, "idempotency_key": "k1", "gross_delta": "100", "net_delta": "90" } ] }"#,
    );

    let snapshot = event_sourced_reconstruct(&file.snapshots, &file.events);
    println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
}

fn cmd_verify(args: &[String]) {
    let mut input_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(take_value(args, &mut i, "--input")),
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let file: ChainFile = parse_json(
        &read_file(&path),
        r#"{ "entries": [ { "hash": 123, "prev_hash": 0, "payload": "batch-0", "sequence": 0 } ] }"#,
    );

    if verify_chain_integrity(&file.entries) {
        println!("chain valid ({} entries)", file.entries.len());
    } else {
        println!("CHAIN TAMPERED");
        process::exit(2);
    }
}

fn cmd_generate(args: &[String]) {
    let mut accounts = 10usize;
    let mut entries = 50usize;
    let mut output_path: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" => {
                let raw = take_value(args, &mut i, "--accounts");
                accounts = raw.parse().unwrap_or_else(|_| {
                    eprintln!("--accounts requires a number");
                    process::exit(1);
                });
            }
            "--entries" => {
                let raw = take_value(args, &mut i, "--entries");
                entries = raw.parse().unwrap_or_else(|_| {
                    eprintln!("--entries requires a number");
                    process::exit(1);
                });
            }
            "--output" => output_path = Some(take_value(args, &mut i, "--output")),
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = ScenarioConfig {
        account_count: accounts,
        entry_count: entries,
        ..Default::default()
    };

    #[derive(serde::Serialize)]
    struct OutputFile {
        requests: Vec<SettlementRequest>,
    }

    let output = OutputFile {
        requests: generate_requests(&config),
    };
    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} requests → {}", entries, path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "replay" => cmd_replay(rest),
        "verify" => cmd_verify(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
