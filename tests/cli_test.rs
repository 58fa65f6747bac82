//! CLI argument parsing tests.

use clap::Parser;

use vigil::cli::{Cli, Commands};

#[test]
fn run_accepts_comma_separated_suites() {
    let cli = Cli::try_parse_from([
        "vigil",
        "run",
        "--suites",
        "semantic,fairness,security",
        "--parallel",
        "--environment",
        "production",
    ])
    .unwrap();

    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.suites, vec!["semantic", "fairness", "security"]);
            assert!(args.parallel);
            assert_eq!(args.environment, "production");
            assert_eq!(args.window_hours, 24);
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["vigil", "health", "--hours", "48", "--json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Health(args) => assert_eq!(args.hours, 48),
        _ => panic!("expected health command"),
    }
}

#[test]
fn baseline_set_requires_direction() {
    let missing = Cli::try_parse_from([
        "vigil", "baseline", "set", "performance", "avg_response_time_ms", "120.0",
    ]);
    assert!(missing.is_err());

    let ok = Cli::try_parse_from([
        "vigil",
        "baseline",
        "set",
        "performance",
        "avg_response_time_ms",
        "120.0",
        "--direction",
        "lower",
        "--tolerance",
        "0.1",
    ]);
    assert!(ok.is_ok());
}

#[test]
fn schedule_add_parses_anchor_and_frequency() {
    let cli = Cli::try_parse_from([
        "vigil",
        "schedule",
        "add",
        "nightly",
        "--frequency",
        "daily",
        "--at",
        "02:00",
        "--suites",
        "semantic,performance",
    ])
    .unwrap();

    match cli.command {
        Commands::Schedule(command) => {
            let debug = format!("{command:?}");
            assert!(debug.contains("nightly"));
            assert!(debug.contains("daily"));
        }
        _ => panic!("expected schedule command"),
    }
}

#[test]
fn results_filters_parse() {
    let cli = Cli::try_parse_from([
        "vigil", "results", "--suite", "fairness", "--status", "failed", "--limit", "10",
    ])
    .unwrap();

    match cli.command {
        Commands::Results(args) => {
            assert_eq!(args.suite.as_deref(), Some("fairness"));
            assert_eq!(args.status.as_deref(), Some("failed"));
            assert_eq!(args.limit, 10);
        }
        _ => panic!("expected results command"),
    }
}
