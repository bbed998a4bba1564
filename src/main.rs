//! Encounter Sim - Entry Point
//!
//! Parses the command line, picks a roster source, runs the trial batch and
//! prints the win-tally report.

use std::path::PathBuf;

use clap::Parser;

use encounter_sim::core::error::Result;
use encounter_sim::encounter::{run_trials, ConsoleSink, NarrativeSink, NullSink, TrialConfig};
use encounter_sim::roster::{DemoRoster, RosterSource, TomlRoster};

/// Run a combat encounter many times and report per-team win counts
#[derive(Parser, Debug)]
#[command(name = "encounter-sim")]
#[command(about = "Monte Carlo combat simulator for tuning d20 encounter difficulty")]
struct Args {
    /// Number of encounters to simulate
    #[arg(long, default_value_t = 100)]
    trials: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Roster file (TOML); omit for the builtin demo encounter
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Narrate every attack to stdout
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Run trials across threads (suppresses narration)
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("encounter_sim=info")
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, trials = args.trials, "starting trial batch");

    let config = TrialConfig {
        trials: args.trials,
        seed,
        parallel: args.parallel,
    };

    let source: Box<dyn RosterSource> = match &args.roster {
        Some(path) => Box::new(TomlRoster::from_path(path)?),
        None => Box::new(DemoRoster),
    };

    let mut console = ConsoleSink;
    let mut null = NullSink;
    let sink: &mut dyn NarrativeSink = if args.verbose && !args.parallel {
        &mut console
    } else {
        &mut null
    };

    let report = run_trials(&config, source.as_ref(), sink)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_text(&report, seed),
        other => {
            eprintln!("Unknown format '{}', defaulting to text", other);
            print_text(&report, seed);
        }
    }

    Ok(())
}

fn print_text(report: &encounter_sim::encounter::TrialReport, seed: u64) {
    println!("{}", report);
    println!();
    println!(
        "({} trials in {} ms, seed {})",
        report.trials, report.elapsed_ms, seed
    );
}
