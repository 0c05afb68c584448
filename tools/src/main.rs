//! dice-runner: headless Monte Carlo runner for weighted dice.
//!
//! Usage:
//!   dice-runner --dice 3 --faces 6 --rolls 100000 --seed 7
//!   dice-runner --config experiment.json --trials 20 --json

use anyhow::Result;
use dicelab_core::{
    config::{ExperimentConfig, DEFAULT_ROLLS, DEFAULT_SEED},
    experiment::{Experiment, ExperimentReport, OutcomeCount},
    types::FaceValue,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::fair(
            parse_arg(&args, "--dice", 2usize),
            parse_arg(&args, "--faces", 6i64),
            DEFAULT_SEED,
            DEFAULT_ROLLS,
        ),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.rolls = parse_arg(&args, "--rolls", config.rolls);
    config.trials = parse_arg(&args, "--trials", config.trials);

    if !json {
        println!("dice-runner");
        println!("  config:  {}", config_path.unwrap_or("(fair dice)"));
        println!("  seed:    {}", config.seed);
        println!("  rolls:   {}", config.rolls);
        println!("  trials:  {}", config.trials);
        println!("  dice:    {}", config.dice_count());
        println!();
    }

    let mut experiment = Experiment::new(config)?;
    let report = experiment.run()?;
    log::info!(
        "finished {} trials: {} jackpots",
        report.trials.len(),
        report.total_jackpots
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ExperimentReport) {
    println!("=== RUN SUMMARY ===");
    println!("  rolls per trial: {}", report.rolls);
    println!("  dice:            {}", report.dice);
    println!("  labels:          {}", report.dice_labels.join(", "));
    println!("  trials:          {}", report.trials.len());
    println!("  jackpots:        {}", report.total_jackpots);
    println!("  jackpot rate:    {:.6}", report.jackpot_rate);

    if report.trials.len() > 1 {
        println!();
        println!("=== PER TRIAL ===");
        for t in &report.trials {
            println!(
                "  #{:<4} jackpots: {:<8} rate: {:.6} | combos: {} | perms: {}",
                t.trial, t.jackpots, t.jackpot_rate, t.distinct_combinations, t.distinct_permutations
            );
        }
    }

    print_outcomes("TOP COMBINATIONS", &report.top_combinations);
    print_outcomes("TOP PERMUTATIONS", &report.top_permutations);
}

fn print_outcomes(title: &str, outcomes: &[OutcomeCount]) {
    println!();
    println!("=== {title} ===");
    if outcomes.is_empty() {
        println!("  (none)");
        return;
    }
    for o in outcomes {
        println!("  {:<24} {}", format_outcome(&o.outcome), o.count);
    }
}

fn format_outcome(outcome: &[FaceValue]) -> String {
    let faces: Vec<String> = outcome.iter().map(FaceValue::to_string).collect();
    format!("({})", faces.join(", "))
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
