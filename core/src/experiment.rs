//! Experiment runner: plays a configured game over independent trials
//! and collects the analyzer's statistics.
//!
//! EXECUTION ORDER (fixed):
//!   1. Build every die from the config.
//!   2. For trial t: draw from RNG stream PLAY_STREAM + t, play, analyze.
//!   3. Merge combination/permutation counts across trials.
//!
//! RULES:
//!   - All randomness flows through the RngBank seeded from the config.
//!   - Same config => byte-identical report.

use crate::{
    analyzer::{Analyzer, FrequencyTable},
    config::ExperimentConfig,
    die::SharedDie,
    error::DiceResult,
    game::{Game, WideTable},
    rng::{RngBank, PLAY_STREAM},
    types::FaceValue,
};
use serde::Serialize;

/// How many of the most common outcomes a report keeps.
pub const TOP_OUTCOMES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub trial:                 usize,
    pub jackpots:              usize,
    pub jackpot_rate:          f64,
    pub distinct_combinations: usize,
    pub distinct_permutations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub outcome: Vec<FaceValue>,
    pub count:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub seed:              u64,
    pub rolls:             usize,
    pub dice:              usize,
    /// One label per die, in column order.
    pub dice_labels:       Vec<String>,
    pub trials:            Vec<TrialSummary>,
    pub total_jackpots:    usize,
    /// Jackpots over every roll of every trial.
    pub jackpot_rate:      f64,
    pub top_combinations:  Vec<OutcomeCount>,
    pub top_permutations:  Vec<OutcomeCount>,
}

pub struct Experiment {
    config: ExperimentConfig,
    dice:   Vec<SharedDie<FaceValue>>,
    game:   Game<FaceValue>,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> DiceResult<Self> {
        config.validate()?;
        let dice = config.build_dice()?;
        let game = Game::from_dice(&dice)?;
        Ok(Self { config, dice, game })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Handles to the dice, in column order. Weight changes made here
    /// apply to the next `run`.
    pub fn dice(&self) -> &[SharedDie<FaceValue>] {
        &self.dice
    }

    /// Wide table of the most recent trial.
    pub fn last_table(&self) -> DiceResult<WideTable<FaceValue>> {
        self.game.wide()
    }

    /// Play every trial and summarize.
    pub fn run(&mut self) -> DiceResult<ExperimentReport> {
        let bank = RngBank::new(self.config.seed);
        let mut trials = Vec::with_capacity(self.config.trials);
        let mut combos = FrequencyTable::default();
        let mut perms = FrequencyTable::default();

        for trial in 0..self.config.trials {
            let mut rng = bank.for_stream(PLAY_STREAM + trial as u64);
            self.game.play(self.config.rolls, &mut rng)?;
            let analyzer = Analyzer::new(&self.game)?;

            let combo_table = analyzer.combo_count();
            let perm_table = analyzer.permutation_count();
            combos.merge(&combo_table);
            perms.merge(&perm_table);

            let summary = TrialSummary {
                trial,
                jackpots:              analyzer.jackpot_count(),
                jackpot_rate:          analyzer.jackpot_rate(),
                distinct_combinations: combo_table.len(),
                distinct_permutations: perm_table.len(),
            };
            log::debug!(
                "trial={trial} jackpots={} rate={:.4}",
                summary.jackpots,
                summary.jackpot_rate
            );
            trials.push(summary);
        }

        let total_jackpots: usize = trials.iter().map(|t| t.jackpots).sum();
        let total_rolls = self.config.rolls.saturating_mul(self.config.trials);

        Ok(ExperimentReport {
            seed:             self.config.seed,
            rolls:            self.config.rolls,
            dice:             self.game.dice_count(),
            dice_labels:      self.config.die_labels(),
            trials,
            total_jackpots,
            jackpot_rate:     total_jackpots as f64 / total_rolls as f64,
            top_combinations: top_outcomes(&combos),
            top_permutations: top_outcomes(&perms),
        })
    }
}

/// Highest counts first, ties by outcome.
fn top_outcomes(counts: &FrequencyTable<FaceValue>) -> Vec<OutcomeCount> {
    counts
        .most_common()
        .into_iter()
        .take(TOP_OUTCOMES)
        .map(|(outcome, count)| OutcomeCount {
            outcome: outcome.to_vec(),
            count,
        })
        .collect()
}
