//! Experiment files: which dice to roll, how they are weighted, and how
//! many rolls and trials to run.
//!
//! ```json
//! {
//!   "seed": 7,
//!   "rolls": 10000,
//!   "dice": [
//!     { "faces": [1, 2, 3, 4, 5, 6], "copies": 2 },
//!     { "label": "loaded", "faces": [1, 2, 3, 4, 5, 6],
//!       "weights": [{ "face": 6, "weight": 5.0 }] }
//!   ]
//! }
//! ```

use crate::{
    die::{Die, SharedDie},
    error::{DiceError, DiceResult},
    types::FaceValue,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ROLLS: usize = 1000;

fn default_seed() -> u64 { DEFAULT_SEED }
fn default_rolls() -> usize { DEFAULT_ROLLS }
fn one() -> usize { 1 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightOverride {
    pub face:   FaceValue,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieConfig {
    /// Shown in reports; unlabeled dice are named by column.
    #[serde(default)]
    pub label:   Option<String>,
    pub faces:   Vec<FaceValue>,
    /// Faces not listed keep the default weight of 1.0.
    #[serde(default)]
    pub weights: Vec<WeightOverride>,
    /// How many identical, independent dice this entry stands for.
    #[serde(default = "one")]
    pub copies:  usize,
}

impl DieConfig {
    /// Build one die from this entry. `copies` is ignored here.
    pub fn build(&self) -> DiceResult<Die<FaceValue>> {
        let mut die = Die::new(self.faces.clone())?;
        for w in &self.weights {
            die.set_weight(&w.face, w.weight)?;
        }
        Ok(die)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default = "default_seed")]
    pub seed:   u64,
    #[serde(default = "default_rolls")]
    pub rolls:  usize,
    /// Independent repeats of the whole play, each on its own RNG stream.
    #[serde(default = "one")]
    pub trials: usize,
    pub dice:   Vec<DieConfig>,
}

impl ExperimentConfig {
    /// Load an experiment file.
    /// In tests, use ExperimentConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        log::info!(
            "loaded experiment {path}: {} dice, {} rolls, {} trials, seed {}",
            config.dice_count(),
            config.rolls,
            config.trials,
            config.seed
        );
        Ok(config)
    }

    pub fn from_json(json: &str) -> DiceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// `count` fair dice with faces `1..=sides`.
    pub fn fair(count: usize, sides: i64, seed: u64, rolls: usize) -> Self {
        Self {
            seed,
            rolls,
            trials: 1,
            dice: vec![DieConfig {
                label:   None,
                faces:   (1..=sides).map(FaceValue::Int).collect(),
                weights: Vec::new(),
                copies:  count,
            }],
        }
    }

    /// Two fair six-sided dice, 100 rolls, fixed seed.
    pub fn default_test() -> Self {
        Self::fair(2, 6, DEFAULT_SEED, 100)
    }

    pub fn validate(&self) -> DiceResult<()> {
        if self.rolls == 0 {
            return Err(DiceError::invalid_argument("rolls must be positive"));
        }
        if self.trials == 0 {
            return Err(DiceError::invalid_argument("trials must be positive"));
        }
        if self.dice_count() == 0 {
            return Err(DiceError::invalid_argument("an experiment needs at least one die"));
        }
        if self.rolls.checked_mul(self.trials).is_none() {
            return Err(DiceError::invalid_argument(format!(
                "{} rolls x {} trials overflows the total roll count",
                self.rolls, self.trials
            )));
        }
        Ok(())
    }

    /// Total dice once `copies` are expanded.
    pub fn dice_count(&self) -> usize {
        self.dice.iter().map(|d| d.copies).sum()
    }

    /// One label per die once `copies` are expanded. Copies share their
    /// entry's label; unlabeled dice get `die <column>`.
    pub fn die_labels(&self) -> Vec<String> {
        self.dice
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.label.as_deref()).take(entry.copies))
            .enumerate()
            .map(|(column, label)| match label {
                Some(label) => label.to_string(),
                None        => format!("die {column}"),
            })
            .collect()
    }

    /// Build every die, expanding `copies`, in file order.
    pub fn build_dice(&self) -> DiceResult<Vec<SharedDie<FaceValue>>> {
        let mut dice = Vec::with_capacity(self.dice_count());
        for entry in &self.dice {
            let die = entry.build()?;
            for _ in 0..entry.copies {
                dice.push(die.clone().into_shared());
            }
        }
        Ok(dice)
    }
}
