//! Games: repeated synchronized rolls of one or more dice.
//!
//! RULES:
//!   - A game holds shared references to its dice, never copies.
//!     Weight changes on a die show up in the next `play`.
//!   - Each die is sampled once per play, in die order, for all rolls.
//!     No die's draws depend on another die's.
//!   - `play` replaces the stored table only after every die has sampled.
//!     A failed play leaves the previous table in place.
//!   - Every table handed out is an owned copy.

use crate::{
    die::{Sampleable, SharedDie},
    error::{DiceError, DiceResult},
    rng::RandomSource,
    types::{DieIndex, Face, RollIndex},
};
use serde::Serialize;
use std::{rc::Rc, str::FromStr};

/// The capability an analyzer needs: hand out the wide-form table of a
/// completed play.
pub trait Resultful<F> {
    fn wide_results(&self) -> DiceResult<WideTable<F>>;
}

/// Which layout `Game::results` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Wide,
    Narrow,
}

impl FromStr for Shape {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide"   => Ok(Self::Wide),
            "narrow" => Ok(Self::Narrow),
            other    => Err(DiceError::invalid_argument(format!(
                "unknown result shape '{other}', expected 'wide' or 'narrow'"
            ))),
        }
    }
}

// ── Wide form ───────────────────────────────────────────────────────────────

/// One row per roll, one column per die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WideTable<F> {
    dice: usize,
    rows: Vec<Vec<F>>,
}

impl<F: Face> WideTable<F> {
    /// Build a table from rows. Needs at least one row, and every row must
    /// have the same, non-zero width.
    pub fn from_rows(rows: Vec<Vec<F>>) -> DiceResult<Self> {
        let dice = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| DiceError::invalid_argument("a result table needs at least one roll"))?;
        if dice == 0 {
            return Err(DiceError::invalid_argument("a result table needs at least one die"));
        }
        if let Some(roll) = rows.iter().position(|row| row.len() != dice) {
            return Err(DiceError::invalid_argument(format!(
                "roll {roll} has {} outcomes, expected {dice}",
                rows[roll].len()
            )));
        }
        Ok(Self { dice, rows })
    }

    pub fn rolls(&self) -> usize {
        self.rows.len()
    }

    pub fn dice(&self) -> usize {
        self.dice
    }

    pub fn cell(&self, roll: RollIndex, die: DieIndex) -> Option<&F> {
        self.rows.get(roll).and_then(|row| row.get(die))
    }

    pub fn row(&self, roll: RollIndex) -> Option<&[F]> {
        self.rows.get(roll).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[F]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Every outcome die `die` produced, in roll order.
    pub fn column(&self, die: DieIndex) -> Option<Vec<&F>> {
        if die >= self.dice {
            return None;
        }
        Some(self.rows.iter().map(|row| &row[die]).collect())
    }

    /// Stack into one row per (roll, die), ascending by roll then die.
    pub fn to_narrow(&self) -> NarrowTable<F> {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .flat_map(|(roll, row)| {
                row.iter().enumerate().map(move |(die, outcome)| NarrowRow {
                    roll,
                    die,
                    outcome: outcome.clone(),
                })
            })
            .collect();
        NarrowTable { dice: self.dice, rows }
    }
}

// ── Narrow form ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrowRow<F> {
    pub roll:    RollIndex,
    pub die:     DieIndex,
    pub outcome: F,
}

/// One row per (roll, die) pair, ordered by roll then die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrowTable<F> {
    dice: usize,
    rows: Vec<NarrowRow<F>>,
}

impl<F: Face> NarrowTable<F> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NarrowRow<F>> {
        self.rows.iter()
    }

    /// The outcome at `(roll, die)`, or `None` past either edge.
    pub fn get(&self, roll: RollIndex, die: DieIndex) -> Option<&F> {
        if die >= self.dice {
            return None;
        }
        roll.checked_mul(self.dice)
            .and_then(|start| start.checked_add(die))
            .and_then(|i| self.rows.get(i))
            .map(|row| &row.outcome)
    }

    /// Unstack back into the wide form. Exact inverse of `to_narrow`.
    pub fn to_wide(&self) -> WideTable<F> {
        let rows = self
            .rows
            .chunks(self.dice)
            .map(|chunk| chunk.iter().map(|r| r.outcome.clone()).collect())
            .collect();
        WideTable { dice: self.dice, rows }
    }
}

/// What `Game::results` hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "table", rename_all = "snake_case")]
pub enum PlayResults<F> {
    Wide(WideTable<F>),
    Narrow(NarrowTable<F>),
}

// ── Game ────────────────────────────────────────────────────────────────────

pub struct Game<F> {
    dice:    Vec<Rc<dyn Sampleable<F>>>,
    results: Option<WideTable<F>>,
}

impl<F: Face> Game<F> {
    /// Build a game over one or more dice. The order given here is the
    /// column order of every result table.
    pub fn new(dice: Vec<Rc<dyn Sampleable<F>>>) -> DiceResult<Self> {
        if dice.is_empty() {
            return Err(DiceError::invalid_argument("a game needs at least one die"));
        }
        Ok(Self { dice, results: None })
    }

    /// Build a game over dice the caller keeps handles to.
    pub fn from_dice(dice: &[SharedDie<F>]) -> DiceResult<Self>
    where
        F: 'static,
    {
        Self::new(
            dice.iter()
                .map(|die| Rc::clone(die) as Rc<dyn Sampleable<F>>)
                .collect(),
        )
    }

    pub fn dice_count(&self) -> usize {
        self.dice.len()
    }

    pub fn is_played(&self) -> bool {
        self.results.is_some()
    }

    /// Roll count of the stored table, if any.
    pub fn rolls(&self) -> Option<usize> {
        self.results.as_ref().map(WideTable::rolls)
    }

    /// Roll every die `rolls` times and store the table, replacing any
    /// earlier one.
    pub fn play(&mut self, rolls: usize, rng: &mut dyn RandomSource) -> DiceResult<()> {
        if rolls == 0 {
            return Err(DiceError::invalid_argument("roll count must be positive"));
        }

        let mut columns = Vec::with_capacity(self.dice.len());
        for (die, sampler) in self.dice.iter().enumerate() {
            let column = sampler.sample(rolls, rng)?;
            if column.len() != rolls {
                return Err(DiceError::invalid_state(format!(
                    "die {die} returned {} outcomes for {rolls} rolls",
                    column.len()
                )));
            }
            columns.push(column);
        }

        let rows = (0..rolls)
            .map(|roll| columns.iter().map(|col| col[roll].clone()).collect())
            .collect();
        self.results = Some(WideTable {
            dice: self.dice.len(),
            rows,
        });

        log::debug!("played {rolls} rolls across {} dice", self.dice.len());
        Ok(())
    }

    /// The last play's outcomes in the requested shape.
    pub fn results(&self, shape: Shape) -> DiceResult<PlayResults<F>> {
        let table = self.results.as_ref().ok_or(DiceError::NotPlayed)?;
        Ok(match shape {
            Shape::Wide   => PlayResults::Wide(table.clone()),
            Shape::Narrow => PlayResults::Narrow(table.to_narrow()),
        })
    }

    pub fn wide(&self) -> DiceResult<WideTable<F>> {
        self.results.clone().ok_or(DiceError::NotPlayed)
    }

    pub fn narrow(&self) -> DiceResult<NarrowTable<F>> {
        self.results
            .as_ref()
            .map(WideTable::to_narrow)
            .ok_or(DiceError::NotPlayed)
    }
}

impl<F: Face> Resultful<F> for Game<F> {
    fn wide_results(&self) -> DiceResult<WideTable<F>> {
        self.wide()
    }
}
