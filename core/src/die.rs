//! Weighted dice.
//!
//! A die owns a fixed, ordered set of distinct faces and one mutable,
//! non-negative weight per face. Draws are independent, with replacement,
//! and P(face) = weight(face) / total weight.
//!
//! RULE: Sampling never touches the die's own state. All randomness
//! arrives through the `RandomSource` passed to `sample`.

use crate::{
    error::{DiceError, DiceResult},
    rng::RandomSource,
    types::Face,
};
use serde::Serialize;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A die shared between its owner and any number of games.
/// Weight changes made through one handle are seen by every game.
pub type SharedDie<F> = Rc<RefCell<Die<F>>>;

/// The sampling capability a game needs from each of its dice.
pub trait Sampleable<F> {
    /// Draw `count` outcomes in draw order.
    fn sample(&self, count: usize, rng: &mut dyn RandomSource) -> DiceResult<Vec<F>>;
}

/// Lets a game sample a die the caller still holds and mutates,
/// i.e. `Rc<RefCell<Die<F>>>`.
impl<F, S: Sampleable<F> + ?Sized> Sampleable<F> for RefCell<S> {
    fn sample(&self, count: usize, rng: &mut dyn RandomSource) -> DiceResult<Vec<F>> {
        let die = self
            .try_borrow()
            .map_err(|_| DiceError::invalid_state("die is mutably borrowed while sampling"))?;
        die.sample(count, rng)
    }
}

#[derive(Debug, Clone)]
pub struct Die<F: Face> {
    faces:   Vec<F>,
    weights: Vec<f64>,
    /// face -> position in `faces`
    index:   HashMap<F, usize>,
}

impl<F: Face> Die<F> {
    /// Build a die with every face weighted 1.0.
    /// Faces must be non-empty and mutually distinct.
    pub fn new(faces: Vec<F>) -> DiceResult<Self> {
        if faces.is_empty() {
            return Err(DiceError::invalid_argument("a die needs at least one face"));
        }
        let mut index = HashMap::with_capacity(faces.len());
        for (pos, face) in faces.iter().enumerate() {
            if index.insert(face.clone(), pos).is_some() {
                return Err(DiceError::invalid_argument(format!(
                    "duplicate face {face:?}"
                )));
            }
        }
        Ok(Self {
            weights: vec![DEFAULT_WEIGHT; faces.len()],
            faces,
            index,
        })
    }

    /// Replace one face's weight. Other faces are untouched, and on
    /// error nothing changes.
    pub fn set_weight(&mut self, face: &F, weight: f64) -> DiceResult<()> {
        let pos = *self.index.get(face).ok_or_else(|| DiceError::UnknownFace {
            face: format!("{face:?}"),
        })?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(DiceError::InvalidWeight { weight });
        }
        self.weights[pos] = weight;
        Ok(())
    }

    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    pub fn weight(&self, face: &F) -> Option<f64> {
        self.index.get(face).map(|&pos| self.weights[pos])
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Chance of drawing `face` on a single roll.
    /// `None` for unknown faces or when every weight is zero.
    pub fn probability(&self, face: &F) -> Option<f64> {
        let total = self.total_weight();
        if total <= 0.0 {
            return None;
        }
        self.weight(face).map(|w| w / total)
    }

    /// Owned copy of the current weights, in face order.
    pub fn snapshot(&self) -> WeightTable<F> {
        WeightTable {
            entries: self
                .faces
                .iter()
                .cloned()
                .zip(self.weights.iter().copied())
                .collect(),
        }
    }

    pub fn into_shared(self) -> SharedDie<F> {
        Rc::new(RefCell::new(self))
    }

    /// One draw.
    pub fn roll(&self, rng: &mut dyn RandomSource) -> DiceResult<F> {
        let mut drawn = self.sample(1, rng)?;
        drawn
            .pop()
            .ok_or_else(|| DiceError::invalid_state("sample(1) returned nothing"))
    }
}

impl<F: Face> Sampleable<F> for Die<F> {
    fn sample(&self, count: usize, rng: &mut dyn RandomSource) -> DiceResult<Vec<F>> {
        if count == 0 {
            return Err(DiceError::invalid_argument("sample count must be positive"));
        }

        let mut cumulative = Vec::with_capacity(self.weights.len());
        let mut running = 0.0;
        for &w in &self.weights {
            running += w;
            cumulative.push(running);
        }
        let total = running;
        if total <= 0.0 {
            return Err(DiceError::invalid_state("every face has zero weight"));
        }

        // Float rounding can push a draw onto the final bound; fall back to
        // the last face that can actually come up.
        let last_live = self
            .weights
            .iter()
            .rposition(|&w| w > 0.0)
            .unwrap_or(self.weights.len() - 1);

        let outcomes = (0..count)
            .map(|_| {
                let target = rng.next_f64() * total;
                let pos = cumulative
                    .partition_point(|&bound| bound <= target)
                    .min(last_live);
                self.faces[pos].clone()
            })
            .collect();
        Ok(outcomes)
    }
}

/// A detached copy of a die's face -> weight mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable<F> {
    pub entries: Vec<(F, f64)>,
}

impl<F: Face> WeightTable<F> {
    pub fn weight(&self, face: &F) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| f == face)
            .map(|&(_, w)| w)
    }

    pub fn faces(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|(f, _)| f)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
