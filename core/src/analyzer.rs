//! Descriptive statistics over one play of a game.
//!
//! RULE: An analyzer copies the game's wide table once, at construction,
//! and never looks at the game again. Every statistic is a pure function
//! of that snapshot; to analyze a new play, build a new analyzer.
//!
//! Statistics:
//!   - jackpots:     rolls where every die shows the same value
//!   - face counts:  per roll, how many dice showed each observed value
//!   - combinations: order-independent outcome multisets, counted
//!   - permutations: outcome tuples in die order as rolled, counted
//!
//! Every permutation sorts into exactly one combination, so there are
//! never more distinct combinations than distinct permutations.

use crate::{
    error::{DiceError, DiceResult},
    game::{Resultful, WideTable},
    types::{Face, RollIndex},
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct Analyzer<F> {
    snapshot: WideTable<F>,
}

impl<F: Face> Analyzer<F> {
    /// Snapshot the current results of `source`, which must have been played.
    pub fn new(source: &impl Resultful<F>) -> DiceResult<Self> {
        let snapshot = source.wide_results().map_err(|e| match e {
            DiceError::NotPlayed => {
                DiceError::invalid_argument("an analyzer needs a game that has been played")
            }
            other => other,
        })?;
        log::debug!(
            "analyzer snapshot: {} rolls x {} dice",
            snapshot.rolls(),
            snapshot.dice()
        );
        Ok(Self { snapshot })
    }

    /// Analyze a table directly, e.g. one rebuilt from a narrow listing.
    pub fn from_table(snapshot: WideTable<F>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &WideTable<F> {
        &self.snapshot
    }

    pub fn rolls(&self) -> usize {
        self.snapshot.rolls()
    }

    pub fn dice(&self) -> usize {
        self.snapshot.dice()
    }

    pub fn jackpot_count(&self) -> usize {
        self.snapshot
            .rows()
            .filter(|row| row.iter().all(|outcome| outcome == &row[0]))
            .count()
    }

    /// Share of rolls that were jackpots; the Monte Carlo estimate of the
    /// jackpot probability.
    pub fn jackpot_rate(&self) -> f64 {
        self.jackpot_count() as f64 / self.rolls() as f64
    }

    /// Per roll, how many dice showed each value observed anywhere in the
    /// snapshot. Values absent from a roll count 0 there.
    pub fn face_counts_per_roll(&self) -> FaceCounts<F> {
        let faces: Vec<F> = self
            .snapshot
            .rows()
            .flatten()
            .cloned()
            .collect::<BTreeSet<F>>()
            .into_iter()
            .collect();
        let column: HashMap<&F, usize> = faces.iter().enumerate().map(|(i, f)| (f, i)).collect();

        let counts = self
            .snapshot
            .rows()
            .map(|row| {
                let mut tally = vec![0usize; faces.len()];
                for outcome in row {
                    tally[column[outcome]] += 1;
                }
                tally
            })
            .collect();

        FaceCounts { faces, counts }
    }

    /// Distinct sorted outcome multisets and how often each was rolled.
    pub fn combo_count(&self) -> FrequencyTable<F> {
        self.tally_rows(|row| {
            let mut key = row.to_vec();
            key.sort();
            key
        })
    }

    /// Distinct outcome tuples, in die order exactly as rolled, and how
    /// often each came up. Other orderings of a roll's values are not
    /// counted unless they were actually rolled.
    pub fn permutation_count(&self) -> FrequencyTable<F> {
        self.tally_rows(<[F]>::to_vec)
    }

    fn tally_rows(&self, key_of: impl Fn(&[F]) -> Vec<F>) -> FrequencyTable<F> {
        let mut counts = BTreeMap::new();
        for row in self.snapshot.rows() {
            *counts.entry(key_of(row)).or_insert(0) += 1;
        }
        FrequencyTable { counts }
    }
}

/// Roll x observed-value count matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceCounts<F> {
    /// Column labels: every distinct observed value, ascending.
    faces:  Vec<F>,
    /// `counts[roll][col]` lines up with `faces[col]`.
    counts: Vec<Vec<usize>>,
}

impl<F: Face> FaceCounts<F> {
    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    pub fn rolls(&self) -> usize {
        self.counts.len()
    }

    /// Counts for one roll, aligned with `faces()`.
    pub fn row(&self, roll: RollIndex) -> Option<&[usize]> {
        self.counts.get(roll).map(Vec::as_slice)
    }

    /// How many dice showed `face` on `roll`. `None` if the roll is out of
    /// range or `face` never came up in the whole play.
    pub fn count(&self, roll: RollIndex, face: &F) -> Option<usize> {
        let col = self.faces.binary_search(face).ok()?;
        self.counts.get(roll).map(|row| row[col])
    }

    /// Only the values that actually came up on `roll`.
    pub fn nonzero(&self, roll: RollIndex) -> Option<Vec<(&F, usize)>> {
        let row = self.counts.get(roll)?;
        Some(
            self.faces
                .iter()
                .zip(row.iter().copied())
                .filter(|&(_, n)| n > 0)
                .collect(),
        )
    }
}

/// Occurrence counts keyed by outcome tuple. Only tuples that occurred
/// are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<F> {
    counts: BTreeMap<Vec<F>, usize>,
}

impl<F> Default for FrequencyTable<F> {
    fn default() -> Self {
        Self { counts: BTreeMap::new() }
    }
}

impl<F: Face> FrequencyTable<F> {
    pub fn get(&self, key: &[F]) -> Option<usize> {
        self.counts.get(key).copied()
    }

    /// Number of distinct tuples.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the roll count.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Tuples in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[F], usize)> {
        self.counts.iter().map(|(k, &n)| (k.as_slice(), n))
    }

    /// Add every count in `other` to this table, e.g. to pool several plays.
    pub fn merge(&mut self, other: &FrequencyTable<F>) {
        for (key, &n) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += n;
        }
    }

    /// Tuples by descending count, ties broken by key.
    pub fn most_common(&self) -> Vec<(&[F], usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}
