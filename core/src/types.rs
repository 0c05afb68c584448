//! Shared primitive types used across the entire crate.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// A roll index. Rolls are numbered from 0 and are contiguous.
pub type RollIndex = usize;

/// A die's position inside a game. Matches the order the dice were given in.
pub type DieIndex = usize;

/// Anything that can label a face.
///
/// `Ord` is needed so combinations can be sorted and face-count columns
/// have a stable order; `Hash` so faces can key lookups.
pub trait Face: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Face for T {}

/// The face type used by experiment files: a number or a label.
///
/// Numbers sort before text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaceValue {
    Int(i64),
    Text(String),
}

impl Display for FaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n)  => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FaceValue {
    fn from(n: i64) -> Self { Self::Int(n) }
}

impl From<&str> for FaceValue {
    fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for FaceValue {
    fn from(s: String) -> Self { Self::Text(s) }
}
