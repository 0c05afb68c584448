//! Weighted dice, repeated games, and frequency statistics for Monte Carlo
//! experiments.

pub mod analyzer;
pub mod config;
pub mod die;
pub mod error;
pub mod experiment;
pub mod game;
pub mod rng;
pub mod types;
