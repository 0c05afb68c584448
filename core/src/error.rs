use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiceError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Face {face} is not on this die")]
    UnknownFace { face: String },

    #[error("Invalid weight {weight}: must be a finite, non-negative number")]
    InvalidWeight { weight: f64 },

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Game has not been played yet")]
    NotPlayed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DiceError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }

    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState { reason: reason.into() }
    }
}

pub type DiceResult<T> = Result<T, DiceError>;
