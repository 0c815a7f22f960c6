//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Most variants describe precondition violations: a caller bug or a missing
/// artifact. They are reported once and never retried.
#[derive(Error, Debug, PartialEq)]
pub enum DomusError {
    /// A physical value lies outside the declared range of its dimension.
    #[error("value {value} of dimension {dim} is outside [{min}, {max}]")]
    OutOfRange {
        /// Index of the offending dimension.
        dim: usize,
        /// The offending value.
        value: f32,
        /// Lower bound of the dimension.
        min: f32,
        /// Upper bound of the dimension.
        max: f32,
    },

    /// An action is not contained in the action space of the environment.
    #[error("action {0:?} is not in the action space")]
    InvalidAction(Vec<f32>),

    /// Bounds of a range transform are inconsistent.
    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    /// An episode ended before a single step was taken.
    #[error("episode of scenario {0} has no steps")]
    ZeroLengthEpisode(usize),

    /// The scenario table has no entry for the given id.
    #[error("unknown scenario id {0}")]
    UnknownScenario(usize),

    /// A required file does not exist.
    #[error("required artifact {0} does not exist")]
    MissingArtifact(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
