//! The facade's error type.
//!
//! `Empty` and `GeometryClipped` are deliberately not variants here: spec §7
//! classifies both as informational return signals rather than failures, so
//! they're modeled as `Option::None` and [`crate::MoveOutcome::Clipped`]
//! respectively.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelReelError {
    #[error("invalid reel configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("tablet not found")]
    NotFound,
    #[error("reel has reached its tablet capacity")]
    ResourceExhausted,
    #[error("after/before hints are not adjacent in ring order")]
    AdjacencyViolation,
}
