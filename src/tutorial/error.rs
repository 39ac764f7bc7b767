//! Error types for the tutorial core

use std::fmt;

/// External subsystem the tutorial drives through its gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    PlayerControl,
    GameTimer,
    Overlay,
    DemoMove,
    DemoShot,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::PlayerControl => write!(f, "player control"),
            Collaborator::GameTimer => write!(f, "game timer"),
            Collaborator::Overlay => write!(f, "tutorial overlay"),
            Collaborator::DemoMove => write!(f, "demonstration move"),
            Collaborator::DemoShot => write!(f, "demonstration shot"),
        }
    }
}

/// Failure reported by an [`ExternalGates`](super::ExternalGates) implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("{0} is unavailable")]
    Unavailable(Collaborator),
}

#[derive(Debug, thiserror::Error)]
pub enum TutorialError {
    #[error("step {index} has invalid timeout {timeout_secs}s (must be finite and > 0)")]
    InvalidTimeout { index: usize, timeout_secs: f32 },
    #[error("invalid timing value {name} = {value} (must be finite and >= 0)")]
    InvalidTiming { name: &'static str, value: f32 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
