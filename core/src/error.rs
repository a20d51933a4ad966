use crate::event::EventStatus;

/// Errors raised by the kernel and the plant components.
///
/// None of these halt a running simulation: component errors are collected
/// into the tick report and the loop moves on to the next component.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A sibling the component reads from was never attached.
    #[error("{component} is not connected to a {collaborator}")]
    MissingCollaborator {
        component: String,
        collaborator: &'static str,
    },

    /// A command could not be honored in the current plant state.
    #[error("event {code} canceled: {reason}")]
    EventPreconditionUnmet { code: String, reason: String },

    #[error("no {group} bank at index {index}")]
    InvalidBankIndex { group: String, index: usize },

    #[error("rod position {target} is outside 0..={max}")]
    InvalidRodPosition { target: i64, max: u32 },

    /// Event status may only move forward.
    #[error("event cannot move from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    #[error("grid frequency excursion: {frequency:.3} Hz vs {standard:.1} Hz standard")]
    GridFrequencyExcursion { frequency: f64, standard: f64 },

    #[error("invalid turbine parameters: {0}")]
    InvalidTurbineParameters(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
