//! Error types for diagram construction and rendering.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building or finishing a diagram.
///
/// Redundant mode toggles and deactivating an inactive lifeline are not
/// errors; they are silently ignored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("end_frame({name}) has no matching begin_frame")]
    UnmatchedFrame { name: String },

    #[error("frames left open at finish: {}", names.join(", "))]
    UnclosedFrames { names: Vec<String> },

    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Parameter {name} expects a {expected} value")]
    ParameterType {
        name: String,
        expected: &'static str,
    },

    #[error("Parameter {name} must be a finite number, got {value}")]
    NonFiniteParameter { name: String, value: f64 },

    #[error("participant {name} was destroyed and can no longer be referenced")]
    DanglingParticipant { name: String },

    #[error("participant handle #{index} does not belong to this diagram")]
    UnknownParticipant { index: usize },

    #[error("no comment named {name} in this diagram")]
    UnknownComment { name: String },

    #[error("participant {name} was already created as \"{label}\"")]
    AlreadyCreated { name: String, label: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    /// True for frame nesting errors (unmatched close or unclosed open).
    pub const fn is_malformed_nesting(&self) -> bool {
        matches!(self, Self::UnmatchedFrame { .. } | Self::UnclosedFrames { .. })
    }
}

/// Failures of the external renderer invocation.
///
/// The [`Document`](crate::Document) that was being rendered is untouched and
/// can be handed to another renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} exited with {status}: {stderr}", program.display())]
    ToolFailed {
        program: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{} produced no output", program.display())]
    EmptyOutput { program: PathBuf },
}
