use thiserror::Error;

use crate::gateway::Operation;
use crate::workflow::Stage;

/// Rejected outline edit. The outline is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    #[error("topic title must not be empty")]
    EmptyTitle,
    #[error("topic description must not be empty")]
    EmptyDescription,
    #[error("no topic with id {id}")]
    NotFound { id: String },
}

/// A failed remote call, already mapped to a user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        status: u16,
        message: String,
    },
    /// The request never produced a response (connect, timeout, ...).
    #[error("{message}")]
    Transport {
        operation: Operation,
        message: String,
    },
    /// A success response whose body could not be decoded.
    #[error("{message}")]
    Decode {
        operation: Operation,
        message: String,
    },
}

impl GatewayError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => *operation,
        }
    }

    /// The text shown next to the failed stage.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. }
            | Self::Transport { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }
}

/// An event the controller refused. State is unchanged when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("a request is already in flight ({stage})")]
    Busy { stage: Stage },
    #[error("the outline is empty")]
    EmptyOutline,
    #[error("the outline cannot be edited while {stage}")]
    NotEditable { stage: Stage },
    #[error("nothing to generate from while {stage}")]
    NotReady { stage: Stage },
    #[error(transparent)]
    Outline(#[from] OutlineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
