//! Errors raised by the approval workflow.

use thiserror::Error;

use crate::workflow::types::LeaveStatus;

/// Broad category used to pick the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Unknown leave action '{0}'")]
    UnknownAction(String),

    #[error("Unknown leave status '{0}'")]
    UnknownStatus(String),

    #[error("Reason is required to {action}")]
    JustificationRequired { action: String },

    #[error("Employee {actor} is not the FLA for this leave")]
    NotFla { actor: String },

    #[error("Employee {actor} is not the SLA for this leave")]
    NotSla { actor: String },

    #[error("FLA and SLA are the same person. Use approve or reject instead.")]
    SingleApprover,

    #[error("Leave already processed by FLA (status: {status})")]
    AlreadyProcessedByFla { status: LeaveStatus },

    #[error("Leave already processed (status: {status})")]
    AlreadyProcessed { status: LeaveStatus },

    #[error("Leave must be processed by FLA first (status: {status})")]
    AwaitingFla { status: LeaveStatus },

    /// The row changed between the read and the conditional update.
    #[error("Leave status changed concurrently (expected {expected})")]
    StaleStatus { expected: LeaveStatus },
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAction(_) | Self::UnknownStatus(_) | Self::JustificationRequired { .. } => {
                ErrorKind::Validation
            }
            Self::NotFla { .. } | Self::NotSla { .. } => ErrorKind::Authorization,
            Self::SingleApprover
            | Self::AlreadyProcessedByFla { .. }
            | Self::AlreadyProcessed { .. }
            | Self::AwaitingFla { .. }
            | Self::StaleStatus { .. } => ErrorKind::State,
        }
    }
}
