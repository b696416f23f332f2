//! Leave approval workflow.
//!
//! - `types` - statuses, actions, approver pair, decision
//! - `error` - workflow errors and their categories
//! - `engine` - transition and authorization rules

pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{decide, parse_action, parse_status};
pub use error::{ErrorKind, WorkflowError};
pub use types::{Approver, ApproverPair, Decision, LeaveAction, LeaveStatus};
