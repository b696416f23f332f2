//! Domain types for the leave approval workflow.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Status of a leave request as stored in `leave_request.status`.
///
/// Valid transitions:
/// - Pending → FLA Recommended / FLA Not Recommended (two approvers)
/// - Pending → Approved / Rejected (one person holds both roles)
/// - FLA Recommended / FLA Not Recommended → Approved / Rejected
///
/// Approved and Rejected are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaveStatus {
    #[strum(serialize = "Pending")]
    #[serde(rename = "Pending")]
    Pending,
    #[strum(serialize = "FLA Recommended")]
    #[serde(rename = "FLA Recommended")]
    FlaRecommended,
    #[strum(serialize = "FLA Not Recommended")]
    #[serde(rename = "FLA Not Recommended")]
    FlaNotRecommended,
    #[strum(serialize = "Approved")]
    #[serde(rename = "Approved")]
    Approved,
    #[strum(serialize = "Rejected")]
    #[serde(rename = "Rejected")]
    Rejected,
}

impl LeaveStatus {
    /// Text stored in the datastore.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// True once the first-level approver has acted on a two-approver request.
    pub fn is_processed_by_fla(&self) -> bool {
        matches!(self, Self::FlaRecommended | Self::FlaNotRecommended)
    }
}

/// Action an approver takes on a leave request. Parsed from the URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum LeaveAction {
    Recommend,
    NotRecommend,
    Approve,
    Reject,
}

impl LeaveAction {
    /// NotRecommend and Reject must carry a reason.
    pub fn requires_justification(&self) -> bool {
        matches!(self, Self::NotRecommend | Self::Reject)
    }

    pub fn is_first_level(&self) -> bool {
        matches!(self, Self::Recommend | Self::NotRecommend)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approver {
    pub emp_id: String,
    pub name: Option<String>,
}

/// First- and second-level approvers resolved for one applicant.
/// Either side can be missing when the association is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApproverPair {
    pub fla: Option<Approver>,
    pub sla: Option<Approver>,
}

impl ApproverPair {
    pub fn new(fla: Option<Approver>, sla: Option<Approver>) -> Self {
        Self { fla, sla }
    }

    /// One person holds both roles.
    pub fn is_same_approver(&self) -> bool {
        matches!((&self.fla, &self.sla), (Some(f), Some(s)) if f.emp_id == s.emp_id)
    }

    pub fn is_fla(&self, actor: &str) -> bool {
        self.fla.as_ref().is_some_and(|a| a.emp_id == actor)
    }

    pub fn is_sla(&self, actor: &str) -> bool {
        self.sla.as_ref().is_some_and(|a| a.emp_id == actor)
    }
}

/// Outcome of a permitted transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub next_status: LeaveStatus,
    /// Replaces `remarks` when set.
    pub remarks: Option<String>,
}
