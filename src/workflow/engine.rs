//! Transition rules for leave requests.
//!
//! [`decide`] is pure: the same inputs always produce the same decision.
//! Persisting the decision is the caller's job.

use std::str::FromStr;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApproverPair, Decision, LeaveAction, LeaveStatus};

/// Checks whether `actor` may apply `action` to a request in `current`
/// and returns the resulting status.
///
/// Evaluation order:
/// 1. a reason is required for not-recommend and reject
/// 2. recommend/not-recommend: single approver, then FLA identity, then Pending
/// 3. approve/reject: SLA identity, then the status precondition, which is
///    Pending for a single approver and FLA-processed otherwise
pub fn decide(
    action: LeaveAction,
    actor: &str,
    current: LeaveStatus,
    approvers: &ApproverPair,
    justification: Option<&str>,
) -> Result<Decision, WorkflowError> {
    let reason = justification.map(str::trim).filter(|r| !r.is_empty());
    if action.requires_justification() && reason.is_none() {
        return Err(WorkflowError::JustificationRequired {
            action: action.to_string(),
        });
    }

    let same_approver = approvers.is_same_approver();

    if action.is_first_level() {
        if same_approver {
            return Err(WorkflowError::SingleApprover);
        }
        if !approvers.is_fla(actor) {
            return Err(WorkflowError::NotFla {
                actor: actor.to_string(),
            });
        }
        if current != LeaveStatus::Pending {
            return Err(WorkflowError::AlreadyProcessedByFla { status: current });
        }
    } else {
        if !approvers.is_sla(actor) {
            return Err(WorkflowError::NotSla {
                actor: actor.to_string(),
            });
        }
        if same_approver {
            if current != LeaveStatus::Pending {
                return Err(WorkflowError::AlreadyProcessed { status: current });
            }
        } else if !current.is_processed_by_fla() {
            return Err(WorkflowError::AwaitingFla { status: current });
        }
    }

    let next_status = match action {
        LeaveAction::Recommend => LeaveStatus::FlaRecommended,
        LeaveAction::NotRecommend => LeaveStatus::FlaNotRecommended,
        LeaveAction::Approve => LeaveStatus::Approved,
        LeaveAction::Reject => LeaveStatus::Rejected,
    };

    // Remarks carry the untrimmed reason the approver typed.
    let remarks = if action.requires_justification() {
        justification.map(str::to_string)
    } else {
        None
    };

    Ok(Decision {
        next_status,
        remarks,
    })
}

/// Parses the action segment of a transition URL.
pub fn parse_action(raw: &str) -> Result<LeaveAction, WorkflowError> {
    LeaveAction::from_str(raw.trim()).map_err(|_| WorkflowError::UnknownAction(raw.to_string()))
}

/// Parses status text as stored in the datastore.
pub fn parse_status(raw: &str) -> Result<LeaveStatus, WorkflowError> {
    LeaveStatus::from_str(raw.trim()).map_err(|_| WorkflowError::UnknownStatus(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::Approver;

    fn approver(id: &str) -> Option<Approver> {
        Some(Approver {
            emp_id: id.to_string(),
            name: Some(format!("Name {id}")),
        })
    }

    fn two_approvers() -> ApproverPair {
        ApproverPair::new(approver("FLA1"), approver("SLA1"))
    }

    fn single_approver() -> ApproverPair {
        ApproverPair::new(approver("BOSS"), approver("BOSS"))
    }

    #[test]
    fn test_fla_recommends_pending() {
        let d = decide(
            LeaveAction::Recommend,
            "FLA1",
            LeaveStatus::Pending,
            &two_approvers(),
            None,
        )
        .unwrap();
        assert_eq!(d.next_status, LeaveStatus::FlaRecommended);
        assert_eq!(d.remarks, None);
    }

    #[test]
    fn test_fla_not_recommend_keeps_reason() {
        let d = decide(
            LeaveAction::NotRecommend,
            "FLA1",
            LeaveStatus::Pending,
            &two_approvers(),
            Some("project deadline"),
        )
        .unwrap();
        assert_eq!(d.next_status, LeaveStatus::FlaNotRecommended);
        assert_eq!(d.remarks.as_deref(), Some("project deadline"));
    }

    #[test]
    fn test_recommend_by_sla_is_forbidden() {
        let err = decide(
            LeaveAction::Recommend,
            "SLA1",
            LeaveStatus::Pending,
            &two_approvers(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::NotFla {
                actor: "SLA1".into()
            }
        );
    }

    #[test]
    fn test_recommend_twice_is_state_error() {
        let err = decide(
            LeaveAction::Recommend,
            "FLA1",
            LeaveStatus::FlaRecommended,
            &two_approvers(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyProcessedByFla { .. }));
    }

    #[test]
    fn test_recommend_with_single_approver_is_state_error() {
        let err = decide(
            LeaveAction::Recommend,
            "BOSS",
            LeaveStatus::Pending,
            &single_approver(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::SingleApprover);
    }

    #[test]
    fn test_recommend_without_fla_is_forbidden() {
        let pair = ApproverPair::new(None, approver("SLA1"));
        let err = decide(LeaveAction::Recommend, "", LeaveStatus::Pending, &pair, None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFla { .. }));
    }

    #[test]
    fn test_single_approver_approves_pending_once() {
        let pair = single_approver();
        let d = decide(LeaveAction::Approve, "BOSS", LeaveStatus::Pending, &pair, None).unwrap();
        assert_eq!(d.next_status, LeaveStatus::Approved);

        let err = decide(LeaveAction::Approve, "BOSS", d.next_status, &pair, None).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::AlreadyProcessed {
                status: LeaveStatus::Approved
            }
        );
    }

    #[test]
    fn test_sla_cannot_approve_before_fla() {
        let err = decide(
            LeaveAction::Approve,
            "SLA1",
            LeaveStatus::Pending,
            &two_approvers(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::AwaitingFla {
                status: LeaveStatus::Pending
            }
        );
    }

    #[test]
    fn test_sla_rejects_recommended_with_reason() {
        let d = decide(
            LeaveAction::Reject,
            "SLA1",
            LeaveStatus::FlaRecommended,
            &two_approvers(),
            Some("team at minimum staffing"),
        )
        .unwrap();
        assert_eq!(d.next_status, LeaveStatus::Rejected);
        assert_eq!(d.remarks.as_deref(), Some("team at minimum staffing"));
    }

    #[test]
    fn test_sla_may_approve_not_recommended() {
        let d = decide(
            LeaveAction::Approve,
            "SLA1",
            LeaveStatus::FlaNotRecommended,
            &two_approvers(),
            None,
        )
        .unwrap();
        assert_eq!(d.next_status, LeaveStatus::Approved);
    }

    #[test]
    fn test_terminal_status_blocks_sla() {
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            let err = decide(
                LeaveAction::Reject,
                "SLA1",
                status,
                &two_approvers(),
                Some("late"),
            )
            .unwrap_err();
            assert!(matches!(err, WorkflowError::AwaitingFla { .. }));
        }
    }

    #[test]
    fn test_blank_reason_fails_before_identity_checks() {
        let err = decide(
            LeaveAction::Reject,
            "nobody",
            LeaveStatus::Approved,
            &single_approver(),
            Some("   "),
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::JustificationRequired {
                action: "reject".into()
            }
        );

        let err = decide(
            LeaveAction::NotRecommend,
            "BOSS",
            LeaveStatus::Pending,
            &single_approver(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::JustificationRequired { .. }));
    }

    #[test]
    fn test_raw_inputs_are_validated() {
        assert_eq!(
            parse_action("escalate").unwrap_err(),
            WorkflowError::UnknownAction("escalate".into())
        );
        assert_eq!(
            parse_status("On Hold").unwrap_err(),
            WorkflowError::UnknownStatus("On Hold".into())
        );
        assert_eq!(
            parse_status(" fla recommended ").unwrap(),
            LeaveStatus::FlaRecommended
        );
        assert_eq!(parse_action("not-recommend").unwrap(), LeaveAction::NotRecommend);
    }
}
