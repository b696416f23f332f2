//! Property-based tests for the approval rules.

use proptest::prelude::*;
use strum::IntoEnumIterator;

use crate::workflow::engine::decide;
use crate::workflow::error::{ErrorKind, WorkflowError};
use crate::workflow::types::{Approver, ApproverPair, LeaveAction, LeaveStatus};

fn arb_status() -> impl Strategy<Value = LeaveStatus> {
    proptest::sample::select(LeaveStatus::iter().collect::<Vec<_>>())
}

fn arb_action() -> impl Strategy<Value = LeaveAction> {
    proptest::sample::select(LeaveAction::iter().collect::<Vec<_>>())
}

fn arb_emp_id() -> impl Strategy<Value = String> {
    "E[0-9]{1,4}"
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,40}"
}

fn pair(fla: &str, sla: &str) -> ApproverPair {
    ApproverPair::new(
        Some(Approver {
            emp_id: fla.to_string(),
            name: None,
        }),
        Some(Approver {
            emp_id: sla.to_string(),
            name: None,
        }),
    )
}

/// Strategy for pairs where FLA and SLA are different people.
fn arb_distinct_pair() -> impl Strategy<Value = (String, String)> {
    (arb_emp_id(), arb_emp_id()).prop_filter("distinct approvers", |(f, s)| f != s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Distinct approvers: FLA actions succeed only for the FLA on Pending.
    #[test]
    fn prop_first_level_needs_fla_and_pending(
        (fla, sla) in arb_distinct_pair(),
        actor in arb_emp_id(),
        status in arb_status(),
        not_recommend in any::<bool>(),
        reason in arb_reason(),
    ) {
        let action = if not_recommend { LeaveAction::NotRecommend } else { LeaveAction::Recommend };
        let result = decide(action, &actor, status, &pair(&fla, &sla), Some(&reason));

        match result {
            Ok(d) => {
                prop_assert_eq!(&actor, &fla);
                prop_assert_eq!(status, LeaveStatus::Pending);
                let expected = if not_recommend {
                    LeaveStatus::FlaNotRecommended
                } else {
                    LeaveStatus::FlaRecommended
                };
                prop_assert_eq!(d.next_status, expected);
            }
            Err(e) if actor != fla => prop_assert_eq!(e.kind(), ErrorKind::Authorization),
            Err(e) => {
                prop_assert_ne!(status, LeaveStatus::Pending);
                prop_assert_eq!(e.kind(), ErrorKind::State);
            }
        }
    }

    /// One person in both roles: FLA actions never apply.
    #[test]
    fn prop_single_approver_rejects_first_level(
        boss in arb_emp_id(),
        actor in arb_emp_id(),
        status in arb_status(),
        not_recommend in any::<bool>(),
        reason in arb_reason(),
    ) {
        let action = if not_recommend { LeaveAction::NotRecommend } else { LeaveAction::Recommend };
        let err = decide(action, &actor, status, &pair(&boss, &boss), Some(&reason)).unwrap_err();
        prop_assert_eq!(err, WorkflowError::SingleApprover);
    }

    /// Approve/reject by anyone but the SLA is an authorization failure.
    #[test]
    fn prop_second_level_needs_sla(
        fla in arb_emp_id(),
        sla in arb_emp_id(),
        actor in arb_emp_id(),
        status in arb_status(),
        reject in any::<bool>(),
        reason in arb_reason(),
    ) {
        prop_assume!(actor != sla);
        let action = if reject { LeaveAction::Reject } else { LeaveAction::Approve };
        let err = decide(action, &actor, status, &pair(&fla, &sla), Some(&reason)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    /// A blank reason fails validation whatever else is wrong.
    #[test]
    fn prop_blank_reason_is_validation_error(
        fla in arb_emp_id(),
        sla in arb_emp_id(),
        actor in arb_emp_id(),
        status in arb_status(),
        reject in any::<bool>(),
        blank in prop_oneof![Just(None), "[ \t]{0,5}".prop_map(Some)],
    ) {
        let action = if reject { LeaveAction::Reject } else { LeaveAction::NotRecommend };
        let err = decide(action, &actor, status, &pair(&fla, &sla), blank.as_deref()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
    }

    /// Nothing leaves a terminal status.
    #[test]
    fn prop_terminal_states_are_final(
        fla in arb_emp_id(),
        sla in arb_emp_id(),
        actor in arb_emp_id(),
        action in arb_action(),
        approved in any::<bool>(),
        reason in arb_reason(),
    ) {
        let status = if approved { LeaveStatus::Approved } else { LeaveStatus::Rejected };
        prop_assert!(decide(action, &actor, status, &pair(&fla, &sla), Some(&reason)).is_err());
    }

    /// Same inputs, same answer.
    #[test]
    fn prop_decide_is_deterministic(
        fla in arb_emp_id(),
        sla in arb_emp_id(),
        actor in arb_emp_id(),
        status in arb_status(),
        action in arb_action(),
        reason in proptest::option::of(arb_reason()),
    ) {
        let approvers = pair(&fla, &sla);
        let first = decide(action, &actor, status, &approvers, reason.as_deref());
        let second = decide(action, &actor, status, &approvers, reason.as_deref());
        prop_assert_eq!(first, second);
    }
}
