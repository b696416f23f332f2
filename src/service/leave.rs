use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::model::leave_request::{IncomingLeave, LeaveCounts, LeaveRequest, NewLeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::notification::{DeliveryReport, Notifier};
use crate::repository::LeaveStore;
use crate::workflow::{LeaveAction, WorkflowError, decide};

/// Result of submitting a leave request.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedLeave {
    pub leave: LeaveRequest,
    pub notification: DeliveryReport,
}

#[derive(Clone)]
pub struct LeaveService {
    store: Arc<dyn LeaveStore>,
    notifier: Notifier,
    /// Single entry keyed by `()`: the whole master list.
    leave_types: Cache<(), Arc<Vec<LeaveType>>>,
}

impl LeaveService {
    pub fn new(store: Arc<dyn LeaveStore>, notifier: Notifier, leave_type_ttl: Duration) -> Self {
        Self {
            store,
            notifier,
            leave_types: Cache::builder()
                .max_capacity(1)
                .time_to_live(leave_type_ttl)
                .build(),
        }
    }

    /// Persists the request, then notifies its approvers. Notification
    /// problems never fail the call.
    #[instrument(name = "leave_create", skip(self, new), fields(emp_id = %new.employee_id))]
    pub async fn create(&self, new: NewLeaveRequest) -> AppResult<CreatedLeave> {
        new.validate()?;

        let leave = self.store.insert_leave(&new).await?;
        info!(leave_id = leave.id, "Leave request created");

        let approvers = match self.store.approvers_for(&leave.employee_id).await {
            Ok(approvers) => approvers,
            Err(e) => {
                error!(leave_id = leave.id, error = %e, "Approver lookup failed after commit");
                None
            }
        };
        let notification = self.notifier.notify_new_leave(&leave, approvers.as_ref()).await;

        Ok(CreatedLeave {
            leave,
            notification,
        })
    }

    #[instrument(name = "leave_transition", skip(self, justification))]
    pub async fn transition(
        &self,
        id: u64,
        action: LeaveAction,
        actor: &str,
        justification: Option<&str>,
    ) -> AppResult<LeaveRequest> {
        let leave = self.find(id).await?;
        let current = leave.current_status()?;

        let approvers = self
            .store
            .approvers_for(&leave.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No approvers configured for this employee".into()))?;

        let decision = decide(action, actor, current, &approvers, justification)?;

        if !self.store.apply_transition(id, current, &decision).await? {
            warn!(leave_id = id, expected = %current, "Lost a concurrent status update");
            return Err(WorkflowError::StaleStatus { expected: current }.into());
        }

        info!(
            leave_id = id,
            from = %current,
            to = %decision.next_status,
            terminal = decision.next_status.is_terminal(),
            "Leave status updated"
        );

        self.find(id).await
    }

    async fn find(&self, id: u64) -> AppResult<LeaveRequest> {
        self.store
            .find_leave(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Leave request {id} not found")))
    }

    pub async fn history(&self, emp_id: &str) -> AppResult<Vec<LeaveRequest>> {
        self.store.leaves_for_applicant(emp_id).await
    }

    pub async fn incoming(&self, approver_emp_id: &str) -> AppResult<Vec<IncomingLeave>> {
        self.store.incoming_for_approver(approver_emp_id).await
    }

    pub async fn counts(&self, emp_id: &str) -> AppResult<LeaveCounts> {
        self.store.leave_counts(emp_id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<LeaveRequest>> {
        self.store.all_leaves().await
    }

    pub async fn leave_types(&self) -> AppResult<Arc<Vec<LeaveType>>> {
        let store = self.store.clone();
        self.leave_types
            .try_get_with((), async move { store.leave_types().await.map(Arc::new) })
            .await
            .map_err(|e| AppError::Internal(format!("failed to load leave types: {e}")))
    }
}
