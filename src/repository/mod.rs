//! Datastore seams.
//!
//! Services talk to these traits. `MySqlStore` is the production
//! implementation. Tests use `memory::MemoryStore`.

pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::model::employee::EmployeeCredentials;
use crate::model::leave_request::{IncomingLeave, LeaveCounts, LeaveRequest, NewLeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::workflow::{ApproverPair, Decision, LeaveStatus};

pub use mysql::MySqlStore;

#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Inserts in a single transaction and returns the stored row.
    async fn insert_leave(&self, new: &NewLeaveRequest) -> AppResult<LeaveRequest>;

    async fn find_leave(&self, id: u64) -> AppResult<Option<LeaveRequest>>;

    /// Resolves the FLA and SLA configured for an applicant.
    async fn approvers_for(&self, applicant_emp_id: &str) -> AppResult<Option<ApproverPair>>;

    /// Applies `decision` only if the row still has status `expected`.
    /// Returns false when no row matched.
    async fn apply_transition(
        &self,
        id: u64,
        expected: LeaveStatus,
        decision: &Decision,
    ) -> AppResult<bool>;

    async fn leaves_for_applicant(&self, emp_id: &str) -> AppResult<Vec<LeaveRequest>>;

    async fn incoming_for_approver(&self, approver_emp_id: &str) -> AppResult<Vec<IncomingLeave>>;

    async fn leave_counts(&self, emp_id: &str) -> AppResult<LeaveCounts>;

    async fn all_leaves(&self) -> AppResult<Vec<LeaveRequest>>;

    async fn leave_types(&self) -> AppResult<Vec<LeaveType>>;
}

#[async_trait]
pub trait DeviceTokenStore: Send + Sync {
    /// Distinct, non-empty push tokens registered for the given employees.
    async fn device_tokens_for(&self, emp_ids: &[String]) -> AppResult<Vec<String>>;

    /// Forgets tokens the push provider reported as permanently invalid.
    async fn clear_device_tokens(&self, tokens: &[String]) -> AppResult<u64>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_credentials(&self, emp_id: &str) -> AppResult<Option<EmployeeCredentials>>;

    async fn employee_exists(&self, emp_id: &str) -> AppResult<bool>;

    async fn update_password(&self, emp_id: &str, password_hash: &str) -> AppResult<()>;

    /// Returns the number of employee rows updated.
    async fn save_device_token(&self, emp_id: &str, token: &str) -> AppResult<u64>;
}
