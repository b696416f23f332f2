//! In-memory store for service and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::model::employee::EmployeeCredentials;
use crate::model::leave_request::{IncomingLeave, LeaveCounts, LeaveRequest, NewLeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::repository::{DeviceTokenStore, EmployeeStore, LeaveStore};
use crate::workflow::{Approver, ApproverPair, Decision, LeaveStatus};

#[derive(Default)]
struct State {
    next_id: u64,
    leaves: Vec<LeaveRequest>,
    approvers: HashMap<String, ApproverPair>,
    employees: HashMap<String, EmployeeCredentials>,
    tokens: HashMap<String, String>,
    leave_types: Vec<LeaveType>,
    leave_type_reads: usize,
    fail_inserts: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_approvers(self, applicant: &str, fla: &str, sla: &str) -> Self {
        let pair = ApproverPair::new(
            Some(Approver {
                emp_id: fla.to_string(),
                name: Some(format!("{fla} name")),
            }),
            Some(Approver {
                emp_id: sla.to_string(),
                name: Some(format!("{sla} name")),
            }),
        );
        self.state
            .lock()
            .unwrap()
            .approvers
            .insert(applicant.to_string(), pair);
        self
    }

    /// Registers a login-capable employee. `password_hash` is stored as given.
    pub fn with_employee(self, emp_id: &str, name: &str, password_hash: &str) -> Self {
        let creds = EmployeeCredentials {
            id: self.state.lock().unwrap().employees.len() as u64 + 1,
            emp_id: emp_id.to_string(),
            emp_name: name.to_string(),
            designation: Some("Engineer".to_string()),
            password: password_hash.to_string(),
            role_id: Some(3),
            fcm_token: None,
            fla: None,
            sla: None,
        };
        self.state
            .lock()
            .unwrap()
            .employees
            .insert(emp_id.to_string(), creds);
        self
    }

    pub fn password_of(&self, emp_id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.employees.get(emp_id).map(|e| e.password.clone())
    }

    pub fn with_token(self, emp_id: &str, token: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(emp_id.to_string(), token.to_string());
        self
    }

    pub fn with_leave_type(self, id: u32, name: &str) -> Self {
        self.state.lock().unwrap().leave_types.push(LeaveType {
            id,
            leave_type: name.to_string(),
        });
        self
    }

    pub fn failing_inserts(self) -> Self {
        self.state.lock().unwrap().fail_inserts = true;
        self
    }

    /// Overwrites a stored status, as a concurrent writer would.
    pub fn force_status(&self, id: u64, status: LeaveStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(leave) = state.leaves.iter_mut().find(|l| l.id == id) {
            leave.status = status.as_str().to_string();
        }
    }

    pub fn leave_count(&self) -> usize {
        self.state.lock().unwrap().leaves.len()
    }

    pub fn token_of(&self, emp_id: &str) -> Option<String> {
        self.state.lock().unwrap().tokens.get(emp_id).cloned()
    }

    pub fn leave_type_reads(&self) -> usize {
        self.state.lock().unwrap().leave_type_reads
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn insert_leave(&self, new: &NewLeaveRequest) -> AppResult<LeaveRequest> {
        let mut state = self.state.lock().unwrap();
        if state.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        state.next_id += 1;
        let now = Utc::now();
        let leave = LeaveRequest {
            id: state.next_id,
            employee_id: new.employee_id.clone(),
            employee_name: new.employee_name.clone(),
            leave_type: new.leave_type.clone(),
            from_date: new.from_date,
            to_date: new.to_date,
            in_time: new.in_time,
            out_time: new.out_time,
            reason: new.reason.clone(),
            remarks: new.remarks.clone(),
            request_type: new.request_type.clone(),
            status: LeaveStatus::Pending.as_str().to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.leaves.push(leave.clone());
        Ok(leave)
    }

    async fn find_leave(&self, id: u64) -> AppResult<Option<LeaveRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state.leaves.iter().find(|l| l.id == id).cloned())
    }

    async fn approvers_for(&self, applicant_emp_id: &str) -> AppResult<Option<ApproverPair>> {
        let state = self.state.lock().unwrap();
        Ok(state.approvers.get(applicant_emp_id).cloned())
    }

    async fn apply_transition(
        &self,
        id: u64,
        expected: LeaveStatus,
        decision: &Decision,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(leave) = state
            .leaves
            .iter_mut()
            .find(|l| l.id == id && l.status.eq_ignore_ascii_case(expected.as_str()))
        else {
            return Ok(false);
        };
        leave.status = decision.next_status.as_str().to_string();
        if let Some(remarks) = &decision.remarks {
            leave.remarks = Some(remarks.clone());
        }
        leave.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn leaves_for_applicant(&self, emp_id: &str) -> AppResult<Vec<LeaveRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .leaves
            .iter()
            .rev()
            .filter(|l| l.employee_id == emp_id)
            .cloned()
            .collect())
    }

    async fn incoming_for_approver(&self, approver_emp_id: &str) -> AppResult<Vec<IncomingLeave>> {
        let state = self.state.lock().unwrap();
        let mut rows = Vec::new();
        for leave in state.leaves.iter().rev() {
            let Some(pair) = state.approvers.get(&leave.employee_id) else {
                continue;
            };
            if !pair.is_fla(approver_emp_id) && !pair.is_sla(approver_emp_id) {
                continue;
            }
            let row = IncomingLeave {
                leave_id: leave.id,
                applicant_emp_id: leave.employee_id.clone(),
                applicant_name: leave.employee_name.clone(),
                leave_type: leave.leave_type.clone(),
                from_date: leave.from_date,
                to_date: leave.to_date,
                status: leave.status.clone(),
                fla_emp_id: pair.fla.as_ref().map(|a| a.emp_id.clone()),
                fla_name: pair.fla.as_ref().and_then(|a| a.name.clone()),
                sla_emp_id: pair.sla.as_ref().map(|a| a.emp_id.clone()),
                sla_name: pair.sla.as_ref().and_then(|a| a.name.clone()),
                is_same_approver: false,
                reason: leave.reason.clone(),
                remarks: leave.remarks.clone(),
            };
            rows.push(row.with_same_approver_flag());
        }
        Ok(rows)
    }

    async fn leave_counts(&self, emp_id: &str) -> AppResult<LeaveCounts> {
        let state = self.state.lock().unwrap();
        let mut counts = LeaveCounts::default();
        for leave in state.leaves.iter().filter(|l| l.employee_id == emp_id) {
            if leave.status == LeaveStatus::Approved.as_str() {
                counts.approved += 1;
            } else if leave.status == LeaveStatus::Rejected.as_str() {
                counts.rejected += 1;
            }
        }
        Ok(counts)
    }

    async fn all_leaves(&self) -> AppResult<Vec<LeaveRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state.leaves.iter().rev().cloned().collect())
    }

    async fn leave_types(&self) -> AppResult<Vec<LeaveType>> {
        let mut state = self.state.lock().unwrap();
        state.leave_type_reads += 1;
        Ok(state.leave_types.clone())
    }
}

#[async_trait]
impl DeviceTokenStore for MemoryStore {
    async fn device_tokens_for(&self, emp_ids: &[String]) -> AppResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        let mut tokens: Vec<String> = Vec::new();
        for emp_id in emp_ids {
            if let Some(token) = state.tokens.get(emp_id) {
                if !tokens.contains(token) {
                    tokens.push(token.clone());
                }
            }
        }
        Ok(tokens)
    }

    async fn clear_device_tokens(&self, tokens: &[String]) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.tokens.len();
        state.tokens.retain(|_, t| !tokens.contains(t));
        Ok((before - state.tokens.len()) as u64)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_credentials(&self, emp_id: &str) -> AppResult<Option<EmployeeCredentials>> {
        let state = self.state.lock().unwrap();
        Ok(state.employees.get(emp_id).cloned().map(|mut creds| {
            creds.fcm_token = state.tokens.get(emp_id).cloned();
            creds
        }))
    }

    async fn employee_exists(&self, emp_id: &str) -> AppResult<bool> {
        Ok(self.state.lock().unwrap().employees.contains_key(emp_id))
    }

    async fn update_password(&self, emp_id: &str, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(creds) = state.employees.get_mut(emp_id) {
            creds.password = password_hash.to_string();
        }
        Ok(())
    }

    async fn save_device_token(&self, emp_id: &str, token: &str) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        if !state.employees.contains_key(emp_id) {
            return Ok(0);
        }
        state.tokens.insert(emp_id.to_string(), token.to_string());
        Ok(1)
    }
}
