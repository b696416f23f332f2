use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::workflow::{LeaveStatus, parse_status};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 42,
    "employee_id": "E1001",
    "employee_name": "Asha Rao",
    "leave_type": "Casual Leave",
    "from_date": "2024-01-05",
    "to_date": "2024-01-10",
    "in_time": null,
    "out_time": null,
    "reason": "Family function",
    "remarks": null,
    "request_type": "leave",
    "status": "Pending",
    "created_at": "2024-01-02T09:30:00Z",
    "updated_at": "2024-01-02T09:30:00Z"
}))]
pub struct LeaveRequest {
    pub id: u64,
    /// applicant emp id
    pub employee_id: String,
    pub employee_name: String,
    pub leave_type: String,
    #[schema(format = "date", value_type = Option<String>)]
    pub from_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub to_date: Option<NaiveDate>,
    #[schema(example = "09:30:00", value_type = Option<String>)]
    pub in_time: Option<NaiveTime>,
    #[schema(example = "13:00:00", value_type = Option<String>)]
    pub out_time: Option<NaiveTime>,
    pub reason: Option<String>,
    /// justification recorded on not-recommend / reject
    pub remarks: Option<String>,
    pub request_type: Option<String>,
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Parsed workflow status. Unknown text is a validation failure.
    pub fn current_status(&self) -> Result<LeaveStatus, AppError> {
        parse_status(&self.status).map_err(AppError::from)
    }
}

/// Body of `POST /leave-request`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewLeaveRequest {
    #[schema(example = "E1001")]
    pub employee_id: String,
    #[schema(example = "Asha Rao")]
    pub employee_name: String,
    #[schema(example = "Casual Leave")]
    pub leave_type: String,
    #[schema(example = "2024-01-05", format = "date", value_type = Option<String>)]
    pub from_date: Option<NaiveDate>,
    #[schema(example = "2024-01-10", format = "date", value_type = Option<String>)]
    pub to_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub out_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub remarks: Option<String>,
    #[schema(example = "leave")]
    pub request_type: Option<String>,
}

impl NewLeaveRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.employee_id.trim().is_empty() {
            return Err(AppError::Validation("employee_id is required".into()));
        }
        if self.employee_name.trim().is_empty() {
            return Err(AppError::Validation("employee_name is required".into()));
        }
        if self.leave_type.trim().is_empty() {
            return Err(AppError::Validation("leave_type is required".into()));
        }
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(AppError::Validation(
                    "from_date cannot be after to_date".into(),
                ));
            }
        }
        Ok(())
    }
}

/// A request as it appears in an approver's inbox.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct IncomingLeave {
    pub leave_id: u64,
    pub applicant_emp_id: String,
    pub applicant_name: String,
    pub leave_type: String,
    #[schema(format = "date", value_type = Option<String>)]
    pub from_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub to_date: Option<NaiveDate>,
    pub status: String,
    pub fla_emp_id: Option<String>,
    pub fla_name: Option<String>,
    pub sla_emp_id: Option<String>,
    pub sla_name: Option<String>,
    #[sqlx(default)]
    pub is_same_approver: bool,
    pub reason: Option<String>,
    pub remarks: Option<String>,
}

impl IncomingLeave {
    pub fn with_same_approver_flag(mut self) -> Self {
        self.is_same_approver = matches!(
            (&self.fla_emp_id, &self.sla_emp_id),
            (Some(f), Some(s)) if f == s
        );
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveCounts {
    #[schema(example = 4)]
    pub approved: i64,
    #[schema(example = 1)]
    pub rejected: i64,
}
