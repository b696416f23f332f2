//! Push payload for a newly submitted leave request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::leave_request::LeaveRequest;
use crate::workflow::ApproverPair;

pub const NEW_LEAVE_TITLE: &str = "New Leave Application";
pub const LEAVE_APPLIED: &str = "LEAVE_APPLIED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Every value is text so the payload survives transports that only carry strings.
    pub data: BTreeMap<String, String>,
}

/// Emp ids to notify: FLA then SLA, without blanks or duplicates.
pub fn recipients(approvers: &ApproverPair) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(2);
    for approver in [&approvers.fla, &approvers.sla].into_iter().flatten() {
        let id = approver.emp_id.trim();
        if !id.is_empty() && !out.iter().any(|r| r == id) {
            out.push(id.to_string());
        }
    }
    out
}

pub fn date_range_suffix(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (from, to) {
        (None, None) => String::new(),
        (Some(from), None) => format!(" ({from})"),
        (None, Some(to)) => format!(" (till {to})"),
        (Some(from), Some(to)) => format!(" ({from} → {to})"),
    }
}

pub fn new_leave_message(leave: &LeaveRequest) -> PushMessage {
    let body = format!(
        "{} applied for {}{}",
        leave.employee_name,
        leave.leave_type,
        date_range_suffix(leave.from_date, leave.to_date)
    );

    let data = BTreeMap::from([
        ("type".to_string(), LEAVE_APPLIED.to_string()),
        ("leave_id".to_string(), leave.id.to_string()),
        ("applicant_emp_id".to_string(), leave.employee_id.clone()),
    ]);

    PushMessage {
        title: NEW_LEAVE_TITLE.to_string(),
        body,
        data,
    }
}
