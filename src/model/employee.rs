use serde::Serialize;

use crate::workflow::{Approver, ApproverPair};

/// Login view of `seg_employee_details`, joined to the approver masters
/// for display names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeCredentials {
    pub id: u64,
    pub emp_id: String,
    pub emp_name: String,
    pub designation: Option<String>,
    /// argon2 PHC string
    pub password: String,
    pub role_id: Option<i32>,
    pub fcm_token: Option<String>,
    pub fla: Option<String>,
    pub sla: Option<String>,
}

/// Approver columns resolved for one applicant. Every column is nullable
/// because both joins are LEFT JOINs.
#[derive(Debug, Default, sqlx::FromRow)]
pub struct ApproverRow {
    pub fla_emp_id: Option<String>,
    pub fla_name: Option<String>,
    pub sla_emp_id: Option<String>,
    pub sla_name: Option<String>,
}

impl ApproverRow {
    /// `None` when neither approver is configured.
    pub fn into_pair(self) -> Option<ApproverPair> {
        let side = |emp_id: Option<String>, name: Option<String>| {
            emp_id
                .filter(|id| !id.trim().is_empty())
                .map(|emp_id| Approver { emp_id, name })
        };
        let fla = side(self.fla_emp_id, self.fla_name);
        let sla = side(self.sla_emp_id, self.sla_name);

        if fla.is_none() && sla.is_none() {
            None
        } else {
            Some(ApproverPair::new(fla, sla))
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: u64,
    pub emp_id: String,
    pub name: String,
    pub designation: Option<String>,
    #[serde(rename = "role_id")]
    pub role_id: Option<i32>,
    pub fla: Option<String>,
    pub sla: Option<String>,
    pub fcm_token: Option<String>,
}

impl EmployeeProfile {
    /// Profile returned on login. `fcm_token` wins over the stored token.
    pub fn from_credentials(creds: EmployeeCredentials, fcm_token: Option<String>) -> Self {
        Self {
            id: creds.id,
            emp_id: creds.emp_id,
            name: creds.emp_name,
            designation: creds.designation,
            role_id: creds.role_id,
            fla: creds.fla,
            sla: creds.sla,
            fcm_token: fcm_token.or(creds.fcm_token),
        }
    }
}
