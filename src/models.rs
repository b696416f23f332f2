use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::employee::EmployeeProfile;

/// JWT claims issued on login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Employee row id.
    pub sub: u64,
    pub emp_id: String,
    pub name: String,
    pub designation: Option<String>,
    pub exp: usize,
    pub jti: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(rename = "empId", default)]
    pub emp_id: String,
    #[serde(default)]
    pub password: String,
    /// Device token registered together with the session.
    pub fcm_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: EmployeeProfile,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTokenRequest {
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub fcm_token: String,
}

/// Body of `PUT /leave-requests/{id}/{action}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionBody {
    #[serde(default)]
    pub emp_id: String,
    /// Justification. Required for `not-recommend` and `reject`.
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
