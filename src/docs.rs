use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

use crate::model::employee::EmployeeProfile;
use crate::model::leave_request::{IncomingLeave, LeaveCounts, LeaveRequest, NewLeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::models::{
    Claims, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    SaveTokenRequest, TransitionBody,
};
use crate::notification::DeliveryReport;
use crate::service::CreatedLeave;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Desk API",
        version = "1.0.0",
        description = r#"
## Leave Management

Employees apply for leave and their approvers act on it in two levels.

### 🔹 Workflow
- The **FLA** (first-level approver) recommends or does not recommend a pending request
- The **SLA** (second-level approver) approves or rejects it afterwards
- When one person holds both roles they approve or reject a pending request directly
- Not recommending and rejecting require a reason

### 🔔 Notifications
Approvers with a registered device token receive a push message when a request is submitted.

### 🔐 Security
Everything except `/auth/*` requires a **JWT Bearer** token from `/auth/login`.

### ⚠️ Errors
Errors answer with `{"error": {"code", "message"}}`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::forgot_password,
        crate::auth::handlers::protected,

        crate::api::leave_type::list_leave_types,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::incoming_leaves,
        crate::api::leave_request::transition_leave,
        crate::api::leave_request::leave_counts,
        crate::api::leave_request::leave_list,

        crate::api::device_token::save_fcm_token
    ),
    components(
        schemas(
            Claims,
            LoginRequest,
            LoginResponse,
            EmployeeProfile,
            ForgotPasswordRequest,
            MessageResponse,
            LeaveType,
            LeaveRequest,
            NewLeaveRequest,
            CreatedLeave,
            DeliveryReport,
            IncomingLeave,
            LeaveCounts,
            TransitionBody,
            SaveTokenRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and password APIs"),
        (name = "Leave", description = "Leave request and approval APIs"),
        (name = "Device", description = "Push device registration APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
