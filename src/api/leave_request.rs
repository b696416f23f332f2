use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::IntoParams;

use crate::{
    auth::auth::AuthUser,
    error::AppResult,
    model::leave_request::NewLeaveRequest,
    models::TransitionBody,
    service::LeaveService,
    workflow::parse_action,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct IncomingQuery {
    /// Approver emp id. Ignored when it differs from the token.
    #[serde(rename = "empId")]
    pub emp_id: Option<String>,
}

/* =========================
Create leave request
========================= */
/// Submit a leave request and notify the applicant's approvers
#[utoipa::path(
    post,
    path = "/api/leave-request",
    request_body(
        content = NewLeaveRequest,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request stored", body = CreatedLeave),
        (status = 400, description = "Missing fields or reversed range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "employee_id is not the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
#[instrument(name = "api_create_leave", skip_all, fields(emp_id = %auth.emp_id()))]
pub async fn create_leave(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    payload: web::Json<NewLeaveRequest>,
) -> AppResult<HttpResponse> {
    auth.ensure_self(&payload.employee_id)?;

    let created = service.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Leave history of one applicant, newest first
#[utoipa::path(
    get,
    path = "/api/leave-request/{employeeId}",
    params(("employeeId" = String, Path, description = "Applicant emp id")),
    responses(
        (status = 200, description = "Leave requests", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_history(
    _auth: AuthUser,
    service: web::Data<LeaveService>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let leaves = service.history(path.trim()).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/// Requests awaiting the caller as FLA or SLA
#[utoipa::path(
    get,
    path = "/api/incoming-leaves",
    params(IncomingQuery),
    responses(
        (status = 200, description = "Approver inbox", body = [IncomingLeave]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn incoming_leaves(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    query: web::Query<IncomingQuery>,
) -> AppResult<HttpResponse> {
    if let Some(requested) = query.emp_id.as_deref().filter(|id| *id != auth.emp_id()) {
        debug!(requested, caller = auth.emp_id(), "Using token emp id for inbox");
    }

    let leaves = service.incoming(auth.emp_id()).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Recommend / approve / reject
========================= */
/// Move a request through the FLA/SLA workflow
#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}/{action}",
    params(
        ("id" = u64, Path, description = "Leave request id"),
        ("action" = String, Path, description = "recommend | not-recommend | approve | reject")
    ),
    request_body = TransitionBody,
    responses(
        (status = 200, description = "Updated leave request", body = LeaveRequest),
        (status = 400, description = "Unknown action or missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the required approver"),
        (status = 404, description = "Leave request or approvers not found"),
        (status = 409, description = "Action not valid for the current status")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
#[instrument(name = "api_transition", skip_all, fields(emp_id = %auth.emp_id()))]
pub async fn transition_leave(
    auth: AuthUser,
    service: web::Data<LeaveService>,
    path: web::Path<(u64, String)>,
    payload: web::Json<TransitionBody>,
) -> AppResult<HttpResponse> {
    let (leave_id, raw_action) = path.into_inner();

    // A blank empId means the caller.
    if !payload.emp_id.trim().is_empty() {
        auth.ensure_self(&payload.emp_id)?;
    }
    let action = parse_action(&raw_action)?;

    let leave = service
        .transition(leave_id, action, auth.emp_id(), payload.reason.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(leave))
}

/// Approved and rejected tallies for one applicant
#[utoipa::path(
    get,
    path = "/api/leave-counts/{empId}",
    params(("empId" = String, Path, description = "Applicant emp id")),
    responses(
        (status = 200, description = "Tallies", body = LeaveCounts),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_counts(
    _auth: AuthUser,
    service: web::Data<LeaveService>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let counts = service.counts(path.trim()).await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// Every leave request, newest first
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    responses(
        (status = 200, description = "All leave requests", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    _auth: AuthUser,
    service: web::Data<LeaveService>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list_all().await?))
}
