use actix_web::{HttpResponse, web};

use crate::{auth::auth::AuthUser, error::AppResult, service::LeaveService};

/// Leave type master list
#[utoipa::path(
    get,
    path = "/api/leave-types",
    responses(
        (status = 200, description = "Leave types", body = [LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    service: web::Data<LeaveService>,
) -> AppResult<HttpResponse> {
    let types = service.leave_types().await?;
    Ok(HttpResponse::Ok().json(types.as_slice()))
}
