use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    models::{MessageResponse, SaveTokenRequest},
    repository::EmployeeStore,
};

/// Register the caller's push device token
#[utoipa::path(
    post,
    path = "/api/save-fcm-token",
    request_body = SaveTokenRequest,
    responses(
        (status = 200, description = "Token stored", body = MessageResponse),
        (status = 400, description = "empId or fcmToken missing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "empId is not the caller"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Device"
)]
#[instrument(name = "api_save_fcm_token", skip_all, fields(emp_id = %auth.emp_id()))]
pub async fn save_fcm_token(
    auth: AuthUser,
    store: web::Data<dyn EmployeeStore>,
    payload: web::Json<SaveTokenRequest>,
) -> AppResult<HttpResponse> {
    let emp_id = payload.emp_id.trim();
    let token = payload.fcm_token.trim();

    if emp_id.is_empty() || token.is_empty() {
        return Err(AppError::Validation("empId and fcmToken are required".into()));
    }
    auth.ensure_self(emp_id)?;

    if store.save_device_token(emp_id, token).await? == 0 {
        return Err(AppError::NotFound("Employee not found".into()));
    }
    info!("Device token saved");

    Ok(HttpResponse::Ok().json(MessageResponse::new("FCM token saved successfully")))
}
