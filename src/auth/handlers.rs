use actix_web::{HttpResponse, get, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{
        auth::AuthUser,
        jwt::{claims_for, generate_token},
        password::{MIN_PASSWORD_LEN, hash_password, verify_password},
    },
    config::Config,
    error::{AppError, AppResult},
    model::employee::EmployeeProfile,
    models::{ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse},
    repository::EmployeeStore,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Employee login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and employee profile", body = LoginResponse),
        (status = 400, description = "empId or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[instrument(
    name = "auth_login",
    skip(store, config, body),
    fields(emp_id = %body.emp_id)
)]
pub async fn login(
    body: web::Json<LoginRequest>,
    store: web::Data<dyn EmployeeStore>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    info!("Login request received");
    let body = body.into_inner();
    let emp_id = body.emp_id.trim();

    if emp_id.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation("empId and password are required".into()));
    }

    let Some(employee) = store.find_credentials(emp_id).await? else {
        info!("Invalid credentials: employee not found");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
    };

    if let Err(e) = verify_password(&body.password, &employee.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
    }
    debug!(id = employee.id, "Password verified");

    let fcm_token = body
        .fcm_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(token) = &fcm_token {
        // A failed token save does not fail the login.
        if let Err(e) = store.save_device_token(emp_id, token).await {
            error!(error = %e, "Failed to store device token on login");
        }
    }

    let claims = claims_for(&employee, config.jwt_ttl_secs);
    let token = generate_token(&claims, &config.jwt_secret)
        .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: EmployeeProfile::from_credentials(employee, fcm_token),
    }))
}

/// Reset an employee password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Missing fields or password too short"),
        (status = 404, description = "Employee not found")
    )
)]
#[instrument(name = "auth_forgot_password", skip(store, body), fields(emp_id = %body.emp_id))]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    store: web::Data<dyn EmployeeStore>,
) -> AppResult<HttpResponse> {
    let emp_id = body.emp_id.trim();

    if emp_id.is_empty() || body.new_password.is_empty() {
        return Err(AppError::Validation("empId and newPassword are required".into()));
    }
    if body.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if !store.employee_exists(emp_id).await? {
        return Err(AppError::NotFound("Employee not found".into()));
    }

    let hashed = hash_password(&body.new_password)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;
    store.update_password(emp_id, &hashed).await?;

    info!("Password updated");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated successfully")))
}

/// Token probe
#[utoipa::path(
    get,
    path = "/api/protected",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Claims of the presented token"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[get("/protected")]
pub async fn protected(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Access granted",
        "user": user.claims,
    }))
}
