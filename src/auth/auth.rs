use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::Claims;

/// The authenticated employee behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid Authorization header encoding".into()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Authorization header must start with Bearer".into())
        })
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    // Set by `auth_middleware` on protected scopes.
    if let Some(user) = req.extensions().get::<AuthUser>() {
        return Ok(user.clone());
    }

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::Internal("Config missing from app data".into()))?;
    let claims = verify_token(bearer_token(req)?, &config.jwt_secret)?;

    Ok(AuthUser { claims })
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl AuthUser {
    pub fn emp_id(&self) -> &str {
        &self.claims.emp_id
    }

    /// Callers may only act as themselves.
    pub fn ensure_self(&self, emp_id: &str) -> Result<(), AppError> {
        if emp_id.trim() == self.claims.emp_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "empId does not match the authenticated employee".into(),
            ))
        }
    }
}
