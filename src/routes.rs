use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::Context;

use crate::{
    api::{device_token, leave_request, leave_type},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with a burst of the same size.
fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .with_context(|| format!("invalid rate limit of {requests_per_min}/min"))?;

    Ok(Governor::new(&cfg))
}

/// Built once and shared by every worker so limits are global per IP.
#[derive(Clone)]
pub struct RateLimiters {
    login: Arc<Limiter>,
    protected: Arc<Limiter>,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            login: Arc::new(build_limiter(config.rate_login_per_min)?),
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
        })
    }
}

/// Malformed JSON bodies answer with the usual error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid JSON body: {err}")).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid path: {err}")).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid query: {err}")).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &RateLimiters) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(
            web::scope(&config.api_prefix)
                // Public routes
                .service(
                    web::scope("/auth")
                        .wrap(limiters.login.clone())
                        .configure(auth_routes),
                )
                // Protected routes
                .service(
                    web::scope("")
                        .wrap(from_fn(auth_middleware)) // authentication
                        .wrap(limiters.protected.clone()) // rate limiting
                        .configure(protected_routes),
                ),
        );
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(handlers::login)))
        .service(web::resource("/forgot-password").route(web::post().to(handlers::forgot_password)));
}

pub fn protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::protected)
        .service(
            web::resource("/leave-types").route(web::get().to(leave_type::list_leave_types)),
        )
        // /leave-request
        .service(
            web::resource("/leave-request").route(web::post().to(leave_request::create_leave)),
        )
        // /leave-request/{employeeId}
        .service(
            web::resource("/leave-request/{employeeId}")
                .route(web::get().to(leave_request::leave_history)),
        )
        .service(
            web::resource("/incoming-leaves").route(web::get().to(leave_request::incoming_leaves)),
        )
        // /leave-requests
        .service(web::resource("/leave-requests").route(web::get().to(leave_request::leave_list)))
        // /leave-requests/{id}/{action}
        .service(
            web::resource("/leave-requests/{id}/{action}")
                .route(web::put().to(leave_request::transition_leave)),
        )
        .service(
            web::resource("/leave-counts/{empId}").route(web::get().to(leave_request::leave_counts)),
        )
        .service(
            web::resource("/save-fcm-token").route(web::post().to(device_token::save_fcm_token)),
        );
}
