use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_appender::non_blocking::WorkerGuard;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod notification;
mod repository;
mod routes;
mod service;
mod workflow;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::notification::{FcmGateway, Notifier, PushGateway};
use crate::repository::{EmployeeStore, MySqlStore};
use crate::routes::RateLimiters;
use crate::service::LeaveService;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Desk is running"
}

/// Daily rolling file under `LOG_DIR`. The guard must outlive the server.
fn init_tracing(config: &Config) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&config.log_dir, "leave-desk.log"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .pretty()
        .init();

    guard
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    let _log_guard = init_tracing(&config);

    info!("Server starting...");

    let pool = init_db(&config)
        .await
        .context("failed to connect to database")?;
    let store = Arc::new(MySqlStore::new(pool));

    if !config.push_enabled() {
        warn!("FCM_ENDPOINT or FCM_ACCESS_TOKEN not set; push notifications are disabled");
    }
    let gateway = FcmGateway::from_config(&config)?.map(|g| Arc::new(g) as Arc<dyn PushGateway>);

    let notifier = Notifier::new(store.clone(), gateway);
    let leave_service = Data::new(LeaveService::new(
        store.clone(),
        notifier,
        Duration::from_secs(config.leave_type_cache_ttl_secs),
    ));
    let employees: Data<dyn EmployeeStore> = Data::from(store as Arc<dyn EmployeeStore>);
    let limiters = RateLimiters::from_config(&config)?;

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard so the UI's JS and CSS assets resolve
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(leave_service.clone())
            .app_data(employees.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config_data, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
