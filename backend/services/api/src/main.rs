mod action_plans;
mod error;
mod extractors;
mod measures;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use qualis_common::error::{QualisError, QualisResult};
use qualis_common::types::ServiceInfo;
use qualis_config::{init_tracing, AppConfig};
use qualis_db::action_plans::pg_repository::PgActionPlanRepository;
use qualis_db::action_plans::repositories::ActionPlanStore;
use qualis_db::measures::pg_repository::PgMeasuresRepository;
use qualis_measures::{Messages, MeasuresFetcher};
use tower_http::cors::CorsLayer;

use crate::action_plans::service::ActionPlanService;

const SERVICE_NAME: &str = "qualis-api";

#[derive(Clone)]
pub struct AppState {
    pub action_plans: Arc<dyn ActionPlanStore>,
    pub measures: Arc<dyn MeasuresFetcher>,
    pub messages: Arc<Messages>,
}

impl AppState {
    pub fn action_plan_service(&self) -> ActionPlanService<dyn ActionPlanStore> {
        ActionPlanService::new(self.action_plans.clone())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new(SERVICE_NAME))
}

async fn metrics() -> impl IntoResponse {
    let body = format!(
        "\
# HELP qualis_up Service up indicator\n\
# TYPE qualis_up gauge\n\
qualis_up 1\n\
# HELP qualis_info Service info\n\
# TYPE qualis_info gauge\n\
qualis_info{{service=\"{SERVICE_NAME}\",version=\"{}\"}} 1\n",
        env!("CARGO_PKG_VERSION")
    );

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-user-login"),
        ])
}

fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(measures::router())
        .merge(action_plans::router())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

async fn run() -> QualisResult<()> {
    let config = AppConfig::from_env()?;
    tracing::info!(service = SERVICE_NAME, "starting");

    let pool = qualis_db::create_pool(&config.database_url).await?;
    qualis_db::run_migrations(&pool).await?;

    let state = AppState {
        action_plans: Arc::new(PgActionPlanRepository::new(pool.clone())),
        measures: Arc::new(PgMeasuresRepository::new(pool)),
        messages: Arc::new(Messages::english()),
    };

    let app = build_router(state, &config.cors_origins);
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .map_err(|e| QualisError::Config(format!("invalid bind address: {e}")))?;

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| QualisError::Internal(format!("failed to bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| QualisError::Internal(format!("server error: {e}")))
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "qualis-api stopped");
        std::process::exit(1);
    }
}
