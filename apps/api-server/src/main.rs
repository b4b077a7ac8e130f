//! api-server — HTTP API for managing repository records and their likes.
//!
//! Routes:
//! - `GET    /repositories`          list records in insertion order
//! - `POST   /repositories`          create a record (server-set id, likes = 0)
//! - `PUT    /repositories/:id`      update url/title/techs
//! - `DELETE /repositories/:id`      remove a record
//! - `POST   /repositories/:id/like` increment likes by one
//!
//! Records live in process memory only and are lost on shutdown.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p api-server
//!
//! # JSON logs, start with an empty store
//! LOG_FORMAT=json SEED_REPOSITORIES=false cargo run -p api-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use domain::adapters::memory_repo::InMemoryRepo;
use domain::service::RepositoryService;
use domain::{NewRepository, Repository, RepositoryId, RepositoryPatch, UuidV4Generator};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{ApiError, JsonBody, RepoIdPath};

type Service = RepositoryService<InMemoryRepo, UuidV4Generator>;

#[derive(Clone)]
struct AppState {
    service: Arc<Service>,
}

impl AppState {
    fn new(store: InMemoryRepo) -> Self {
        Self {
            service: Arc::new(RepositoryService::new(store, UuidV4Generator)),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);

    let store = if cfg.seed_repositories {
        let records = domain::seed::demo_repositories();
        info!(count = records.len(), "seeding demo repositories");
        match InMemoryRepo::with_records(records) {
            Ok(store) => store,
            Err(e) => {
                error!(err = %e, "failed to seed repositories");
                std::process::exit(1);
            }
        }
    } else {
        InMemoryRepo::new()
    };

    let app = router(AppState::new(store)).layer(cors_layer());

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, err = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(%addr, "api-server listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(err = %e, "server error");
        std::process::exit(1);
    }
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

fn router(state: AppState) -> Router {
    // Request ID header name
    let x_request_id = axum::http::HeaderName::from_static("x-request-id");

    Router::new()
        .route(
            "/repositories",
            get(list_repositories).post(create_repository),
        )
        .route(
            "/repositories/:id",
            put(update_repository).delete(delete_repository),
        )
        .route("/repositories/:id/like", post(like_repository))
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .with_state(state)
}

// Cross-origin requests are allowed from any origin on every route;
// preflights are answered here.
fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

#[derive(Deserialize, Default)]
struct CreateRepositoryReq {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    techs: Vec<String>,
}

#[derive(Deserialize, Default)]
struct UpdateRepositoryReq {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    techs: Option<Vec<String>>,
}

#[derive(Serialize)]
struct RepositoryOut {
    id: RepositoryId,
    url: String,
    title: String,
    techs: Vec<String>,
    likes: u64,
}

impl From<Repository> for RepositoryOut {
    fn from(repo: Repository) -> Self {
        Self {
            id: repo.id,
            url: repo.url,
            title: repo.title,
            techs: repo.techs,
            likes: repo.likes,
        }
    }
}

async fn list_repositories(
    State(state): State<AppState>,
) -> Result<Json<Vec<RepositoryOut>>, ApiError> {
    let repos = state.service.list()?;
    Ok(Json(repos.into_iter().map(RepositoryOut::from).collect()))
}

async fn create_repository(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateRepositoryReq>,
) -> Result<Json<RepositoryOut>, ApiError> {
    let repo = state.service.create(NewRepository {
        url: body.url,
        title: body.title,
        techs: body.techs,
    })?;
    Ok(Json(repo.into()))
}

async fn update_repository(
    State(state): State<AppState>,
    RepoIdPath(id): RepoIdPath,
    JsonBody(body): JsonBody<UpdateRepositoryReq>,
) -> Result<Json<RepositoryOut>, ApiError> {
    let patch = RepositoryPatch {
        url: body.url,
        title: body.title,
        techs: body.techs,
    };
    let repo = state.service.update(&id, &patch)?;
    Ok(Json(repo.into()))
}

async fn delete_repository(
    State(state): State<AppState>,
    RepoIdPath(id): RepoIdPath,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn like_repository(
    State(state): State<AppState>,
    RepoIdPath(id): RepoIdPath,
) -> Result<Json<RepositoryOut>, ApiError> {
    let repo = state.service.like(&id)?;
    Ok(Json(repo.into()))
}
