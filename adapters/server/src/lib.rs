#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! HTTP adapter exposing breeding and level generation as JSON endpoints.
//!
//! Every content endpoint authenticates the caller through a
//! [`SessionVerifier`] before the body is decoded, seeds a fresh
//! [`ChaCha8Rng`] for the request and echoes the seed so the result can be
//! replayed.

pub mod auth;
pub mod catalog;
pub mod config;
mod error;
mod wire;

use std::{future::Future, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use grow_defence_core::{Catalogs, ContentError, Organism, WELCOME_BANNER};
use grow_defence_system_breeding::{BreedingConfig, BreedingEngine};
use grow_defence_system_level_generation::{level_rng, LevelGeneration, MAX_CLIENT_SEED};
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::net::TcpListener;

pub use auth::{SessionVerifier, StaticSessions, UserId};
pub use catalog::{CatalogSource, StaticCatalog};
pub use config::{ConfigError, ServerConfig};

use error::ApiError;
use wire::{
    BreedRequest, BreedResponse, LevelRequest, LevelResponse, PreviewRequest, PreviewResponse,
};

/// Engines and collaborators shared by every request.
pub struct AppState {
    breeding: BreedingEngine,
    levels: LevelGeneration,
    sessions: Arc<dyn SessionVerifier>,
    catalogs: Arc<dyn CatalogSource>,
}

impl AppState {
    /// Assembles the state from its parts.
    #[must_use]
    pub fn new(
        breeding: BreedingEngine,
        levels: LevelGeneration,
        sessions: Arc<dyn SessionVerifier>,
        catalogs: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            breeding,
            levels,
            sessions,
            catalogs,
        }
    }

    /// Builds the state described by a configuration file, loading its catalog.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let breeding_config = BreedingConfig::authoritative().with_resolver(config.resolver);
        let breeding =
            BreedingEngine::new(breeding_config).context("invalid breeding configuration")?;
        let catalogs = match &config.catalog {
            Some(path) => config::load_catalogs(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?,
            None => {
                warn!("no catalog configured; level generation will fail until one is provided");
                Catalogs::default()
            }
        };
        info!(
            "loaded {} pests, {} bosses, {} environmental bosses, {} lore entries",
            catalogs.pests.len(),
            catalogs.bosses.len(),
            catalogs.environmental_bosses.len(),
            catalogs.lore.len()
        );
        if config.sessions.is_empty() {
            warn!("no sessions configured; every content request will be rejected");
        }

        Ok(Self::new(
            breeding,
            LevelGeneration::default(),
            Arc::new(StaticSessions::new(&config.sessions)),
            Arc::new(StaticCatalog::new(catalogs)),
        ))
    }
}

/// Routes served by the adapter.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/breed", post(breed))
        .route("/breed/preview", post(preview))
        .route("/generate-level", post(generate_level))
        .with_state(Arc::new(state))
}

/// Decodes a `{ parent1, parent2 }` document in any accepted parent format.
pub fn decode_parents(body: &[u8]) -> Result<(Organism, Organism), ContentError> {
    wire::decode::<PreviewRequest>(body)?.parents()
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("{WELCOME_BANNER} Listening on {}", listener.local_addr()?);
    serve_listener(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_listener(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {error}");
        std::future::pending::<()>().await;
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn breed(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BreedResponse>, ApiError> {
    let user = auth::authenticate(state.sessions.as_ref(), &headers)?;
    let mut request: BreedRequest = wire::decode(&body)?;
    let (parent1, parent2) = request.parents()?;
    let seed = request.seed.unwrap_or_else(fresh_seed);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let result = state
        .breeding
        .breed(&parent1, &parent2, &request.context(), &mut rng)?;
    info!(
        "{} bred {} x {} into {} ({:?})",
        user.as_str(),
        parent1.strain_name,
        parent2.strain_name,
        result.offspring.strain_name,
        result.offspring.rarity
    );

    Ok(Json(BreedResponse {
        success: true,
        offspring: result.offspring,
        quality_score: result.quality_score,
        seed,
    }))
}

async fn preview(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PreviewResponse>, ApiError> {
    let _ = auth::authenticate(state.sessions.as_ref(), &headers)?;
    let request: PreviewRequest = wire::decode(&body)?;
    let (parent1, parent2) = request.parents()?;
    let preview = state.breeding.preview(&parent1, &parent2)?;
    Ok(Json(PreviewResponse {
        success: true,
        preview,
    }))
}

async fn generate_level(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LevelResponse>, ApiError> {
    let user = auth::authenticate(state.sessions.as_ref(), &headers)?;
    let request: LevelRequest = wire::decode(&body)?;
    let level = request
        .level
        .ok_or_else(|| ContentError::validation("level is required"))?;
    let context = request.player_stats.unwrap_or_default();
    let seed = request.seed.unwrap_or_else(fresh_seed);

    let catalogs = state.catalogs.catalogs()?;
    let descriptor = state
        .levels
        .generate(level, &context, &catalogs, &mut level_rng(seed, level))?;
    info!("{} generated level {level} with seed {seed}", user.as_str());

    Ok(Json(LevelResponse {
        success: true,
        level: descriptor,
        seed,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn fresh_seed() -> u64 {
    rand::thread_rng().gen::<u64>() & MAX_CLIENT_SEED
}
