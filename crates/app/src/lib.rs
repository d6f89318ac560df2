//! PHA application composition root
//!
//! Wires configuration, storage, the model gateway and the domain routers
//! into a single application.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use pha_accounts::{AccountsRepositories, AccountsState};
use pha_auth::{AuthBackend, AuthConfig};
use pha_common::Config;
use pha_conversations::{
    ApologyFallback, ConversationManager, ConversationSettings, ConversationsRepositories,
    ConversationsState,
};
use pha_llm::{LlmConfig, LlmServiceFactory};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Apply pending schema migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth = AuthBackend::new(AuthConfig::from(config));

    let llm = LlmServiceFactory::create(LlmConfig::from(config))?;

    let manager = ConversationManager::new(
        Arc::new(ConversationsRepositories::new(pool.clone())),
        llm,
        Arc::new(ApologyFallback::new(config.chat_fallback_text.clone())),
        ConversationSettings::from(config),
    );

    let accounts_state = AccountsState {
        repos: AccountsRepositories::new(pool),
        auth: auth.clone(),
    };

    let conversations_state = ConversationsState {
        manager: Arc::new(manager),
        auth,
    };

    Ok(build_router(
        accounts_state,
        conversations_state,
        &config.cors_allowed_origins,
    ))
}

/// Compose domain routers with shared infrastructure routes and layers
pub fn build_router(
    accounts: AccountsState,
    conversations: ConversationsState,
    cors_allowed_origins: &str,
) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "PHA API v0.0.1-SNAPSHOT" }),
        )
        .merge(pha_accounts::routes().with_state(accounts))
        .merge(pha_conversations::routes().with_state(conversations))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(build_cors_layer(cors_allowed_origins))
                .into_inner(),
        )
}

/// `*` allows any origin; otherwise a comma-separated allow-list
pub fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
