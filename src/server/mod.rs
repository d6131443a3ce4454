//! REST surface over a [`PromptStore`].

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::SharedStore;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::PromptStore;
use std::sync::Arc;

/// Builds the application router.
pub fn app(store: Arc<dyn PromptStore>) -> Router {
    let api = Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/api/categories/{id}/prompts", get(handlers::category_prompts))
        .route(
            "/api/prompts",
            get(handlers::list_prompts).post(handlers::create_prompt),
        )
        .route(
            "/api/prompts/{id}",
            get(handlers::get_prompt)
                .put(handlers::update_prompt)
                .delete(handlers::delete_prompt),
        )
        .route("/api/prompts/{id}/customize", post(handlers::customize_prompt))
        .with_state(store);

    Router::new()
        .route("/", get(handlers::index))
        .merge(api)
        .fallback(handlers::not_found)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Serves the API on `bind` until Ctrl-C.
pub async fn serve(store: Arc<dyn PromptStore>, bind: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Prompt library API listening on http://{}", addr);
    tracing::info!("Health check: GET /api/health");

    axum::serve(listener, app(store))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
}
