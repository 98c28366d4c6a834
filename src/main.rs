use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, Request},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt, cors::CorsLayer, request_id::MakeRequestUuid, services::ServeDir, trace::TraceLayer,
};
use tracing::debug_span;
use tracing_subscriber::{EnvFilter, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::SwaggerConfig,
    documents::{DocumentStore, VersionSource},
    swagger_ui::{PageConfig, WEBJAR_PATH},
};

mod config;
mod data;
mod documents;
mod handlers;
mod swagger_ui;
mod valid;

#[cfg(test)]
mod tests;

pub(crate) struct AppState {
    pub page: PageConfig,
    pub versions: Arc<dyn VersionSource>,
    pub documents: DocumentStore,
}

impl AppState {
    /// The page lists the loaded documents, falling back to the configured versions.
    fn new(config: &SwaggerConfig, documents: DocumentStore) -> Self {
        let versions: Arc<dyn VersionSource> = if documents.is_empty() {
            Arc::new(config.versions.clone())
        } else {
            Arc::new(documents.clone())
        };
        AppState {
            page: config.page.clone(),
            versions,
            documents,
        }
    }
}

fn app(config: &SwaggerConfig, documents: DocumentStore) -> Router<()> {
    let page = &config.page;
    let mut router = Router::new()
        .route(&page.mount_path(&page.ui_path), get(handlers::swagger::swagger_ui))
        .route(
            &page.mount_path(&page.documentation_path),
            get(handlers::openapi::openapi_document),
        );

    if let Some(assets_dir) = &config.assets_dir {
        let assets_path = page.mount_path(&format!("{WEBJAR_PATH}/{}", page.swagger_version));
        tracing::debug!(assets_path = %assets_path, assets_dir = %assets_dir.display(), "serving swagger ui assets");
        router = router.nest_service(&assets_path, ServeDir::new(assets_dir));
    }

    let service = ServiceBuilder::default()
        .compression()
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request.headers().get("x-request-id").and_then(|v| v.to_str().ok());
            let matched_path = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
            let method = request.method().as_str();
            debug_span!("request_id", method, matched_path, request_id,)
        }))
        .layer(CorsLayer::very_permissive());

    router
        .with_state(Arc::new(AppState::new(config, documents)))
        .layer(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "DEBUG".into()))
        .with(layer().json())
        .init();

    let config = SwaggerConfig::from_env().context("failed to load configuration")?;
    let documents = match &config.documents_dir {
        Some(dir) => DocumentStore::load_dir(dir).context("failed to load openapi documents")?,
        None => DocumentStore::default(),
    };

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    start_server(listener, app(&config, documents)).await
}

pub(crate) async fn start_server(listener: tokio::net::TcpListener, app: Router<()>) -> anyhow::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
