//! pdfbook Server - HTTP API for PDF to e-book conversion

use anyhow::Result;
use pdfbook_core::converter::{SearchPath, EBOOK_CONVERT};
use pdfbook_server::{config::ServerConfig, routes, state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pdfbook_server=info,pdfbook_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // PATH is captured once; the converter is still probed on every request
    let search_path = SearchPath::from_env();
    match search_path.locate(EBOOK_CONVERT) {
        Some(path) => tracing::info!(path = %path.display(), "External converter found"),
        None => tracing::info!("{} not found, using the built-in converter", EBOOK_CONVERT),
    }

    let service = pdfbook_core::default_service(search_path, config.converter.clone());
    let addr = config.bind;
    let app = routes::create_router(state::AppState::new(service, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
