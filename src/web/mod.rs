//! HTTP surface of the service.

pub mod routes;

pub use routes::{AppState, app_routes};

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::llm::{LlmConfig, create_provider};
use crate::triage::TriageService;

/// Wire configuration, provider and routes into a ready-to-serve router.
///
/// A missing API key is not an error: the service starts and every
/// classification reports the initialization sentinels.
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let llm = match LlmConfig::from_app_config(config) {
        Some(llm_config) => Some(create_provider(&llm_config)?),
        None => {
            warn!(
                "GEMINI_API_KEY is not set and no key file was found; \
                 classification requests will return initialization errors"
            );
            None
        }
    };

    Ok(app_routes(TriageService::new(llm)))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
