// src/lib.rs
// Public library surface for integration tests and the binary.

pub mod api;
pub mod config;
pub mod context;
pub mod detect;
pub mod generator;
pub mod knowledge;
pub mod metrics;
pub mod render;
pub mod resolver;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AssistantConfig;
pub use crate::knowledge::KnowledgeBase;
pub use crate::resolver::{Mode, ReplyResolver};

use axum::Router;
use tracing::info;

/// Build the full app router from environment configuration.
/// Knowledge or config errors surface here, before the server starts.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = AssistantConfig::from_env()?;
    let resolver = cfg.build_resolver()?;
    info!(
        mode = resolver.mode().as_str(),
        sectors = resolver.knowledge().sectors().len(),
        brands = resolver.knowledge().brands().len(),
        regions = resolver.knowledge().regions().len(),
        "assistant ready"
    );
    Ok(router(AppState::new(resolver)))
}
