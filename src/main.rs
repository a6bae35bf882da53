//! Archana assistant — binary entrypoint.
//! Boots the Axum HTTP server with the chat route, CORS and `/metrics`.

use archana_assistant::{app, metrics::Metrics, telemetry};
use shuttle_axum::ShuttleAxum;
use tracing::warn;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    let mut router = app().await?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics recorder not installed"),
    }

    Ok(router.into())
}
