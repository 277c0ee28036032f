// server/src/main.rs

mod api;

use anyhow::Context;
use common_utils::load_settings_from_env;
use community::CommunityForum;
use orchestrator::{Orchestrator, SampleForecasts};
use std::sync::Arc;
use tracing::info;

use crate::api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    info!("[Server] Initializing...");

    let settings = load_settings_from_env();

    let forum = match &settings.forum_db_path {
        Some(path) => CommunityForum::open(path),
        None => CommunityForum::open_default(),
    }
    .context("could not open the community forum database")?;

    info!("[Server] Initializing Orchestrator...");
    let orchestrator = Orchestrator::from_config(settings.advisory.clone(), Arc::new(SampleForecasts::new()));
    info!("[Server] Orchestrator initialized with domains: {:?}", orchestrator.domains());

    let app = router(AppState { orchestrator: Arc::new(orchestrator), forum });

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("[Server] API Gateway listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
