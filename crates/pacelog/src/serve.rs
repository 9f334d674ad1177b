// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pacelog serve` command implementation.
//!
//! Wires the LINE channel, Typhoon OCR/chat clients, and SQLite storage into
//! the event pipeline, then runs the webhook gateway until a shutdown signal
//! arrives, closing storage on the way out.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use pacelog_config::PacelogConfig;
use pacelog_core::PacelogError;
use pacelog_gateway::{GatewayState, start_server};
use pacelog_line::LineClient;
use pacelog_pipeline::Pipeline;
use pacelog_storage::SqliteStore;
use pacelog_typhoon::{TyphoonChatClient, TyphoonOcrClient};

/// Runs the `pacelog serve` command.
pub async fn run_serve(config: PacelogConfig) -> Result<(), PacelogError> {
    init_tracing(&config.agent.log_level);

    info!("starting pacelog serve");

    // Validation has already checked these; the errors here guard against
    // callers that skip it.
    let channel_secret = config
        .line
        .channel_secret
        .clone()
        .ok_or_else(|| PacelogError::Config("line.channel_secret is required".into()))?;
    let access_token = config
        .line
        .channel_access_token
        .clone()
        .ok_or_else(|| PacelogError::Config("line.channel_access_token is required".into()))?;
    let api_key = config
        .typhoon
        .api_key
        .clone()
        .ok_or_else(|| PacelogError::Config("typhoon.api_key is required".into()))?;

    let call_timeout = Duration::from_secs(config.pipeline.call_timeout_secs);

    let channel = Arc::new(LineClient::new(
        &access_token,
        config.line.api_base_url.clone(),
        config.line.data_base_url.clone(),
    )?);
    let ocr = Arc::new(TyphoonOcrClient::new(
        &api_key,
        config.typhoon.base_url.clone(),
        config.typhoon.ocr_model.clone(),
        call_timeout,
    )?);
    let chat = Arc::new(TyphoonChatClient::new(
        &api_key,
        config.typhoon.base_url.clone(),
        config.typhoon.chat_model.clone(),
        call_timeout,
    )?);
    let store = SqliteStore::open(&config.storage).await?;
    info!(
        database_path = %config.storage.database_path,
        media_dir = %config.storage.media_dir,
        "storage ready"
    );

    let pipeline = Pipeline::new(channel, ocr, chat, Arc::new(store.clone()), &config.pipeline);

    let state = GatewayState {
        pipeline: Arc::new(pipeline),
        channel_secret,
    };
    start_server(&config.gateway, state).await?;

    info!("gateway stopped, flushing storage");
    store.close().await
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pacelog={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
