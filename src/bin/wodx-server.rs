// ABOUTME: Server binary for the WODX daily workout service
// ABOUTME: Loads configuration, opens the store, and serves the feed and JSON API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # WODX Server Binary
//!
//! Configuration comes from environment variables; `--http-port` overrides
//! `HTTP_PORT`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use wodx::{config::ServerConfig, logging, resources::ServerResources, server};

#[derive(Parser)]
#[command(name = "wodx-server")]
#[command(about = "WODX - daily workout of the day service")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting WODX server");
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!(
        "Store ready: {}",
        resources.workflow.store().backend_name()
    );

    display_available_endpoints(port);

    if let Err(e) = server::run(resources, port).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());

    info!("=== Available Endpoints ===");
    info!("   Feed:              GET  http://{host}:{port}/?page=0");
    info!("   Generate Today:    POST http://{host}:{port}/generate-today");
    info!("   Generate Workout:  POST http://{host}:{port}/generate");
    info!("   List Records:      GET  http://{host}:{port}/records");
    info!("   Store Record:      POST http://{host}:{port}/records");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("   Readiness:         GET  http://{host}:{port}/ready");
    info!("=== End of Endpoint List ===");
}
