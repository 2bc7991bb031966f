use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use mcp_hotel_booking::adapters::cache::memory_cache::MemoryCache;
use mcp_hotel_booking::adapters::payment::simulated::SimulatedGateway;
use mcp_hotel_booking::adapters::rest::client::RestBookingClient;
use mcp_hotel_booking::config::load_config;
use mcp_hotel_booking::domain::card::CardValidator;
use mcp_hotel_booking::domain::session::{SessionState, SessionStore};
use mcp_hotel_booking::mcp::server::BookingMcpServer;
use mcp_hotel_booking::ports::booking_api::BookingApi;
use mcp_hotel_booking::ports::cache::ResponseCache;
use mcp_hotel_booking::ports::payment_gateway::PaymentGateway;

fn find_config_path() -> PathBuf {
    let candidates = [PathBuf::from("config.yaml"), exe_dir().join("config.yaml")];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting mcp-hotel-booking server");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::new(config.cache.max_entries));
    let api: Arc<dyn BookingApi> = Arc::new(
        RestBookingClient::new(&config.api, config.cache.clone(), cache)
            .context("failed to build HTTP client for the booking API")?,
    );
    tracing::info!(base_url = %config.api.base_url, "Booking API configured");

    let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new(
        CardValidator::default(),
        &config.payment,
    ));
    let session = SessionStore::new(SessionState::new(
        config.session.default_currency,
        config.session.default_locale,
    ));

    let server = BookingMcpServer::new(api, gateway, session);

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
