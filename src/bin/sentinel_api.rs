//! SentinelScan Cloud API Server
//!
//! REST API for the scan orchestration and risk-scoring engine
//!
//! Usage:
//!   cargo run --bin sentinel_api
//!
//! Environment:
//!   PORT / SENTINEL_PORT - Server port (default: 8080)
//!   SENTINEL_HOST        - Server host (default: 0.0.0.0)
//!   RUST_LOG             - Log level (default: info)

use sentinel_scan::api::{create_router, AppState};
use sentinel_scan::ScanConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    // Thresholds and signal lists, read once at startup
    let config = Arc::new(ScanConfig::default());
    let state = Arc::new(AppState::new(config));
    let telemetry_state = state.clone();

    let app = create_router(state);

    // Get server config from env (PaaS platforms set PORT)
    let host = std::env::var("SENTINEL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("SENTINEL_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 SentinelScan API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /scan     - Scan a URL, address, tx hash or ENS name");
    info!("  GET  /stats    - Aggregate scan statistics");
    info!("  GET  /health   - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if tokio::signal::ctrl_c().await.is_err() {
            info!("Ctrl+C handler unavailable; running until killed");
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("🛑 Shutdown signal received");
    let stats = telemetry_state.telemetry.get_stats();
    info!("   Total scans served: {}", stats.total_scans);
    info!("   Flagged scans: {}", stats.flagged_scans);
    info!("🛑 SentinelScan API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════╗
    ║        S E N T I N E L   S C A N             ║
    ║                                              ║
    ║     Multi-source scam & risk scanner         ║
    ║              API  v{}                     ║
    ╚══════════════════════════════════════════════╝
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
