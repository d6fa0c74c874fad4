//! Stock bridge server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http (axum) ──▶ validate ticker            │
//!                           │                     │                        │
//!                           │                     ▼                        │
//!                           │        InvocationSpec (program, args, stdin) │
//!                           │                     │                        │
//!                           │                     ▼                        │
//!                           │   bridge: permit → spawn → drain → exit ─────┼──▶ worker
//!                           │                     │                        │    process
//!     Client Response       │                     ▼                        │
//!     ◀─────────────────────┼── pass-through / JSON parse / degrade       │
//!                           │                                              │
//!                           │  config · observability · lifecycle · limits │
//!                           └──────────────────────────────────────────────┘
//! ```

use stock_bridge::config;
use stock_bridge::lifecycle::{signals, startup, Shutdown};
use stock_bridge::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address(),
        interpreter = ?config.workers.interpreter,
        max_workers = config.limits.max_concurrent_workers,
        "stock-bridge starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::start(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
