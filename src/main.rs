#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use kalakobana_server::config;
use kalakobana_server::logging;
use kalakobana_server::server::GameServer;
use kalakobana_server::websocket;
use std::net::SocketAddr;

/// Kalakobana -- authoritative WebSocket server for the Kalakobana word game
#[derive(Parser, Debug)]
#[command(name = "kalakobana-server")]
#[command(about = "Authoritative in-memory WebSocket server for the Kalakobana word game")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json if present; otherwise use code
    // defaults. PORT always wins.
    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if cli.validate_config {
        println!("Configuration validation passed");
        println!();
        println!("Configuration summary:");
        println!("  Port: {}", cfg.port);
        println!("  Static dir: {}", cfg.static_dir);
        println!("  Max players per room: {}", cfg.server.max_players);
        println!("  Room code length: {}", cfg.server.room_code_length);
        println!("  Reconnect grace: {}s", cfg.server.reconnect_grace_secs);
        return Ok(());
    }

    // Initialize logging from config.
    logging::init_with_config(&cfg.logging);

    let port: u16 = cfg.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "Starting Kalakobana server");

    let cors_origins = cfg.cors_origins.clone();
    let static_dir = cfg.static_dir.clone();
    let game_server = GameServer::new(cfg);

    let app = websocket::create_router(&cors_origins, &static_dir).with_state(game_server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cors_origins,
        "Server started - WebSocket: /ws, Room list: /api/rooms, Metrics: /metrics"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
