use grid_arena::net::server;
use grid_arena::{MatchConfig, TickScheduler, World, config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

#[tokio::main]
async fn main() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let peers = MatchConfig::default().max_connections;
    let world = World::new(MatchConfig::multiplayer(peers), &mut rand::thread_rng());
    let scheduler = Arc::new(TickScheduler::new(world.clone()));

    let addr = format!("{}:{}", config::server_host(), config::server_port());
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, %e, "could not bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(listener, world, scheduler).await {
        error!(%e, "server error");
        std::process::exit(1);
    }
    info!("match over, shutting down");
}
