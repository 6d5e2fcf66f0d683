use grid_arena::net::client::Client;
use grid_arena::{MatchConfig, config};
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

    let addr = format!("{}:{}", config::server_host(), config::server_port());
    let (client, receive) = match Client::connect(&addr, MatchConfig::default()).await {
        Ok(connected) => connected,
        Err(e) => {
            error!(%addr, %e, "could not join match");
            std::process::exit(1);
        }
    };
    info!(hero = client.hero_id(), "connected, mirroring the match");

    let outcome = receive.await;
    // Drain the tick pool before deciding the exit code; the error paths
    // must not skip the graceful shutdown.
    client.scheduler().stop().await;
    match outcome {
        Ok(Ok(())) => info!("match over"),
        Ok(Err(e)) => {
            error!(%e, "connection lost");
            std::process::exit(1);
        }
        Err(e) => {
            error!(%e, "receive loop crashed");
            std::process::exit(1);
        }
    }
}
