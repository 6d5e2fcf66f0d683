// Shared bootstrapping for replication integration tests: a real server on
// an ephemeral port, sped up so a whole match fits in a test run.

use grid_arena::net::server;
use grid_arena::{MatchConfig, TickScheduler, World};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Two-peer match with short periods so starts and echoes land within a test
/// timeout instead of seconds apart.
pub fn fast_config() -> MatchConfig {
    MatchConfig {
        tick_interval: Duration::from_millis(200),
        settle_delay: Duration::from_millis(50),
        ..MatchConfig::multiplayer(2)
    }
}

pub struct TestServer {
    pub addr: String,
    pub world: Arc<World>,
    #[allow(dead_code)]
    pub handle: JoinHandle<std::io::Result<()>>,
}

/// Boots a replication server for one match on an ephemeral port. The server
/// task runs until the match ends or the test runtime is torn down.
pub async fn spawn_server(config: MatchConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr").to_string();
    let world = World::new(config, &mut StdRng::seed_from_u64(7));
    let scheduler = Arc::new(TickScheduler::new(world.clone()));
    let handle = tokio::spawn(server::run(listener, world.clone(), scheduler));
    TestServer {
        addr,
        world,
        handle,
    }
}

/// Polls `condition` until it holds or the timeout passes; returns the final
/// verdict so the caller can assert with its own message.
pub async fn wait_until(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
