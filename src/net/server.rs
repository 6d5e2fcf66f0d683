// Replication server: accepts up to `max_connections` peers over TCP, hands
// each its roster slot, relays every world event to every peer, and kicks the
// match off once the last slot fills.

use crate::config::READ_BUFFER_SIZE;
use crate::entity::{Controller, Team};
use crate::event::{Event, Observer};
use crate::protocol::{self, FRAME_DELIMITER, FrameReader, START_TOKEN};
use crate::scheduler::TickScheduler;
use crate::world::World;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{error, info, warn};

type Outbound = mpsc::UnboundedSender<String>;

/// The live peer registry. Each peer owns an outbound frame channel; dropping
/// the sender ends that peer's writer task.
#[derive(Default)]
struct Connections {
    peers: Mutex<HashMap<String, Outbound>>,
}

impl Connections {
    fn register(&self, id: String, tx: Outbound) {
        self.peers.lock().expect("peers lock poisoned").insert(id, tx);
    }

    fn deregister(&self, id: &str) {
        self.peers.lock().expect("peers lock poisoned").remove(id);
    }

    fn clear(&self) {
        self.peers.lock().expect("peers lock poisoned").clear();
    }

    /// Queues one frame for every connected peer. A peer whose writer has
    /// already gone away is skipped; its reader task handles the cleanup.
    fn broadcast(&self, frame: &str) {
        let peers = self.peers.lock().expect("peers lock poisoned");
        for tx in peers.values() {
            let _ = tx.send(frame.to_string());
        }
    }
}

/// World observer that fans every published event out to all peers. The event
/// is serialized once per publish, not once per peer.
struct Broadcast {
    connections: Arc<Connections>,
}

impl Observer for Broadcast {
    fn handle_event(&self, event: &Event) {
        match protocol::encode_event(event) {
            Ok(frame) => self.connections.broadcast(&frame),
            Err(e) => error!(kind = event.kind(), %e, "event not replicated"),
        }
    }
}

/// Runs the accept loop until the match ends. Peers past `max_connections`
/// are turned away; the match starts once the last slot fills and the run
/// returns once either roster is wiped out.
pub async fn run(
    listener: TcpListener,
    world: Arc<World>,
    scheduler: Arc<TickScheduler>,
) -> std::io::Result<()> {
    let connections = Arc::new(Connections::default());
    world.add_observer(Arc::new(Broadcast {
        connections: connections.clone(),
    }));

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(watch_match_end(
        world.clone(),
        scheduler.clone(),
        connections.clone(),
        shutdown_tx,
    ));

    let max_connections = world.config().max_connections;
    let mut accepted = 0usize;
    info!(port = listener.local_addr()?.port(), max_connections, "replication server listening");

    loop {
        let socket = tokio::select! {
            _ = shutdown_rx.changed() => break,
            result = listener.accept() => match result {
                Ok((socket, addr)) => {
                    info!(%addr, "peer connected");
                    socket
                }
                Err(e) => {
                    warn!(%e, "accept failed");
                    continue;
                }
            },
        };

        if accepted >= max_connections {
            warn!(max_connections, "peer turned away, match is full");
            drop(socket);
            continue;
        }

        let hero_index = accepted;
        accepted += 1;
        let id = format!("Player{accepted}");

        let (reader, writer) = socket.into_split();
        let (tx, rx) = mpsc::unbounded_channel();

        {
            let mut heroes = world
                .roster(Team::Hero)
                .write()
                .expect("roster lock poisoned");
            if let Some(hero) = heroes.get_mut(hero_index) {
                hero.controller = Controller::Remote;
            }
        }
        let init = match protocol::encode_init(&world.snapshot(), hero_index) {
            Ok(init) => init,
            Err(e) => {
                error!(%e, "world state did not serialize");
                continue;
            }
        };

        connections.register(id.clone(), tx.clone());
        let _ = tx.send(init);
        tokio::spawn(write_frames(rx, writer));
        tokio::spawn(read_events(reader, id, world.clone(), connections.clone()));

        if accepted == max_connections {
            tokio::spawn(kick_off(world.clone(), scheduler.clone(), connections.clone()));
        }
    }

    info!("replication server stopped");
    Ok(())
}

/// Final-slot sequence: let the peers settle, announce the start, settle
/// again, then unleash the autonomous side. Player heroes stay event-driven.
async fn kick_off(world: Arc<World>, scheduler: Arc<TickScheduler>, connections: Arc<Connections>) {
    let settle = world.config().settle_delay;
    sleep(settle).await;
    connections.broadcast(START_TOKEN);
    sleep(settle).await;
    scheduler.start_enemies();
    scheduler.start_projectiles();
    info!("match started");
}

/// Polls for a wiped-out roster and tears the match down when it finds one.
async fn watch_match_end(
    world: Arc<World>,
    scheduler: Arc<TickScheduler>,
    connections: Arc<Connections>,
    shutdown_tx: watch::Sender<bool>,
) {
    let mut ticks = tokio::time::interval(world.config().projectile_interval());
    loop {
        ticks.tick().await;
        let heroes_lost = world.is_roster_empty(Team::Hero);
        let enemies_lost = world.is_roster_empty(Team::Enemy);
        if heroes_lost || enemies_lost {
            info!(winner = if heroes_lost { "enemies" } else { "heroes" }, "match over");
            scheduler.stop().await;
            connections.clear();
            let _ = shutdown_tx.send(true);
            return;
        }
    }
}

/// Writer half of one connection: drains the outbound channel, batching
/// whatever is already queued into a single write.
async fn write_frames(mut rx: mpsc::UnboundedReceiver<String>, mut writer: OwnedWriteHalf) {
    while let Some(frame) = rx.recv().await {
        let mut batch = frame;
        batch.push(FRAME_DELIMITER);
        while let Ok(next) = rx.try_recv() {
            batch.push_str(&next);
            batch.push(FRAME_DELIMITER);
        }
        if let Err(e) = writer.write_all(batch.as_bytes()).await {
            warn!(%e, "peer write failed");
            break;
        }
    }
}

/// Reader half of one connection: reassembles frames and applies each event
/// to the authoritative world. Any fault is fatal to this peer only.
async fn read_events(
    mut reader: OwnedReadHalf,
    id: String,
    world: Arc<World>,
    connections: Arc<Connections>,
) {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut frames = FrameReader::new();

    'peer: loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                info!(peer = %id, "peer disconnected");
                break;
            }
            Ok(n) => {
                frames.push(&String::from_utf8_lossy(&buf[..n]));
                while let Some(frame) = frames.next_frame() {
                    let event = match protocol::decode_event(&frame) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!(peer = %id, %e, "dropping peer");
                            break 'peer;
                        }
                    };
                    if let Err(e) = world.apply_server_event(&event) {
                        warn!(peer = %id, %e, "dropping peer");
                        break 'peer;
                    }
                }
            }
            Err(e) => {
                warn!(peer = %id, %e, "peer read failed");
                break;
            }
        }
    }
    connections.deregister(&id);
}
