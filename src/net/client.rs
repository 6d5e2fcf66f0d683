// Replication client: mirrors the server's world from the init snapshot and
// the event stream, and sends the local player's moves and attacks back.

use crate::config::{MatchConfig, READ_BUFFER_SIZE};
use crate::entity::{Controller, Team};
use crate::event::Event;
use crate::protocol::{self, FRAME_DELIMITER, FrameReader, ProtocolError, START_TOKEN};
use crate::scheduler::TickScheduler;
use crate::world::World;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),
    /// A frame the mirror cannot decode. Fatal: skipping an event would leave
    /// this peer's world permanently out of step.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("server closed the connection")]
    Disconnected,
    #[error("assigned roster index {0} is out of range")]
    AssignedIndexOutOfRange(usize),
}

/// One peer's view of a match. Holds the mirrored world, the scheduler that
/// drives the local projectile pass, and the write half of the connection.
pub struct Client {
    world: Arc<World>,
    scheduler: Arc<TickScheduler>,
    hero_id: String,
    writer: Mutex<OwnedWriteHalf>,
}

impl Client {
    /// Connects, performs the init handshake, and spawns the receive loop.
    /// The returned handle resolves when the connection ends; an `Err` means
    /// the mirror is no longer trustworthy.
    pub async fn connect(
        addr: &str,
        config: MatchConfig,
    ) -> Result<(Arc<Client>, JoinHandle<Result<(), ClientError>>), ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (mut reader, writer) = stream.into_split();

        // The init snapshot is one message, sent before anything else.
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Err(ClientError::Disconnected);
        }
        let (snapshot, index) = protocol::decode_init(&String::from_utf8_lossy(&buf[..n]))?;

        let world = World::from_snapshot(config, snapshot);
        let hero_id = {
            let mut heroes = world
                .roster(Team::Hero)
                .write()
                .expect("roster lock poisoned");
            let hero = heroes
                .get_mut(index)
                .ok_or(ClientError::AssignedIndexOutOfRange(index))?;
            hero.controller = Controller::Player;
            hero.id.clone()
        };
        info!(hero = %hero_id, index, "joined match");

        let scheduler = Arc::new(TickScheduler::new(world.clone()));
        let client = Arc::new(Client {
            world: world.clone(),
            scheduler: scheduler.clone(),
            hero_id,
            writer: Mutex::new(writer),
        });
        let receive = tokio::spawn(receive_loop(reader, world, scheduler));
        Ok((client, receive))
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn scheduler(&self) -> &Arc<TickScheduler> {
        &self.scheduler
    }

    pub fn hero_id(&self) -> &str {
        &self.hero_id
    }

    /// Asks the server to step the local hero one cell. Dead heroes stay
    /// quiet; the server validates the step before anyone sees it.
    pub async fn send_move(&self, direction_x: i32, direction_y: i32) -> Result<(), ClientError> {
        if self.own_hero_is_dead() {
            return Ok(());
        }
        let event = Event::HeroMove {
            direction_x,
            direction_y,
            id: self.hero_id.clone(),
        };
        self.send(&event).await
    }

    /// Asks the server to fire the local hero's projectile at a map point.
    pub async fn send_attack(&self, x: f32, y: f32) -> Result<(), ClientError> {
        if self.own_hero_is_dead() {
            return Ok(());
        }
        let event = Event::HeroAttack {
            id: self.hero_id.clone(),
            x,
            y,
        };
        self.send(&event).await
    }

    async fn send(&self, event: &Event) -> Result<(), ClientError> {
        let mut frame = protocol::encode_event(event)?;
        frame.push(FRAME_DELIMITER);
        let mut writer = self.writer.lock().await;
        writer.write_all(frame.as_bytes()).await?;
        Ok(())
    }

    fn own_hero_is_dead(&self) -> bool {
        self.world
            .heroes()
            .iter()
            .find(|h| h.id == self.hero_id)
            .is_none_or(|h| h.is_dead())
    }
}

/// Applies the server's event stream to the mirrored world. The `start`
/// token arms the local projectile pass after the settle delay; everything
/// else must decode, or the loop aborts loudly.
async fn receive_loop(
    mut reader: OwnedReadHalf,
    world: Arc<World>,
    scheduler: Arc<TickScheduler>,
) -> Result<(), ClientError> {
    let settle = world.config().settle_delay;
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut frames = FrameReader::new();

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Err(ClientError::Disconnected);
        }
        frames.push(&String::from_utf8_lossy(&buf[..n]));
        while let Some(frame) = frames.next_frame() {
            if frame == START_TOKEN {
                info!("match starting");
                let scheduler = scheduler.clone();
                tokio::spawn(async move {
                    sleep(settle).await;
                    scheduler.start_projectiles();
                });
                continue;
            }
            let event = protocol::decode_event(&frame).inspect_err(|e| {
                error!(%e, frame, "unreadable event, abandoning the mirror");
            })?;
            world.apply_client_event(&event);
        }
    }
}
