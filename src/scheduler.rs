// Recurring-task scheduler for autonomous combatants and the projectile
// pass. One tokio task per combatant at the base period, one projectile task
// at the fast period, all over the shared world.

use crate::entity::Team;
use crate::systems::projectiles;
use crate::world::World;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval, timeout_at};
use tracing::{info, warn};

pub struct TickScheduler {
    world: Arc<World>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    stopped: AtomicBool,
    projectiles_started: AtomicBool,
}

impl TickScheduler {
    pub fn new(world: Arc<World>) -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            world,
            shutdown_tx,
            tasks: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
            projectiles_started: AtomicBool::new(false),
        }
    }

    /// Schedules every hero's recurring tick. Multiplayer servers never call
    /// this: player heroes are driven by inbound events instead.
    pub fn start_heroes(&self) {
        self.start_roster(Team::Hero);
    }

    pub fn start_enemies(&self) {
        self.start_roster(Team::Enemy);
    }

    fn start_roster(&self, team: Team) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }
        let count = self
            .world
            .roster(team)
            .read()
            .expect("roster lock poisoned")
            .len();
        let mut tasks = self.tasks.lock().expect("tasks lock poisoned");
        for index in 0..count {
            let world = self.world.clone();
            let mut shutdown_rx = self.shutdown_tx.subscribe();
            tasks.push(tokio::spawn(async move {
                let mut ticks = interval(world.config().tick_interval);
                loop {
                    tokio::select! {
                        _ = ticks.tick() => {
                            // A misbehaving combatant only hurts itself: the
                            // tick is synchronous and infallible, and a dead
                            // combatant's tick is a no-op.
                            world.tick_combatant(team, index, &mut rand::thread_rng());
                        }
                        _ = shutdown_rx.changed() => break,
                    }
                }
            }));
        }
        info!(?team, count, "combatant ticks scheduled");
    }

    /// Schedules the projectile-advance pass at the fast interval. Safe to
    /// call once per match; repeated calls are ignored.
    pub fn start_projectiles(&self) {
        if self.stopped.load(Ordering::SeqCst)
            || self.projectiles_started.swap(true, Ordering::SeqCst)
        {
            return;
        }
        let world = self.world.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let task = tokio::spawn(async move {
            let mut ticks = interval(world.config().projectile_interval());
            loop {
                tokio::select! {
                    _ = ticks.tick() => projectiles::advance(&world),
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        self.tasks.lock().expect("tasks lock poisoned").push(task);
        info!("projectile pass scheduled");
    }

    /// Graceful-then-forced shutdown: signal every task, wait out the grace
    /// window, abort stragglers. A pool that still does not drain is reported,
    /// not escalated. Calling `stop` again is a no-op.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(true);

        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().expect("tasks lock poisoned");
            tasks.drain(..).collect()
        };

        let grace = self.world.config().shutdown_grace();
        let deadline = Instant::now() + grace;
        let mut forced = Vec::new();
        for mut handle in handles {
            if timeout_at(deadline, &mut handle).await.is_err() {
                handle.abort();
                forced.push(handle);
            }
        }

        if !forced.is_empty() {
            let deadline = Instant::now() + grace;
            for mut handle in forced {
                if timeout_at(deadline, &mut handle).await.is_err() {
                    warn!("tick pool did not terminate");
                }
            }
        }
        info!("scheduler stopped");
    }
}
