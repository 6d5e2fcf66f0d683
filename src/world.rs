// Authoritative world state for one match: rosters, projectiles, grid, and
// the event publication hub that the replication layer observes.

use crate::config::MatchConfig;
use crate::entity::{Combatant, Projectile, STEPS, Team, lowest_hp_target};
use crate::event::{Event, Observer};
use crate::grid::{Cell, Grid};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Invoked when a hit drops a combatant's health to zero or below. The
/// presentation layer hangs its death animation off this.
pub type DeathHook = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Error)]
pub enum WorldError {
    /// The server only accepts move and targeted-attack events from peers.
    #[error("event kind {0} is not accepted from clients")]
    UnsupportedEvent(&'static str),
}

/// Full roster plus grid, used for the multiplayer join handshake and as the
/// save/load/replay serialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub heroes: Vec<Combatant>,
    pub enemies: Vec<Combatant>,
    pub bullets: Vec<Projectile>,
    pub map: Grid,
}

/// Shared mutable world state.
///
/// Collections are guarded individually so the per-combatant tick tasks and
/// the projectile pass contend on short critical sections. Where the grid and
/// a roster are both needed the grid lock is taken first; `publish` runs with
/// no world locks held.
pub struct World {
    config: MatchConfig,
    heroes: RwLock<Vec<Combatant>>,
    enemies: RwLock<Vec<Combatant>>,
    projectiles: Mutex<Vec<Projectile>>,
    grid: Mutex<Grid>,
    observers: RwLock<Vec<Arc<dyn Observer>>>,
    death_hook: RwLock<Option<DeathHook>>,
}

impl World {
    /// Fresh match: random non-overlapping placement, heroes on the left
    /// half of the grid, enemies on the right.
    pub fn new(config: MatchConfig, rng: &mut impl Rng) -> Arc<Self> {
        let mut grid = Grid::new(config.rows, config.cols, config.cell_size);
        let heroes = place_roster(&mut grid, &config, rng, Team::Hero);
        let enemies = place_roster(&mut grid, &config, rng, Team::Enemy);
        info!(
            heroes = heroes.len(),
            enemies = enemies.len(),
            "world created"
        );
        Arc::new(Self {
            config,
            heroes: RwLock::new(heroes),
            enemies: RwLock::new(enemies),
            projectiles: Mutex::new(Vec::new()),
            grid: Mutex::new(grid),
            observers: RwLock::new(Vec::new()),
            death_hook: RwLock::new(None),
        })
    }

    /// Rebuilds a world from a received or persisted snapshot.
    pub fn from_snapshot(config: MatchConfig, snapshot: WorldSnapshot) -> Arc<Self> {
        info!(
            heroes = snapshot.heroes.len(),
            enemies = snapshot.enemies.len(),
            "world restored from snapshot"
        );
        Arc::new(Self {
            config,
            heroes: RwLock::new(snapshot.heroes),
            enemies: RwLock::new(snapshot.enemies),
            projectiles: Mutex::new(snapshot.bullets),
            grid: Mutex::new(snapshot.map),
            observers: RwLock::new(Vec::new()),
            death_hook: RwLock::new(None),
        })
    }

    /// Copies the world one collection at a time, holding a single guard per
    /// statement. Taking all four at once would interleave with the
    /// grid-then-roster order used by movers and deadlock against them.
    pub fn snapshot(&self) -> WorldSnapshot {
        let heroes = self.heroes().clone();
        let enemies = self.enemies().clone();
        let bullets = self.projectiles().clone();
        let map = self.grid().clone();
        WorldSnapshot {
            heroes,
            enemies,
            bullets,
            map,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn heroes(&self) -> RwLockReadGuard<'_, Vec<Combatant>> {
        self.heroes.read().expect("heroes lock poisoned")
    }

    pub fn enemies(&self) -> RwLockReadGuard<'_, Vec<Combatant>> {
        self.enemies.read().expect("enemies lock poisoned")
    }

    pub fn projectiles(&self) -> MutexGuard<'_, Vec<Projectile>> {
        self.projectiles.lock().expect("projectiles lock poisoned")
    }

    pub fn grid(&self) -> MutexGuard<'_, Grid> {
        self.grid.lock().expect("grid lock poisoned")
    }

    pub(crate) fn roster(&self, team: Team) -> &RwLock<Vec<Combatant>> {
        match team {
            Team::Hero => &self.heroes,
            Team::Enemy => &self.enemies,
        }
    }

    /// True when every combatant on the side is dead; drives match end.
    pub fn is_roster_empty(&self, team: Team) -> bool {
        self.roster(team)
            .read()
            .expect("roster lock poisoned")
            .iter()
            .all(Combatant::is_dead)
    }

    pub fn add_observer(&self, observer: Arc<dyn Observer>) {
        self.observers
            .write()
            .expect("observers lock poisoned")
            .push(observer);
    }

    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) {
        self.observers
            .write()
            .expect("observers lock poisoned")
            .retain(|existing| !Arc::ptr_eq(existing, observer));
    }

    /// Synchronous dispatch to every observer in registration order.
    pub fn publish(&self, event: &Event) {
        let observers = self.observers.read().expect("observers lock poisoned");
        for observer in observers.iter() {
            observer.handle_event(event);
        }
    }

    pub fn set_death_hook(&self, hook: DeathHook) {
        *self.death_hook.write().expect("death hook lock poisoned") = Some(hook);
    }

    pub(crate) fn notify_death(&self, id: &str) {
        info!(id, "combatant died");
        if let Some(hook) = self
            .death_hook
            .read()
            .expect("death hook lock poisoned")
            .as_ref()
        {
            hook(id);
        }
    }

    /// One autonomous decision: shoot the weakest living opponent, then try
    /// one random cardinal (or no-op) step. Dead or non-autonomous combatants
    /// do nothing; their recurring task keeps firing regardless.
    pub fn tick_combatant(&self, team: Team, index: usize, rng: &mut impl Rng) {
        let me = {
            let roster = self.roster(team).read().expect("roster lock poisoned");
            match roster.get(index) {
                Some(c) if !c.is_dead() && c.is_autonomous() => c.clone(),
                _ => return,
            }
        };

        let target = {
            let opponents = self
                .roster(team.opponent())
                .read()
                .expect("roster lock poisoned");
            lowest_hp_target(&opponents).map(|i| opponents[i].center(self.config.cell_size))
        };
        if let Some((target_x, target_y)) = target {
            let projectile = me.fire_at(target_x, target_y, &self.config);
            let event = Event::CharacterAttack {
                x: projectile.x,
                y: projectile.y,
                atk: projectile.atk,
                speed_x: projectile.speed_x,
                speed_y: projectile.speed_y,
                rotation: projectile.rotation,
            };
            self.projectiles().push(projectile);
            self.publish(&event);
        }

        let direction = rng.gen_range(0..5);
        let (dx, dy) = (STEPS[direction], STEPS[direction + 1]);
        if self.try_step(team, index, dx, dy) {
            self.publish(&Event::step(team, dx, dy, me.id));
        }
    }

    /// Attempts one validated cell step: the destination must be free and
    /// inside the mover's half of the grid. Clearing the source cell, claiming
    /// the destination, and updating the position all happen under the grid
    /// lock so concurrent movers cannot race into the same cell.
    pub(crate) fn try_step(&self, team: Team, index: usize, dx: i32, dy: i32) -> bool {
        let cell = self.config.cell_size;
        let mid = self.config.mid_column() as f32;

        let mut grid = self.grid();
        let mut roster = self.roster(team).write().expect("roster lock poisoned");
        let Some(combatant) = roster.get_mut(index) else {
            return false;
        };

        let next_x = combatant.x + dx as f32 * cell;
        let next_y = combatant.y + dy as f32 * cell;
        let own_half = match team {
            Team::Hero => next_x / cell < mid,
            Team::Enemy => next_x / cell >= mid,
        };
        if own_half && grid.get(next_x, next_y) == Cell::Free {
            grid.set(combatant.x, combatant.y, Cell::Free);
            grid.set(next_x, next_y, Cell::Occupied);
            combatant.x = next_x;
            combatant.y = next_y;
            debug!(id = %combatant.id, x = next_x, y = next_y, "step");
            true
        } else {
            false
        }
    }

    /// Applies an inbound peer event on the authoritative side. Successful
    /// mutations are republished so every peer (the sender included) replays
    /// them; a targeted attack is translated into the projectile it spawns.
    pub fn apply_server_event(&self, event: &Event) -> Result<(), WorldError> {
        match event {
            Event::HeroMove {
                direction_x,
                direction_y,
                id,
            } => {
                let index = index_of(&self.heroes(), id);
                if let Some(index) = index
                    && self.try_step(Team::Hero, index, *direction_x, *direction_y)
                {
                    self.publish(event);
                }
                Ok(())
            }
            Event::HeroAttack { id, x, y } => {
                let shooter = self.heroes().iter().find(|h| &h.id == id).cloned();
                if let Some(shooter) = shooter {
                    let projectile = shooter.fire_at(*x, *y, &self.config);
                    let translated = Event::CharacterAttack {
                        x: projectile.x,
                        y: projectile.y,
                        atk: projectile.atk,
                        speed_x: projectile.speed_x,
                        speed_y: projectile.speed_y,
                        rotation: projectile.rotation,
                    };
                    self.projectiles().push(projectile);
                    self.publish(&translated);
                }
                Ok(())
            }
            other => Err(WorldError::UnsupportedEvent(other.kind())),
        }
    }

    /// Replays a server-validated event on a client's world copy. Moves
    /// reposition the named combatant directly, bypassing grid bookkeeping;
    /// attacks spawn the equivalent local projectile.
    pub fn apply_client_event(&self, event: &Event) {
        let cell = self.config.cell_size;
        match event {
            Event::HeroMove {
                direction_x,
                direction_y,
                id,
            } => reposition(
                &mut self.heroes.write().expect("heroes lock poisoned"),
                id,
                *direction_x as f32 * cell,
                *direction_y as f32 * cell,
            ),
            Event::EnemyMove {
                direction_x,
                direction_y,
                id,
            } => reposition(
                &mut self.enemies.write().expect("enemies lock poisoned"),
                id,
                *direction_x as f32 * cell,
                *direction_y as f32 * cell,
            ),
            Event::CharacterAttack {
                x,
                y,
                atk,
                speed_x,
                speed_y,
                rotation,
            } => {
                self.projectiles().push(Projectile {
                    x: *x,
                    y: *y,
                    hp: crate::entity::PROJECTILE_HP,
                    atk: *atk,
                    speed_x: *speed_x,
                    speed_y: *speed_y,
                    rotation: *rotation,
                });
            }
            Event::HeroAttack { id, x, y } => {
                let shooter = self.heroes().iter().find(|h| &h.id == id).cloned();
                if let Some(shooter) = shooter {
                    self.projectiles().push(shooter.fire_at(*x, *y, &self.config));
                }
            }
        }
    }
}

fn reposition(roster: &mut [Combatant], id: &str, dx: f32, dy: f32) {
    if let Some(combatant) = roster.iter_mut().find(|c| c.id == id) {
        combatant.x += dx;
        combatant.y += dy;
    }
}

fn index_of(roster: &[Combatant], id: &str) -> Option<usize> {
    roster.iter().position(|c| c.id == id)
}

fn place_roster(
    grid: &mut Grid,
    config: &MatchConfig,
    rng: &mut impl Rng,
    team: Team,
) -> Vec<Combatant> {
    let (prefix, count, hp, atk) = match team {
        Team::Hero => ("hero", config.hero_count, config.hero_hp, config.hero_atk),
        Team::Enemy => (
            "enemy",
            config.enemy_count,
            config.enemy_hp,
            config.enemy_atk,
        ),
    };
    let (low, high) = match team {
        Team::Hero => (0, config.mid_column()),
        Team::Enemy => (config.mid_column(), config.rows),
    };
    debug_assert!(
        count as u32 <= (high - low) * config.cols,
        "roster larger than its half of the grid"
    );

    let cell = config.cell_size;
    let mut roster = Vec::with_capacity(count);
    for i in 0..count {
        let (x, y) = loop {
            let x = rng.gen_range(low..high) as f32 * cell;
            let y = rng.gen_range(0..config.cols) as f32 * cell;
            if grid.get(x, y) == Cell::Free {
                break (x, y);
            }
        };
        grid.set(x, y, Cell::Occupied);
        roster.push(Combatant::new(format!("{prefix}{i}"), team, x, y, hp, atk));
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Mutex as StdMutex;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// World with one hero at (0, 0) and one enemy at a chosen cell.
    fn two_sided_world(enemy_cx: u32, enemy_cy: u32) -> Arc<World> {
        let config = MatchConfig::default();
        let cell = config.cell_size;
        let mut grid = Grid::new(config.rows, config.cols, cell);
        let hero = Combatant::new("hero0".into(), Team::Hero, 0.0, 0.0, 100, 10);
        let enemy = Combatant::new(
            "enemy0".into(),
            Team::Enemy,
            enemy_cx as f32 * cell,
            enemy_cy as f32 * cell,
            100,
            10,
        );
        grid.set(hero.x, hero.y, Cell::Occupied);
        grid.set(enemy.x, enemy.y, Cell::Occupied);
        World::from_snapshot(
            config,
            WorldSnapshot {
                heroes: vec![hero],
                enemies: vec![enemy],
                bullets: Vec::new(),
                map: grid,
            },
        )
    }

    struct Recorder {
        tag: &'static str,
        log: Arc<StdMutex<Vec<String>>>,
    }

    impl Observer for Recorder {
        fn handle_event(&self, event: &Event) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, event.kind()));
        }
    }

    #[test]
    fn placement_fills_each_half_without_overlap() {
        let config = MatchConfig::default();
        let world = World::new(config.clone(), &mut seeded());
        let heroes = world.heroes();
        let enemies = world.enemies();
        assert_eq!(heroes.len(), config.hero_count);
        assert_eq!(enemies.len(), config.enemy_count);

        let grid = world.grid();
        let mid = config.mid_column() as f32 * config.cell_size;
        for hero in heroes.iter() {
            assert!(hero.x < mid, "{} spawned outside hero half", hero.id);
            assert_eq!(grid.get(hero.x, hero.y), Cell::Occupied);
        }
        for enemy in enemies.iter() {
            assert!(enemy.x >= mid, "{} spawned outside enemy half", enemy.id);
            assert_eq!(grid.get(enemy.x, enemy.y), Cell::Occupied);
        }

        let mut positions: Vec<(u32, u32)> = heroes
            .iter()
            .chain(enemies.iter())
            .map(|c| (c.x as u32, c.y as u32))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), config.hero_count + config.enemy_count);
    }

    #[test]
    fn snapshot_round_trip_preserves_rosters() {
        let world = World::new(MatchConfig::default(), &mut seeded());
        let snapshot = world.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = World::from_snapshot(
            MatchConfig::default(),
            serde_json::from_str(&json).unwrap(),
        );
        assert_eq!(restored.heroes().len(), world.heroes().len());
        let original = world.heroes();
        let copy = restored.heroes();
        assert_eq!(copy[0].id, original[0].id);
        assert_eq!(copy[0].x, original[0].x);
        assert_eq!(copy[0].hp, original[0].hp);
    }

    #[test]
    fn snapshot_never_blocks_concurrent_moves() {
        // A mover holds the grid lock while waiting on the hero roster; a
        // snapshot taken at the same time must not hold the roster while
        // waiting on the grid.
        let world = two_sided_world(9, 9);
        let mover = world.clone();
        let stepping = std::thread::spawn(move || {
            for _ in 0..500 {
                for direction_x in [1, -1] {
                    mover
                        .apply_server_event(&Event::HeroMove {
                            direction_x,
                            direction_y: 0,
                            id: "hero0".into(),
                        })
                        .unwrap();
                }
            }
        });
        for _ in 0..500 {
            let snapshot = world.snapshot();
            assert_eq!(snapshot.heroes.len(), 1);
        }
        stepping.join().unwrap();
    }

    #[test]
    fn publish_dispatches_in_registration_order() {
        let world = two_sided_world(9, 9);
        let log = Arc::new(StdMutex::new(Vec::new()));
        world.add_observer(Arc::new(Recorder {
            tag: "first",
            log: log.clone(),
        }));
        world.add_observer(Arc::new(Recorder {
            tag: "second",
            log: log.clone(),
        }));

        world.publish(&Event::HeroMove {
            direction_x: 1,
            direction_y: 0,
            id: "hero0".into(),
        });
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:HERO_MOVE", "second:HERO_MOVE"]
        );
    }

    #[test]
    fn removed_observer_no_longer_hears_events() {
        let world = two_sided_world(9, 9);
        let log = Arc::new(StdMutex::new(Vec::new()));
        let observer: Arc<dyn Observer> = Arc::new(Recorder {
            tag: "only",
            log: log.clone(),
        });
        world.add_observer(observer.clone());
        world.remove_observer(&observer);
        world.publish(&Event::HeroAttack {
            id: "hero0".into(),
            x: 0.0,
            y: 0.0,
        });
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn server_move_steps_and_republishes() {
        let world = two_sided_world(9, 9);
        let log = Arc::new(StdMutex::new(Vec::new()));
        world.add_observer(Arc::new(Recorder {
            tag: "net",
            log: log.clone(),
        }));

        let event = Event::HeroMove {
            direction_x: 1,
            direction_y: 0,
            id: "hero0".into(),
        };
        world.apply_server_event(&event).unwrap();

        let heroes = world.heroes();
        assert_eq!(heroes[0].x, 32.0);
        let grid = world.grid();
        assert_eq!(grid.get(0.0, 0.0), Cell::Free);
        assert_eq!(grid.get(32.0, 0.0), Cell::Occupied);
        assert_eq!(*log.lock().unwrap(), vec!["net:HERO_MOVE"]);
    }

    #[test]
    fn server_move_rejects_leaving_the_hero_half() {
        let world = two_sided_world(9, 9);
        // Walk the hero to the last column of its half, then try to cross.
        for _ in 0..4 {
            world
                .apply_server_event(&Event::HeroMove {
                    direction_x: 1,
                    direction_y: 0,
                    id: "hero0".into(),
                })
                .unwrap();
        }
        assert_eq!(world.heroes()[0].x, 128.0);

        world
            .apply_server_event(&Event::HeroMove {
                direction_x: 1,
                direction_y: 0,
                id: "hero0".into(),
            })
            .unwrap();
        assert_eq!(world.heroes()[0].x, 128.0, "crossed the midline");
    }

    #[test]
    fn server_rejects_client_only_event_kinds() {
        let world = two_sided_world(9, 9);
        let err = world
            .apply_server_event(&Event::CharacterAttack {
                x: 0.0,
                y: 0.0,
                atk: 10,
                speed_x: 2.0,
                speed_y: 0.0,
                rotation: 0.0,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            WorldError::UnsupportedEvent("CHARACTER_ATTACK")
        ));
    }

    #[test]
    fn targeted_attack_spawns_projectile_and_translates() {
        let world = two_sided_world(9, 0);
        let log = Arc::new(StdMutex::new(Vec::new()));
        world.add_observer(Arc::new(Recorder {
            tag: "net",
            log: log.clone(),
        }));

        world
            .apply_server_event(&Event::HeroAttack {
                id: "hero0".into(),
                x: 288.0,
                y: 0.0,
            })
            .unwrap();

        let projectiles = world.projectiles();
        assert_eq!(projectiles.len(), 1);
        assert!(!projectiles[0].targets_heroes());
        assert_eq!(*log.lock().unwrap(), vec!["net:CHARACTER_ATTACK"]);
    }

    #[test]
    fn client_move_repositions_without_grid_bookkeeping() {
        let world = two_sided_world(9, 9);
        world.apply_client_event(&Event::EnemyMove {
            direction_x: 0,
            direction_y: -1,
            id: "enemy0".into(),
        });
        let enemies = world.enemies();
        assert_eq!(enemies[0].y, 8.0 * 32.0);
        // The client trusts the server's validation and leaves the grid alone.
        assert_eq!(world.grid().get(9.0 * 32.0, 9.0 * 32.0), Cell::Occupied);
    }

    #[test]
    fn replayed_move_matches_the_local_delta() {
        // The same HERO_MOVE applied authoritatively and replayed on a copy
        // must land the mover on the same cell.
        let server = two_sided_world(9, 9);
        let client = World::from_snapshot(MatchConfig::default(), server.snapshot());

        let event = Event::HeroMove {
            direction_x: 1,
            direction_y: 0,
            id: "hero0".into(),
        };
        server.apply_server_event(&event).unwrap();
        client.apply_client_event(&event);

        assert_eq!(server.heroes()[0].x, client.heroes()[0].x);
        assert_eq!(server.heroes()[0].y, client.heroes()[0].y);
    }

    #[test]
    fn client_replays_targeted_attack_with_recomputed_trajectory() {
        let server = two_sided_world(9, 0);
        let client = World::from_snapshot(MatchConfig::default(), server.snapshot());

        let event = Event::HeroAttack {
            id: "hero0".into(),
            x: 288.0,
            y: 96.0,
        };
        server.apply_server_event(&event).unwrap();
        client.apply_client_event(&event);

        let on_server = server.projectiles();
        let on_client = client.projectiles();
        assert_eq!(on_client.len(), 1);
        assert_eq!(on_client[0].rotation, on_server[0].rotation);
        assert_eq!(on_client[0].speed_x, on_server[0].speed_x);
        assert_eq!(on_client[0].speed_y, on_server[0].speed_y);
    }

    #[test]
    fn tick_skips_dead_and_player_controlled_combatants() {
        let world = two_sided_world(9, 9);
        world.heroes.write().unwrap()[0].hp = 0;
        world.tick_combatant(Team::Hero, 0, &mut seeded());
        assert!(world.projectiles().is_empty());

        let world = two_sided_world(9, 9);
        world.heroes.write().unwrap()[0].controller = crate::entity::Controller::Player;
        world.tick_combatant(Team::Hero, 0, &mut seeded());
        assert!(world.projectiles().is_empty());
    }

    #[test]
    fn tick_fires_at_the_weakest_living_opponent() {
        let config = MatchConfig::default();
        let cell = config.cell_size;
        let mut grid = Grid::new(config.rows, config.cols, cell);
        let hero = Combatant::new("hero0".into(), Team::Hero, 0.0, 0.0, 100, 10);
        let strong = Combatant::new("enemy0".into(), Team::Enemy, 5.0 * cell, 0.0, 100, 10);
        let weak = Combatant::new("enemy1".into(), Team::Enemy, 5.0 * cell, 4.0 * cell, 40, 10);
        for c in [&hero, &strong, &weak] {
            grid.set(c.x, c.y, Cell::Occupied);
        }
        let world = World::from_snapshot(
            config.clone(),
            WorldSnapshot {
                heroes: vec![hero],
                enemies: vec![strong, weak],
                bullets: Vec::new(),
                map: grid,
            },
        );

        world.tick_combatant(Team::Hero, 0, &mut seeded());

        let projectiles = world.projectiles();
        assert_eq!(projectiles.len(), 1);
        // Aimed at enemy1's cell center, up and to the right of the shooter.
        assert!(projectiles[0].rotation > 0.0 && projectiles[0].rotation < 90.0);
    }

    #[test]
    fn roster_is_empty_only_when_all_are_dead() {
        let world = two_sided_world(9, 9);
        assert!(!world.is_roster_empty(Team::Enemy));
        world.enemies.write().unwrap()[0].hp = 0;
        assert!(world.is_roster_empty(Team::Enemy));
        assert!(!world.is_roster_empty(Team::Hero));
    }

    #[test]
    fn death_hook_fires_on_notify() {
        let world = two_sided_world(9, 9);
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = seen.clone();
        world.set_death_hook(Box::new(move |id| {
            sink.lock().unwrap().push(id.to_string());
        }));
        world.notify_death("enemy0");
        assert_eq!(*seen.lock().unwrap(), vec!["enemy0"]);
    }
}
