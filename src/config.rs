// Runtime/server constants (not gameplay tuning).

use std::{env, time::Duration};

pub fn server_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7878)
}

pub fn server_host() -> String {
    env::var("ARENA_SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Size of the scratch buffer used for socket reads. Large enough to hold a
/// full world snapshot in one read during the handshake.
pub const READ_BUFFER_SIZE: usize = 16 * 1024;

/// Gameplay parameters for one match.
///
/// Constructed once before a match starts and never mutated afterwards;
/// constructors that need these values take the config explicitly. A new map
/// size means a new config and a new world.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Cell count along the x axis.
    pub rows: u32,
    /// Cell count along the y axis.
    pub cols: u32,
    /// Edge length of one grid cell in world units.
    pub cell_size: f32,
    pub hero_count: usize,
    pub enemy_count: usize,
    pub hero_hp: i32,
    pub hero_atk: i32,
    pub enemy_hp: i32,
    pub enemy_atk: i32,
    /// Projectile displacement per advance pass, in world units.
    pub bullet_speed: f32,
    /// Collision footprint edge length for projectiles.
    pub projectile_size: f32,
    /// Base period for combatant ticks.
    pub tick_interval: Duration,
    pub max_connections: usize,
    /// Pause after protocol milestones so every peer finishes local setup.
    pub settle_delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let rows = 10;
        let cols = 10;
        Self {
            rows,
            cols,
            cell_size: 32.0,
            hero_count: ((rows + cols) / 4) as usize,
            enemy_count: ((rows + cols) / 4) as usize,
            hero_hp: 100,
            hero_atk: 10,
            enemy_hp: 100,
            enemy_atk: 10,
            bullet_speed: 2.0,
            projectile_size: 8.0,
            tick_interval: Duration::from_millis(2000),
            max_connections: 2,
            settle_delay: Duration::from_secs(1),
        }
    }
}

impl MatchConfig {
    /// Config for a hosted multiplayer match: one hero slot per connection,
    /// so every hero is claimed by a peer and none is left to idle.
    pub fn multiplayer(max_connections: usize) -> Self {
        Self {
            hero_count: max_connections,
            max_connections,
            ..Self::default()
        }
    }

    pub fn map_width(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    pub fn map_height(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    /// The hero half of the map is every cell column left of this index.
    pub fn mid_column(&self) -> u32 {
        self.rows / 2
    }

    /// Projectiles advance much faster than combatants think.
    pub fn projectile_interval(&self) -> Duration {
        self.tick_interval / 40
    }

    /// How long scheduler shutdown waits before force-cancelling tasks.
    pub fn shutdown_grace(&self) -> Duration {
        self.tick_interval / 10
    }
}
