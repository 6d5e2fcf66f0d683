// Domain-level simulation entities: combatants and projectiles.

use crate::config::MatchConfig;
use serde::{Deserialize, Serialize};

/// Projectiles start with a token health pool; a hit forces it to zero so the
/// cleanup pass can treat "spent" and "out of bounds" uniformly.
pub const PROJECTILE_HP: i32 = 99;

/// Direction table for the random-step policy. Overlapping pairs: index d in
/// 0..=4 reads (table[d], table[d + 1]), yielding stay/east/north/west/south.
pub const STEPS: [i32; 6] = [0, 0, 1, 0, -1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Hero,
    Enemy,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Hero => Team::Enemy,
            Team::Enemy => Team::Hero,
        }
    }
}

/// Who decides a combatant's actions. A plain data field instead of a class
/// hierarchy: the tick scheduler only drives `Autonomous` combatants, player
/// input drives `Player`, and replicated events drive `Remote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Autonomous,
    Player,
    Remote,
}

/// Axis-aligned bounding box used for projectile collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// A hero- or enemy-side fighter. Positions are cell-aligned world units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: String,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub atk: i32,
    pub controller: Controller,
}

impl Combatant {
    pub fn new(id: String, team: Team, x: f32, y: f32, hp: i32, atk: i32) -> Self {
        Self {
            id,
            team,
            x,
            y,
            hp,
            atk,
            controller: Controller::Autonomous,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_autonomous(&self) -> bool {
        self.controller == Controller::Autonomous
    }

    pub fn center(&self, cell_size: f32) -> (f32, f32) {
        (self.x + cell_size / 2.0, self.y + cell_size / 2.0)
    }

    pub fn bound(&self, cell_size: f32) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: cell_size,
            h: cell_size,
        }
    }

    /// Fires a projectile from this combatant's cell center toward a world
    /// point. The heading is kept in degrees because the collision pass picks
    /// its target roster from the heading's half-plane.
    pub fn fire_at(&self, target_x: f32, target_y: f32, config: &MatchConfig) -> Projectile {
        let rotation = (target_y - self.y).atan2(target_x - self.x).to_degrees();
        let speed_x = rotation.to_radians().cos() * config.bullet_speed;
        let speed_y = rotation.to_radians().sin() * config.bullet_speed;
        let (x, y) = self.center(config.cell_size);
        Projectile {
            x,
            y,
            hp: PROJECTILE_HP,
            atk: self.atk,
            speed_x,
            speed_y,
            rotation,
        }
    }
}

/// Index of the living opponent with the lowest health, first encountered
/// winning ties. `None` when every opponent is dead.
pub fn lowest_hp_target(roster: &[Combatant]) -> Option<usize> {
    let mut best = None;
    let mut min_hp = i32::MAX;
    for (index, combatant) in roster.iter().enumerate() {
        if !combatant.is_dead() && combatant.hp < min_hp {
            min_hp = combatant.hp;
            best = Some(index);
        }
    }
    best
}

/// A short-lived constant-velocity shot.
///
/// Which roster it can damage is decided by the stored heading sign at fire
/// time (left half-plane headings travel toward the hero half), not by
/// re-checking the shooter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub atk: i32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub rotation: f32,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.x += self.speed_x;
        self.y += self.speed_y;
    }

    /// Headings past +/-90 degrees point into the hero half of the map.
    pub fn targets_heroes(&self) -> bool {
        self.rotation > 90.0 || self.rotation < -90.0
    }

    pub fn bound(&self, size: f32) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: size,
            h: size,
        }
    }

    /// Dead once spent on a hit or once its footprint center leaves the map.
    pub fn is_dead(&self, config: &MatchConfig) -> bool {
        let cx = self.x + config.projectile_size / 2.0;
        let cy = self.y + config.projectile_size / 2.0;
        cx < 0.0
            || cx > config.map_width()
            || cy < 0.0
            || cy > config.map_height()
            || self.hp <= 0
    }
}
