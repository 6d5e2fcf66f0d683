// Replicated world events and the observer seam between simulation and
// networking. Events are the only way state changes cross the wire.

use crate::entity::Team;
use serde::{Deserialize, Serialize};

/// The closed set of replicated events. The wire discriminator is the `type`
/// field; everything else is camelCase to match the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// One validated cell step by a hero.
    #[serde(rename = "HERO_MOVE", rename_all = "camelCase")]
    HeroMove {
        direction_x: i32,
        direction_y: i32,
        id: String,
    },
    /// One validated cell step by an enemy.
    #[serde(rename = "ENEMY_MOVE", rename_all = "camelCase")]
    EnemyMove {
        direction_x: i32,
        direction_y: i32,
        id: String,
    },
    /// A fired projectile, fully described so the receiver can spawn it as-is.
    #[serde(rename = "CHARACTER_ATTACK", rename_all = "camelCase")]
    CharacterAttack {
        x: f32,
        y: f32,
        atk: i32,
        speed_x: f32,
        speed_y: f32,
        rotation: f32,
    },
    /// A player's click-to-attack request; the receiver recomputes the
    /// trajectory from the named hero's position.
    #[serde(rename = "HERO_ATTACK")]
    HeroAttack { id: String, x: f32, y: f32 },
}

impl Event {
    /// Builds the side-appropriate move event for a validated step.
    pub fn step(team: Team, direction_x: i32, direction_y: i32, id: String) -> Event {
        debug_assert!((-1..=1).contains(&direction_x) && (-1..=1).contains(&direction_y));
        match team {
            Team::Hero => Event::HeroMove {
                direction_x,
                direction_y,
                id,
            },
            Team::Enemy => Event::EnemyMove {
                direction_x,
                direction_y,
                id,
            },
        }
    }

    /// Wire discriminator, for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::HeroMove { .. } => "HERO_MOVE",
            Event::EnemyMove { .. } => "ENEMY_MOVE",
            Event::CharacterAttack { .. } => "CHARACTER_ATTACK",
            Event::HeroAttack { .. } => "HERO_ATTACK",
        }
    }
}

/// Registered on the world and invoked synchronously, in registration order,
/// for every published event. Implementations match on the closed `Event`
/// enum, so a new event kind is a compile error for every observer.
pub trait Observer: Send + Sync {
    fn handle_event(&self, event: &Event);
}
