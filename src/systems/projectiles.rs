// Projectile advance and collision resolution. Runs as one recurring
// scheduler task at the fast interval, against the shared world.

use crate::entity::Team;
use crate::world::World;
use tracing::info;

/// Advances every live projectile by its velocity, resolves first-hit
/// collisions against the roster its heading points at, and removes the dead
/// in one batch at the end.
pub fn advance(world: &World) {
    let config = world.config().clone();
    let mut died = Vec::new();

    let mut projectiles = world.projectiles();
    for projectile in projectiles.iter_mut() {
        if projectile.hp <= 0 {
            // Spent on a previous pass; the retain below collects it.
            continue;
        }
        projectile.advance();

        // The stored heading decides the target roster, not the shooter.
        let side = if projectile.targets_heroes() {
            Team::Hero
        } else {
            Team::Enemy
        };
        let mut roster = world.roster(side).write().expect("roster lock poisoned");
        for target in roster.iter_mut() {
            if target.is_dead() {
                continue;
            }
            if target
                .bound(config.cell_size)
                .overlaps(&projectile.bound(config.projectile_size))
            {
                target.hp -= projectile.atk;
                projectile.hp = 0;
                info!(target = %target.id, hp = target.hp, "projectile hit");
                if target.is_dead() {
                    died.push(target.id.clone());
                }
                break;
            }
        }
    }
    projectiles.retain(|p| !p.is_dead(&config));
    drop(projectiles);

    for id in died {
        world.notify_death(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::entity::{Combatant, PROJECTILE_HP, Projectile};
    use crate::grid::{Cell, Grid};
    use crate::world::WorldSnapshot;
    use std::sync::{Arc, Mutex};

    fn world_with(
        heroes: Vec<Combatant>,
        enemies: Vec<Combatant>,
        bullets: Vec<Projectile>,
    ) -> Arc<World> {
        let config = MatchConfig::default();
        let mut map = Grid::new(config.rows, config.cols, config.cell_size);
        for c in heroes.iter().chain(enemies.iter()) {
            map.set(c.x, c.y, Cell::Occupied);
        }
        World::from_snapshot(
            config,
            WorldSnapshot {
                heroes,
                enemies,
                bullets,
                map,
            },
        )
    }

    fn hero(id: &str, x: f32, y: f32) -> Combatant {
        Combatant::new(id.into(), Team::Hero, x, y, 100, 10)
    }

    fn enemy(id: &str, x: f32, y: f32) -> Combatant {
        Combatant::new(id.into(), Team::Enemy, x, y, 100, 10)
    }

    fn rightward(x: f32, y: f32, atk: i32) -> Projectile {
        Projectile {
            x,
            y,
            hp: PROJECTILE_HP,
            atk,
            speed_x: 2.0,
            speed_y: 0.0,
            rotation: 0.0,
        }
    }

    #[test]
    fn collision_damages_target_and_spends_projectile() {
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![enemy("enemy0", 160.0, 0.0)],
            vec![rightward(160.0, 8.0, 10)],
        );

        advance(&world);

        assert_eq!(world.enemies()[0].hp, 90);
        assert!(world.projectiles().is_empty(), "spent projectile lingers");
    }

    #[test]
    fn heading_sign_selects_the_roster() {
        // A leftward projectile sitting on top of an enemy must ignore it and
        // only ever damage heroes.
        let leftward = Projectile {
            x: 160.0,
            y: 8.0,
            hp: PROJECTILE_HP,
            atk: 10,
            speed_x: -2.0,
            speed_y: 0.0,
            rotation: 180.0,
        };
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![enemy("enemy0", 160.0, 0.0)],
            vec![leftward],
        );

        advance(&world);

        assert_eq!(world.enemies()[0].hp, 100);
        assert_eq!(world.projectiles().len(), 1);
    }

    #[test]
    fn first_overlap_wins_and_damage_is_applied_once() {
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![enemy("enemy0", 160.0, 0.0), enemy("enemy1", 160.0, 0.0)],
            vec![rightward(160.0, 8.0, 10)],
        );

        advance(&world);

        let enemies = world.enemies();
        assert_eq!(enemies[0].hp, 90);
        assert_eq!(enemies[1].hp, 100, "projectile hit more than one target");
    }

    #[test]
    fn dead_targets_are_skipped() {
        let mut corpse = enemy("enemy0", 160.0, 0.0);
        corpse.hp = 0;
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![corpse, enemy("enemy1", 160.0, 0.0)],
            vec![rightward(160.0, 8.0, 10)],
        );

        advance(&world);

        let enemies = world.enemies();
        assert_eq!(enemies[0].hp, 0);
        assert_eq!(enemies[1].hp, 90);
    }

    #[test]
    fn out_of_bounds_projectiles_are_removed_in_batch() {
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![enemy("enemy0", 288.0, 288.0)],
            vec![rightward(318.0, 128.0, 10), rightward(32.0, 128.0, 10)],
        );

        advance(&world);

        let projectiles = world.projectiles();
        assert_eq!(projectiles.len(), 1, "escaped projectile not collected");
        assert_eq!(projectiles[0].y, 128.0);
    }

    #[test]
    fn death_hook_fires_when_health_crosses_zero() {
        let mut weak = enemy("enemy0", 160.0, 0.0);
        weak.hp = 10;
        let world = world_with(
            vec![hero("hero0", 0.0, 0.0)],
            vec![weak],
            vec![rightward(160.0, 8.0, 10)],
        );
        let deaths = Arc::new(Mutex::new(Vec::new()));
        let sink = deaths.clone();
        world.set_death_hook(Box::new(move |id| {
            sink.lock().unwrap().push(id.to_string());
        }));

        advance(&world);

        assert_eq!(world.enemies()[0].hp, 0);
        assert_eq!(*deaths.lock().unwrap(), vec!["enemy0"]);
    }

    #[test]
    fn two_hits_from_point_blank_attacks_cost_twenty_health() {
        // Hero and enemy one cell apart: two attacks with atk 10 leave the
        // enemy at 80 with both projectiles spent.
        let world = world_with(
            vec![hero("hero0", 128.0, 0.0)],
            vec![enemy("enemy0", 160.0, 0.0)],
            vec![],
        );
        let config = world.config().clone();

        for _ in 0..2 {
            let shooter = world.heroes()[0].clone();
            let (tx, ty) = world.enemies()[0].center(config.cell_size);
            world.projectiles().push(shooter.fire_at(tx, ty, &config));
            for _ in 0..64 {
                if world.projectiles().is_empty() {
                    break;
                }
                advance(&world);
            }
        }

        assert_eq!(world.enemies()[0].hp, 80);
        assert!(world.projectiles().is_empty());
    }
}
