//! Zombie behavior state machine
//!
//! Idle -> Patrol after a 3s dwell, any state -> Chase once the player
//! enters detection range, Chase -> Attack in melee range. A chasing
//! zombie that runs into finished fortifications while the player is far
//! away turns on the obstruction instead. Chase gives up at 1.5x the
//! detection radius (squared), Attack falls back to Chase at 1.5x the
//! attack radius (squared). Flee is reserved and does nothing yet.

use rand::Rng;

use crate::core::types::Vec2;
use crate::ecs::components::{Ai, AiState, Hostile, Zombie};
use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::combat;
use crate::systems::economy::ResourceLedger;
use crate::systems::effects::EffectsPool;

pub fn update_zombies(
    registry: &mut Registry,
    player: Entity,
    dt: f32,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    if !registry.is_valid(player) {
        return;
    }
    let player_pos = match registry.transforms.get(player) {
        Some(transform) => transform.position,
        None => return,
    };

    let zombie_entities: Vec<Entity> = registry
        .ais
        .entities()
        .into_iter()
        .filter(|&e| registry.has_all::<(Zombie, Hostile)>(e))
        .collect();

    for entity in zombie_entities {
        let position = match registry.transforms.get(entity) {
            Some(transform) => transform.position,
            None => continue,
        };
        let mut ai = match registry.ais.get(entity) {
            Some(ai) => ai.clone(),
            None => continue,
        };

        ai.state_timer += dt;

        let dist_sq = position.distance_squared(&player_pos);
        let detection_sq = ai.detection_range * ai.detection_range;
        let attack_sq = ai.attack_range * ai.attack_range;

        match ai.state {
            AiState::Idle => {
                if dist_sq < detection_sq {
                    ai.state = AiState::Chase;
                    ai.state_timer = 0.0;
                } else if ai.state_timer > 3.0 {
                    ai.state = AiState::Patrol;
                    ai.state_timer = 0.0;
                }
            }
            AiState::Patrol => {
                patrol_step(registry, entity, position, &mut ai, rng);
                if dist_sq < detection_sq {
                    ai.state = AiState::Chase;
                    ai.state_timer = 0.0;
                }
            }
            AiState::Chase => {
                let blocking = nearest_complete_building(registry, position, 100.0);
                if dist_sq < attack_sq {
                    ai.state = AiState::Attack;
                    ai.target = player;
                    ai.state_timer = 0.0;
                } else if !blocking.is_null() && dist_sq > 150.0 * 150.0 {
                    ai.state = AiState::Attack;
                    ai.target = blocking;
                    ai.state_timer = 0.0;
                } else if dist_sq > detection_sq * 1.5 {
                    ai.state = AiState::Idle;
                    ai.target = Entity::null();
                    ai.state_timer = 0.0;
                    if let Some(velocity) = registry.velocities.get_mut(entity) {
                        velocity.velocity = Vec2::ZERO;
                    }
                } else {
                    let direction = (player_pos - position).normalize();
                    if let Some(velocity) = registry.velocities.get_mut(entity) {
                        velocity.velocity = direction * ai.move_speed;
                    }
                }
            }
            AiState::Attack => {
                attack_step(
                    registry, entity, position, &mut ai, attack_sq, effects, ledger, rng, events,
                );
            }
            AiState::Flee => {}
        }

        registry.ais.insert(entity, ai);
    }
}

#[allow(clippy::too_many_arguments)]
fn attack_step(
    registry: &mut Registry,
    entity: Entity,
    position: Vec2,
    ai: &mut Ai,
    attack_sq: f32,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    // The target is a weak reference; it may have died this frame.
    if !registry.is_valid(ai.target) {
        ai.state = AiState::Chase;
        ai.target = Entity::null();
        ai.state_timer = 0.0;
        return;
    }
    let target_pos = match registry.transforms.get(ai.target) {
        Some(transform) => transform.position,
        None => {
            ai.state = AiState::Chase;
            ai.target = Entity::null();
            return;
        }
    };

    let target_dist_sq = position.distance_squared(&target_pos);
    if target_dist_sq > attack_sq * 1.5 {
        ai.state = AiState::Chase;
        ai.target = Entity::null();
        ai.state_timer = 0.0;
        return;
    }

    if ai.state_timer >= ai.attack_cooldown {
        let damage = registry
            .combats
            .get(entity)
            .map(|combat| combat.attack_damage)
            .unwrap_or(0.0);
        if damage > 0.0 {
            combat::apply_damage(
                registry, entity, ai.target, damage, effects, ledger, rng, events,
            );
        }
        ai.state_timer = 0.0;
    }
    // Planted while swinging
    if let Some(velocity) = registry.velocities.get_mut(entity) {
        velocity.velocity = Vec2::ZERO;
    }
}

fn patrol_step(
    registry: &mut Registry,
    entity: Entity,
    position: Vec2,
    ai: &mut Ai,
    rng: &mut impl Rng,
) {
    let Some(patrol) = registry.patrols.get_mut(entity) else {
        return;
    };

    if patrol.waypoints.is_empty() {
        // No route assigned: wander at half speed, re-rolling the heading
        // every couple of seconds.
        if ai.state_timer > 2.0 {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let heading = Vec2::new(angle.cos(), angle.sin());
            if let Some(velocity) = registry.velocities.get_mut(entity) {
                velocity.velocity = heading * (ai.move_speed * 0.5);
            }
            ai.state_timer = 0.0;
        }
        return;
    }

    let mut target = patrol.waypoints[patrol.current_waypoint];
    let arrival_sq = patrol.arrival_radius * patrol.arrival_radius;
    if position.distance_squared(&target) < arrival_sq {
        patrol.current_waypoint = (patrol.current_waypoint + 1) % patrol.waypoints.len();
        target = patrol.waypoints[patrol.current_waypoint];
    }

    let direction = (target - position).normalize();
    if let Some(velocity) = registry.velocities.get_mut(entity) {
        velocity.velocity = direction * (ai.move_speed * 0.5);
    }
}

/// Nearest finished building within `max_range`, or null. Ties resolve to
/// the earlier entry in pool order, which is stable for a given spawn
/// history.
fn nearest_complete_building(registry: &Registry, position: Vec2, max_range: f32) -> Entity {
    let mut nearest = Entity::null();
    let mut nearest_dist_sq = max_range * max_range;

    for (entity, building) in registry.buildings.iter() {
        if !building.complete || !registry.colliders.contains(entity) {
            continue;
        }
        let Some(transform) = registry.transforms.get(entity) else {
            continue;
        };
        let dist_sq = position.distance_squared(&transform.position);
        if dist_sq < nearest_dist_sq {
            nearest_dist_sq = dist_sq;
            nearest = entity;
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::ZombieKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixtures() -> (EffectsPool, ResourceLedger, ChaCha8Rng, Vec<SimEvent>) {
        (
            EffectsPool::new(),
            ResourceLedger::new(),
            ChaCha8Rng::seed_from_u64(7),
            Vec::new(),
        )
    }

    #[test]
    fn test_zombie_chases_player_in_detection_range() {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::new(100.0, 100.0));
        let zombie = registry.spawn_zombie(Vec2::new(150.0, 100.0), ZombieKind::Normal);

        let (mut fx, mut ledger, mut rng, mut events) = fixtures();
        update_zombies(
            &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
        );

        let ai = registry.ais.get(zombie).unwrap();
        assert_eq!(ai.state, AiState::Chase, "player at 50px is inside 200px detection");

        // Next tick it should be moving toward the player
        update_zombies(
            &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
        );
        let velocity = registry.velocities.get(zombie).unwrap();
        assert!(velocity.velocity.x < 0.0, "zombie should head west toward the player");
    }

    #[test]
    fn test_zombie_gives_up_beyond_escape_radius() {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::new(1000.0, 100.0));
        let zombie = registry.spawn_zombie(Vec2::new(100.0, 100.0), ZombieKind::Normal);
        registry.ais.get_mut(zombie).unwrap().state = AiState::Chase;

        let (mut fx, mut ledger, mut rng, mut events) = fixtures();
        update_zombies(
            &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
        );

        let ai = registry.ais.get(zombie).unwrap();
        assert_eq!(ai.state, AiState::Idle, "900px is well past 1.5x detection^2");
        assert!(ai.target.is_null());
        assert_eq!(registry.velocities.get(zombie).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_attack_state_damages_player_on_cooldown() {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::new(100.0, 100.0));
        let zombie = registry.spawn_zombie(Vec2::new(120.0, 100.0), ZombieKind::Normal);
        {
            let ai = registry.ais.get_mut(zombie).unwrap();
            ai.state = AiState::Attack;
            ai.target = player;
            ai.state_timer = 2.0; // past the 1.5s cooldown
        }

        let (mut fx, mut ledger, mut rng, mut events) = fixtures();
        update_zombies(
            &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
        );

        let health = registry.healths.get(player).unwrap();
        assert_eq!(health.current, 90.0, "normal zombie hits for 10");
        assert_eq!(
            registry.ais.get(zombie).unwrap().state_timer,
            0.0,
            "cooldown restarts after the swing"
        );
    }

    #[test]
    fn test_attack_reverts_to_chase_when_target_destroyed() {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::new(500.0, 500.0));
        let zombie = registry.spawn_zombie(Vec2::new(100.0, 100.0), ZombieKind::Normal);
        let wall = registry.spawn_building(Vec2::new(110.0, 100.0), crate::ecs::components::BuildingKind::Wall);
        {
            let ai = registry.ais.get_mut(zombie).unwrap();
            ai.state = AiState::Attack;
            ai.target = wall;
        }
        registry.destroy(wall);

        let (mut fx, mut ledger, mut rng, mut events) = fixtures();
        update_zombies(
            &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
        );

        let ai = registry.ais.get(zombie).unwrap();
        assert_eq!(ai.state, AiState::Chase, "stale target must drop back to chase");
        assert!(ai.target.is_null());
    }

    #[test]
    fn test_idle_zombie_starts_patrolling_after_dwell() {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::new(2000.0, 2000.0));
        let zombie = registry.spawn_zombie(Vec2::new(100.0, 100.0), ZombieKind::Normal);
        registry.ais.get_mut(zombie).unwrap().state = AiState::Idle;

        let (mut fx, mut ledger, mut rng, mut events) = fixtures();
        // 3.1 seconds of idling
        for _ in 0..194 {
            update_zombies(
                &mut registry, player, 0.016, &mut fx, &mut ledger, &mut rng, &mut events,
            );
        }

        assert_eq!(registry.ais.get(zombie).unwrap().state, AiState::Patrol);
    }
}
