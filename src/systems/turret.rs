//! Turret targeting and fire control
//!
//! Only finished turret buildings fire. The cached target is a weak
//! reference revalidated every tick; when it lapses the turret scans for
//! the nearest living hostile in range.

use rand::Rng;
use tracing::debug;

use crate::core::types::Vec2;
use crate::ecs::components::BuildingKind;
use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::combat;
use crate::systems::economy::ResourceLedger;
use crate::systems::effects::EffectsPool;

pub fn update_turrets(
    registry: &mut Registry,
    dt: f32,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    let turret_entities: Vec<Entity> = registry
        .turrets
        .entities()
        .into_iter()
        .filter(|&e| {
            registry
                .buildings
                .get(e)
                .is_some_and(|b| b.complete && b.kind == BuildingKind::Turret)
        })
        .collect();

    for entity in turret_entities {
        update_turret(registry, entity, dt, effects, ledger, rng, events);
    }
}

#[allow(clippy::too_many_arguments)]
fn update_turret(
    registry: &mut Registry,
    entity: Entity,
    dt: f32,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    let position = match registry.transforms.get(entity) {
        Some(transform) => transform.position,
        None => return,
    };
    let mut turret = match registry.turrets.get(entity) {
        Some(turret) => turret.clone(),
        None => return,
    };

    if turret.attack_cooldown > 0.0 {
        turret.attack_cooldown -= dt;
    }

    // Revalidate the cached target: alive, still has health, in range.
    if registry.is_valid(turret.current_target) {
        let health_ok = registry
            .healths
            .get(turret.current_target)
            .is_some_and(|h| !h.is_dead());
        let target_pos = registry
            .transforms
            .get(turret.current_target)
            .map(|t| t.position);
        match (health_ok, target_pos) {
            (true, Some(pos)) => {
                if position.distance_squared(&pos) > turret.range * turret.range {
                    turret.current_target = Entity::null();
                }
            }
            _ => turret.current_target = Entity::null(),
        }
    } else {
        turret.current_target = Entity::null();
    }

    if turret.current_target.is_null() {
        turret.current_target = find_nearest_hostile(registry, position, turret.range);
    }

    if !turret.current_target.is_null() && turret.attack_cooldown <= 0.0 {
        if let Some(target_pos) = registry
            .transforms
            .get(turret.current_target)
            .map(|t| t.position)
        {
            effects.push_attack_line(position, target_pos);
            registry.spawn_bullet(position, target_pos, entity);
            combat::apply_damage(
                registry,
                entity,
                turret.current_target,
                turret.damage,
                effects,
                ledger,
                rng,
                events,
            );
            debug!(
                turret = entity.index(),
                target = turret.current_target.index(),
                damage = turret.damage,
                "turret fired"
            );
        }
        turret.attack_cooldown = 1.0 / turret.attack_speed;

        // The shot may have killed the target.
        if !registry.is_valid(turret.current_target)
            || registry
                .healths
                .get(turret.current_target)
                .is_some_and(|h| h.is_dead())
        {
            turret.current_target = Entity::null();
        }
    }

    registry.turrets.insert(entity, turret);
}

/// Nearest living hostile within `range`, or null. Equidistant candidates
/// resolve to the earlier entry in pool order, which is stable for a
/// given spawn history, so a seeded run reproduces its target choices.
fn find_nearest_hostile(registry: &Registry, position: Vec2, range: f32) -> Entity {
    let mut nearest = Entity::null();
    let mut nearest_dist_sq = range * range;

    for entity in registry.hostiles.entities() {
        let Some(health) = registry.healths.get(entity) else {
            continue;
        };
        if health.is_dead() {
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
