//! Damage resolution and death handling
//!
//! Buildings take damage on durability, everything else on health.
//! All damage flows through `apply_damage` so the effects, scrap income
//! and destruction bookkeeping stay in one place.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::economy::ResourceLedger;
use crate::systems::effects::EffectsPool;

#[allow(clippy::too_many_arguments)]
pub fn apply_damage(
    registry: &mut Registry,
    attacker: Entity,
    target: Entity,
    damage: f32,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    if !registry.is_valid(target) {
        return;
    }

    // Buildings track durability, not health.
    if let Some(building) = registry.buildings.get_mut(target) {
        building.durability -= damage;
        let durability = building.durability;
        let max_durability = building.max_durability;

        if let Some(transform) = registry.transforms.get(target) {
            effects.push_damage_number(transform.position, damage);
        }
        debug!(
            attacker = attacker.index(),
            target = target.index(),
            damage,
            durability,
            max_durability,
            "building damaged"
        );

        if durability <= 0.0 {
            handle_building_destruction(registry, target, effects, rng, events);
        }
        return;
    }

    let Some(health) = registry.healths.get_mut(target) else {
        return;
    };
    if health.invincible {
        return;
    }
    health.current = (health.current - damage).max(0.0);
    let died = health.is_dead();

    if let Some(transform) = registry.transforms.get(target) {
        effects.push_damage_number(transform.position, damage);
    }
    debug!(
        attacker = attacker.index(),
        target = target.index(),
        damage,
        "entity damaged"
    );

    if died {
        handle_death(registry, target, effects, ledger, rng, events);
    }
}

pub fn handle_death(
    registry: &mut Registry,
    entity: Entity,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    if !registry.is_valid(entity) {
        return;
    }

    // The player entity stays in the store; the embedder decides what a
    // game over means.
    if registry.players.contains(entity) {
        warn!("player died");
        return;
    }

    if let Some(zombie) = registry.zombies.get(entity) {
        let kind = zombie.kind;
        if let Some(transform) = registry.transforms.get(entity) {
            effects.push_death_burst(transform.position, rng);
        }
        let scrap: i64 = rng.gen_range(1..=3);
        ledger.add(crate::ecs::components::Resource::Scrap, scrap);
        events.push(SimEvent::ZombieKilled { kind, scrap });
        info!(entity = entity.index(), ?kind, scrap, "zombie killed");
    }

    registry.destroy(entity);
}

fn handle_building_destruction(
    registry: &mut Registry,
    entity: Entity,
    effects: &mut EffectsPool,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    if !registry.is_valid(entity) {
        return;
    }
    let kind = registry.buildings.get(entity).map(|b| b.kind);
    if let Some(transform) = registry.transforms.get(entity) {
        effects.push_death_burst(transform.position, rng);
    }
    if let Some(kind) = kind {
        events.push(SimEvent::BuildingDestroyed {
            building: entity,
            kind,
        });
        info!(entity = entity.index(), ?kind, "building destroyed");
    }
    registry.destroy(entity);
}

/// End-of-update sweep: everything dead that is not the player gets the
/// full death treatment.
pub fn sweep_dead(
    registry: &mut Registry,
    effects: &mut EffectsPool,
    ledger: &mut ResourceLedger,
    rng: &mut impl Rng,
    events: &mut Vec<SimEvent>,
) {
    let dead: Vec<Entity> = registry
        .healths
        .iter()
        .filter(|(entity, health)| health.is_dead() && !registry.players.contains(*entity))
        .map(|(entity, _)| entity)
        .collect();

    for entity in dead {
        handle_death(registry, entity, effects, ledger, rng, events);
    }
}
