//! Player harvesting of resource nodes
//!
//! An interact press latches onto the nearest non-depleted node within
//! 80px. Progress accrues as dt over the node's harvest time; moving,
//! drifting past 100px, or the node dying cancels the session. One
//! completed session yields one batch.

use tracing::{debug, info};

use crate::ecs::components::Harvesting;
use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::economy::ResourceLedger;

const HARVEST_RANGE: f32 = 80.0;
const HARVEST_BREAK_RANGE: f32 = 100.0;

/// Latches onto the nearest harvestable node in range. False when none
/// is close enough or a session is already running.
pub fn try_begin_harvest(registry: &mut Registry, player: Entity) -> bool {
    if !registry.is_valid(player) || registry.harvestings.contains(player) {
        return false;
    }
    let player_pos = match registry.transforms.get(player) {
        Some(transform) => transform.position,
        None => return false,
    };

    let mut closest = Entity::null();
    let mut closest_dist_sq = HARVEST_RANGE * HARVEST_RANGE;
    let mut closest_position = player_pos;
    for (entity, node) in registry.resource_nodes.iter() {
        if node.depleted {
            continue;
        }
        let Some(transform) = registry.transforms.get(entity) else {
            continue;
        };
        let dist_sq = player_pos.distance_squared(&transform.position);
        if dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            closest = entity;
            closest_position = transform.position;
        }
    }

    if closest.is_null() {
        return false;
    }

    let harvest_time = registry
        .resource_nodes
        .get(closest)
        .map(|node| node.harvest_time)
        .unwrap_or(2.0);
    registry.insert(
        player,
        Harvesting {
            target_node: closest,
            progress: 0.0,
            harvest_time,
            node_position: closest_position,
        },
    );
    info!(node = closest.index(), harvest_time, "harvest started");
    true
}

pub fn cancel_harvest(registry: &mut Registry, player: Entity) {
    if registry.remove::<Harvesting>(player).is_some() {
        debug!("harvest cancelled");
    }
}

pub fn update_harvesting(
    registry: &mut Registry,
    player: Entity,
    dt: f32,
    ledger: &mut ResourceLedger,
    events: &mut Vec<SimEvent>,
) {
    if !registry.is_valid(player) {
        return;
    }
    let Some(harvesting) = registry.harvestings.get(player).cloned() else {
        return;
    };

    // The node is a weak reference; anything can have happened to it.
    let node_alive = registry.is_valid(harvesting.target_node)
        && registry
            .resource_nodes
            .get(harvesting.target_node)
            .is_some_and(|node| !node.depleted);
    if !node_alive {
        cancel_harvest(registry, player);
        return;
    }

    let node_pos = match registry.transforms.get(harvesting.target_node) {
        Some(transform) => transform.position,
        None => {
            cancel_harvest(registry, player);
            return;
        }
    };
    let player_pos = match registry.transforms.get(player) {
        Some(transform) => transform.position,
        None => return,
    };
    if player_pos.distance_squared(&node_pos) > HARVEST_BREAK_RANGE * HARVEST_BREAK_RANGE {
        cancel_harvest(registry, player);
        return;
    }

    let progress = harvesting.progress + dt / harvesting.harvest_time;
    if progress < 1.0 {
        if let Some(harvesting) = registry.harvestings.get_mut(player) {
            harvesting.progress = progress;
        }
        return;
    }

    // Completed: withdraw one batch, cap at what the node still holds.
    let node_entity = harvesting.target_node;
    let Some(node) = registry.resource_nodes.get_mut(node_entity) else {
        cancel_harvest(registry, player);
        return;
    };
    let yielded = node.harvest_amount.min(node.remaining);
    node.remaining -= yielded;
    let resource = node.resource;
    let exhausted = node.remaining <= 0;
    if exhausted {
        node.depleted = true;
        node.regen_timer = 0.0;
    }

    ledger.add(resource, yielded);
    events.push(SimEvent::HarvestCompleted {
        resource,
        amount: yielded,
    });
    info!(%resource, amount = yielded, "harvest completed");

    if exhausted {
        // Dim the sprite until regrowth restores it
        if let Some(sprite) = registry.sprites.get_mut(node_entity) {
            sprite.tint = [100, 100, 100, 255];
        }
        info!(node = node_entity.index(), "resource node depleted");
    }

    registry.remove::<Harvesting>(player);
}
