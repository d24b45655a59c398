//! Stockpile ledger, producer buildings and resource node regrowth

use ahash::AHashMap;
use tracing::{debug, info, warn};

use crate::ecs::components::Resource;
use crate::ecs::Registry;
use crate::sim::SimEvent;

/// Global stockpile. Amounts never go negative: deposits must be
/// positive, withdrawals are all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    amounts: AHashMap<Resource, i64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_starting_stock(wood: i64, metal: i64, food: i64, scrap: i64) -> Self {
        let mut ledger = Self::new();
        ledger.add(Resource::Wood, wood);
        ledger.add(Resource::Metal, metal);
        ledger.add(Resource::Food, food);
        ledger.add(Resource::Scrap, scrap);
        info!(wood, metal, food, scrap, "starting stockpile initialized");
        ledger
    }

    /// Deposits; non-positive amounts are ignored.
    pub fn add(&mut self, resource: Resource, amount: i64) {
        if amount <= 0 {
            return;
        }
        let total = self.amounts.entry(resource).or_insert(0);
        *total += amount;
        debug!(%resource, amount, total = *total, "stockpile deposit");
    }

    /// All-or-nothing withdrawal.
    pub fn remove(&mut self, resource: Resource, amount: i64) -> bool {
        if amount <= 0 {
            return true;
        }
        if !self.has(resource, amount) {
            warn!(
                %resource,
                needed = amount,
                have = self.amount(resource),
                "insufficient stock"
            );
            return false;
        }
        *self.amounts.get_mut(&resource).unwrap() -= amount;
        true
    }

    pub fn has(&self, resource: Resource, amount: i64) -> bool {
        self.amount(resource) >= amount
    }

    pub fn amount(&self, resource: Resource) -> i64 {
        self.amounts.get(&resource).copied().unwrap_or(0)
    }
}

/// Advances producer timers on finished buildings. A completed interval
/// resets the timer to zero, discarding any surplus from a slow frame.
pub fn tick_producers(
    registry: &mut Registry,
    dt: f32,
    ledger: &mut ResourceLedger,
    events: &mut Vec<SimEvent>,
) {
    for (entity, producer) in registry.producers.iter_mut() {
        let complete = registry
            .buildings
            .get(entity)
            .is_some_and(|building| building.complete);
        if !complete || !producer.active {
            continue;
        }

        producer.timer += dt;
        if producer.timer >= producer.interval {
            producer.timer = 0.0;
            ledger.add(producer.resource, producer.amount);
            events.push(SimEvent::Production {
                building: entity,
                resource: producer.resource,
                amount: producer.amount,
            });
            debug!(
                building = entity.index(),
                resource = %producer.resource,
                amount = producer.amount,
                "production completed"
            );
        }
    }
}

/// Regrows depleted nodes: one shot back to full once the regen timer
/// elapses. Nodes with a zero regen time never come back.
pub fn tick_node_regen(registry: &mut Registry, dt: f32) {
    for (entity, node) in registry.resource_nodes.iter_mut() {
        if !node.depleted || node.regen_time <= 0.0 {
            continue;
        }
        node.regen_timer += dt;
        if node.regen_timer >= node.regen_time {
            node.regen_timer = 0.0;
            node.remaining = node.maximum;
            node.depleted = false;
            if let Some(sprite) = registry.sprites.get_mut(entity) {
                sprite.tint = [255, 255, 255, 255];
            }
            info!(entity = entity.index(), resource = %node.resource, "resource node regrown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::ecs::components::BuildingKind;

    #[test]
    fn test_ledger_withdrawal_is_atomic() {
        let mut ledger = ResourceLedger::with_starting_stock(100, 50, 20, 0);
        assert!(!ledger.remove(Resource::Metal, 60), "short stock must refuse");
        assert_eq!(ledger.amount(Resource::Metal), 50, "refused withdrawal changes nothing");

        assert!(ledger.remove(Resource::Metal, 50));
        assert_eq!(ledger.amount(Resource::Metal), 0);
    }

    #[test]
    fn test_ledger_ignores_non_positive_deposits() {
        let mut ledger = ResourceLedger::new();
        ledger.add(Resource::Wood, -5);
        ledger.add(Resource::Wood, 0);
        assert_eq!(ledger.amount(Resource::Wood), 0);
    }

    #[test]
    fn test_unknown_resource_reads_zero() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.amount(Resource::Electricity), 0);
        assert!(ledger.has(Resource::Electricity, 0));
        assert!(!ledger.has(Resource::Electricity, 1));
    }

    #[test]
    fn test_producer_requires_finished_building() {
        let mut registry = Registry::new();
        let farm = registry.spawn_building(Vec2::ZERO, BuildingKind::Farm);
        let mut ledger = ResourceLedger::new();
        let mut events = Vec::new();

        tick_producers(&mut registry, 11.0, &mut ledger, &mut events);
        assert_eq!(ledger.amount(Resource::Food), 0, "a construction site produces nothing");

        registry.buildings.get_mut(farm).unwrap().complete = true;
        tick_producers(&mut registry, 11.0, &mut ledger, &mut events);
        assert_eq!(ledger.amount(Resource::Food), 2, "farm yields 2 food per interval");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_producer_timer_reset_discards_surplus() {
        let mut registry = Registry::new();
        let farm = registry.spawn_building(Vec2::ZERO, BuildingKind::Farm);
        registry.buildings.get_mut(farm).unwrap().complete = true;
        let mut ledger = ResourceLedger::new();
        let mut events = Vec::new();

        // One huge frame still yields a single batch and a zeroed timer
        tick_producers(&mut registry, 25.0, &mut ledger, &mut events);
        assert_eq!(ledger.amount(Resource::Food), 2);
        assert_eq!(registry.producers.get(farm).unwrap().timer, 0.0);
    }

    #[test]
    fn test_depleted_node_regrows_to_full() {
        let mut registry = Registry::new();
        let tree = registry.spawn_resource_node(Vec2::ZERO, Resource::Wood, 50);
        {
            let node = registry.resource_nodes.get_mut(tree).unwrap();
            node.remaining = 0;
            node.depleted = true;
        }
        registry.sprites.get_mut(tree).unwrap().tint = [100, 100, 100, 255];

        tick_node_regen(&mut registry, 119.0);
        assert!(registry.resource_nodes.get(tree).unwrap().depleted, "not yet");

        tick_node_regen(&mut registry, 2.0);
        let node = registry.resource_nodes.get(tree).unwrap();
        assert!(!node.depleted);
        assert_eq!(node.remaining, 50, "regrowth is a one-shot full refill");
        assert_eq!(
            registry.sprites.get(tree).unwrap().tint,
            [255, 255, 255, 255],
            "sprite tint restored"
        );
    }
}
