//! Building placement and construction
//!
//! Placement runs as a session: start it with a kind, feed it preview
//! positions, then try to commit. The commit re-validates position and
//! cost and is atomic: either the resources are spent and the building
//! exists, or nothing changed. A failed commit keeps the session open so
//! the player can adjust and retry.

use tracing::{debug, info, warn};

use crate::core::error::{GameError, Result};
use crate::core::types::{Rect, Vec2};
use crate::ecs::components::{BuildingKind, Hostile, Player, Resource};
use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::economy::ResourceLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCost {
    pub wood: i64,
    pub metal: i64,
}

pub fn building_cost(kind: BuildingKind) -> BuildCost {
    let (wood, metal) = match kind {
        BuildingKind::Wall => (10, 0),
        BuildingKind::Turret => (20, 30),
        BuildingKind::Gate => (15, 10),
        BuildingKind::Workshop => (50, 40),
        BuildingKind::Storage => (40, 20),
        BuildingKind::Farm => (60, 0),
        BuildingKind::House => (80, 30),
        BuildingKind::Generator => (30, 50),
    };
    BuildCost { wood, metal }
}

pub fn building_size(kind: BuildingKind) -> Vec2 {
    match kind {
        BuildingKind::Wall | BuildingKind::Gate | BuildingKind::Generator => Vec2::new(64.0, 64.0),
        BuildingKind::Turret => Vec2::new(48.0, 48.0),
        BuildingKind::Workshop | BuildingKind::House => Vec2::new(96.0, 96.0),
        BuildingKind::Storage => Vec2::new(80.0, 80.0),
        BuildingKind::Farm => Vec2::new(128.0, 128.0),
    }
}

/// True when the footprint overlaps nothing it may not. Player and
/// hostiles are ignored; they can step aside.
pub fn placement_clear(registry: &Registry, kind: BuildingKind, position: Vec2) -> bool {
    let footprint = Rect::from_center(position, building_size(kind));
    for (entity, collider) in registry.colliders.iter() {
        if registry.has_any::<(Player, Hostile)>(entity) {
            continue;
        }
        let Some(transform) = registry.transforms.get(entity) else {
            continue;
        };
        let bounds = Rect::from_center(transform.position, collider.size);
        if footprint.intersects(&bounds) {
            return false;
        }
    }
    true
}

#[derive(Debug, Clone, Copy)]
pub struct Preview {
    pub kind: BuildingKind,
    pub position: Vec2,
    pub valid: bool,
}

#[derive(Debug, Default)]
pub struct PlacementSession {
    active: Option<Preview>,
}

impl PlacementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, kind: BuildingKind) {
        self.active = Some(Preview {
            kind,
            position: Vec2::ZERO,
            valid: false,
        });
        debug!(?kind, "placement started");
    }

    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("placement cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.active.as_ref()
    }

    /// Moves the ghost and refreshes its validity (clear ground + funds).
    pub fn update_preview(
        &mut self,
        position: Vec2,
        registry: &Registry,
        ledger: &ResourceLedger,
    ) {
        let Some(preview) = self.active.as_mut() else {
            return;
        };
        preview.position = position;
        let cost = building_cost(preview.kind);
        preview.valid = placement_clear(registry, preview.kind, position)
            && ledger.has(Resource::Wood, cost.wood)
            && ledger.has(Resource::Metal, cost.metal);
    }

    /// Commits the placement at the current preview position. On any
    /// failure nothing is charged and the session stays open for retry.
    pub fn try_place(
        &mut self,
        registry: &mut Registry,
        ledger: &mut ResourceLedger,
        events: &mut Vec<SimEvent>,
    ) -> Result<Entity> {
        let Some(preview) = self.active else {
            return Err(GameError::InvalidPlacement(
                "no placement in progress".to_string(),
            ));
        };

        if !placement_clear(registry, preview.kind, preview.position) {
            warn!(kind = ?preview.kind, "placement blocked by overlap");
            return Err(GameError::InvalidPlacement(format!(
                "footprint obstructed at ({:.0}, {:.0})",
                preview.position.x, preview.position.y
            )));
        }

        let cost = building_cost(preview.kind);
        if !ledger.has(Resource::Wood, cost.wood) || !ledger.has(Resource::Metal, cost.metal) {
            warn!(
                kind = ?preview.kind,
                need_wood = cost.wood,
                need_metal = cost.metal,
                have_wood = ledger.amount(Resource::Wood),
                have_metal = ledger.amount(Resource::Metal),
                "placement unaffordable"
            );
            return Err(GameError::InsufficientResources(format!(
                "need {}W/{}M",
                cost.wood, cost.metal
            )));
        }
        ledger.remove(Resource::Wood, cost.wood);
        ledger.remove(Resource::Metal, cost.metal);

        let building = registry.spawn_building(preview.position, preview.kind);
        events.push(SimEvent::BuildingPlaced {
            building,
            kind: preview.kind,
        });
        info!(kind = ?preview.kind, entity = building.index(), "building placed");

        self.active = None;
        Ok(building)
    }
}

/// Sites build themselves at half progress per second.
pub fn tick_construction(registry: &mut Registry, dt: f32, events: &mut Vec<SimEvent>) {
    for (entity, building) in registry.buildings.iter_mut() {
        if building.complete || building.construction_progress >= 1.0 {
            continue;
        }
        building.construction_progress += dt * 0.5;
        if building.construction_progress >= 1.0 {
            building.construction_progress = 1.0;
            building.complete = true;
            events.push(SimEvent::BuildingCompleted {
                building: entity,
                kind: building.kind,
            });
            info!(entity = entity.index(), kind = ?building.kind, "building completed");
        }
    }
}
