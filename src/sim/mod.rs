//! Simulation orchestration: the game world, the fixed frame pipeline,
//! and the read-only presentation snapshot.

pub mod snapshot;
pub mod world;

use crate::ecs::components::{BuildingKind, Resource, ZombieKind};
use crate::ecs::Entity;

pub use snapshot::Snapshot;
pub use world::{GameWorld, PlayerInput};

/// Events generated during a simulation step, returned for the
/// presentation layer to display or log.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    WaveStarted {
        wave: u32,
        normal: u32,
        fast: u32,
        tank: u32,
    },
    WaveCompleted {
        wave: u32,
    },
    /// A finished producer building completed an interval
    Production {
        building: Entity,
        resource: Resource,
        amount: i64,
    },
    BuildingPlaced {
        building: Entity,
        kind: BuildingKind,
    },
    BuildingCompleted {
        building: Entity,
        kind: BuildingKind,
    },
    BuildingDestroyed {
        building: Entity,
        kind: BuildingKind,
    },
    /// Hostile kill, with the scrap it paid out
    ZombieKilled {
        kind: ZombieKind,
        scrap: i64,
    },
    HarvestCompleted {
        resource: Resource,
        amount: i64,
    },
    /// The player's health reached zero; the entity stays in the store.
    GameOver,
}
