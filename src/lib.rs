//! Palisade - Survival Tower-Defense Simulation Core

pub mod core;
pub mod ecs;
pub mod sim;
pub mod spatial;
pub mod systems;

pub use crate::core::config::Config;
pub use crate::core::error::{GameError, Result};
pub use crate::sim::{GameWorld, PlayerInput, SimEvent, Snapshot};
