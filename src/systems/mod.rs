//! Per-frame simulation systems, one module per concern. All are free
//! functions over the registry; the orchestrator in `sim` fixes their
//! order.

pub mod ai;
pub mod building;
pub mod combat;
pub mod economy;
pub mod effects;
pub mod harvest;
pub mod movement;
pub mod physics;
pub mod survival;
pub mod turret;
pub mod wave;
