//! Hand-rolled entity-component store: generational handles, sparse-set
//! pools, and a registry facade with the spawn archetypes.

pub mod components;
pub mod entity;
pub mod registry;
pub mod sparse;

pub use entity::Entity;
pub use registry::Registry;
