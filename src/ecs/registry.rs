//! Entity registry: allocator plus one sparse-set pool per component type
//!
//! Systems usually reach into the pool fields directly so disjoint pools
//! can be borrowed together; the generic `insert`/`get`/`entities_with`
//! accessors cover the single-pool cases.
//!
//! Creating or destroying entities while iterating a pool snapshot leaves
//! the new/dead entity's membership in that pass undefined, so destroying
//! phases run after the read-only ones.

use tracing::{debug, info};

use super::components::*;
use super::entity::{Entity, EntityAllocator};
use super::sparse::SparseSet;
use crate::core::types::Vec2;

/// Ties a component type to its pool field on the registry.
pub trait Component: Sized + 'static {
    fn pool(registry: &Registry) -> &SparseSet<Self>;
    fn pool_mut(registry: &mut Registry) -> &mut SparseSet<Self>;
}

/// A tuple of component types, queried as a group via
/// `Registry::has_all` / `Registry::has_any`.
pub trait ComponentSet {
    fn has_all(registry: &Registry, entity: Entity) -> bool;
    fn has_any(registry: &Registry, entity: Entity) -> bool;
}

macro_rules! component_set {
    ($( $ty:ident ),+) => {
        impl<$( $ty: Component ),+> ComponentSet for ($( $ty, )+) {
            fn has_all(registry: &Registry, entity: Entity) -> bool {
                $( $ty::pool(registry).contains(entity) )&&+
            }
            fn has_any(registry: &Registry, entity: Entity) -> bool {
                $( $ty::pool(registry).contains(entity) )||+
            }
        }
    };
}

component_set!(A);
component_set!(A, B);
component_set!(A, B, C);
component_set!(A, B, C, D);

macro_rules! component_pools {
    ($( $field:ident : $ty:ty ),* $(,)?) => {
        /// All entities and their components
        #[derive(Default)]
        pub struct Registry {
            allocator: EntityAllocator,
            $( pub $field: SparseSet<$ty>, )*
        }

        impl Registry {
            fn remove_all_components(&mut self, entity: Entity) {
                $( self.$field.remove(entity); )*
            }

            fn clear_pools(&mut self) {
                $( self.$field.clear(); )*
            }
        }

        $(
            impl Component for $ty {
                fn pool(registry: &Registry) -> &SparseSet<Self> {
                    &registry.$field
                }
                fn pool_mut(registry: &mut Registry) -> &mut SparseSet<Self> {
                    &mut registry.$field
                }
            }
        )*
    };
}

component_pools! {
    transforms: Transform,
    sprites: Sprite,
    velocities: Velocity,
    colliders: Collider,
    healths: Health,
    hungers: Hunger,
    temperatures: Temperature,
    staminas: Stamina,
    combats: Combat,
    ais: Ai,
    zombies: Zombie,
    patrols: Patrol,
    buildings: Building,
    producers: Producer,
    turrets: Turret,
    resource_nodes: ResourceNode,
    harvestings: Harvesting,
    inventories: Inventory,
    players: Player,
    hostiles: Hostile,
    friendlies: Friendly,
    statics: StaticBody,
    destructibles: Destructible,
    temporaries: Temporary,
    bullets: Bullet,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Entity {
        self.allocator.create()
    }

    /// Destroys the entity and detaches all its components.
    /// A no-op on handles that are already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if self.allocator.destroy(entity) {
            self.remove_all_components(entity);
            true
        } else {
            false
        }
    }

    pub fn is_valid(&self, entity: Entity) -> bool {
        self.allocator.is_valid(entity)
    }

    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        if self.allocator.is_valid(entity) {
            T::pool_mut(self).insert(entity, component);
        }
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        T::pool(self).get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        T::pool_mut(self).get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        T::pool(self).contains(entity)
    }

    /// True when the entity carries every component in the tuple.
    pub fn has_all<S: ComponentSet>(&self, entity: Entity) -> bool {
        S::has_all(self, entity)
    }

    /// True when the entity carries at least one component in the tuple.
    pub fn has_any<S: ComponentSet>(&self, entity: Entity) -> bool {
        S::has_any(self, entity)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        T::pool_mut(self).remove(entity)
    }

    /// Snapshot of the pool membership in dense order.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        T::pool(self).entities()
    }

    pub fn len(&self) -> usize {
        self.allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocator.is_empty()
    }

    pub fn clear(&mut self) {
        self.allocator.clear();
        self.clear_pools();
    }
}

// Spawn helpers with the per-archetype stat tables.
impl Registry {
    pub fn spawn_player(&mut self, position: Vec2) -> Entity {
        let entity = self.create();
        self.insert(entity, Transform::at(position));
        self.insert(entity, Velocity::with_max_speed(200.0));
        self.insert(entity, Sprite::new("player", 10));
        self.insert(entity, Collider::new(32.0, 32.0));
        self.insert(entity, Health::new(100.0));
        self.insert(entity, Hunger::default());
        self.insert(entity, Temperature::default());
        self.insert(entity, Stamina::default());
        self.insert(entity, Combat::default());
        self.insert(entity, Inventory::default());
        self.insert(entity, Player);

        info!(entity = entity.index(), "spawned player");
        entity
    }

    pub fn spawn_zombie(&mut self, position: Vec2, kind: ZombieKind) -> Entity {
        let (max_speed, health, damage, detection_range, texture, z) = match kind {
            ZombieKind::Normal => (50.0, 50.0, 10.0, 200.0, "zombie_normal", 5),
            ZombieKind::Fast => (150.0, 30.0, 8.0, 200.0, "zombie_fast", 5),
            ZombieKind::Tank => (30.0, 200.0, 20.0, 200.0, "zombie_tank", 5),
            ZombieKind::Exploder => (60.0, 40.0, 50.0, 200.0, "zombie_exploder", 5),
            ZombieKind::Boss => (40.0, 500.0, 30.0, 400.0, "zombie_boss", 6),
        };

        let entity = self.create();
        self.insert(entity, Transform::at(position));
        self.insert(entity, Sprite::new(texture, z));
        self.insert(entity, Collider::new(32.0, 32.0));
        self.insert(entity, Velocity::with_max_speed(max_speed));
        self.insert(entity, Health::new(health));
        self.insert(
            entity,
            Combat {
                attack_damage: damage,
                attack_speed: 1.0,
                attack_range: 40.0,
                attack_cooldown: 0.0,
            },
        );
        self.insert(
            entity,
            Ai {
                state: AiState::Patrol,
                detection_range,
                attack_range: 40.0,
                move_speed: max_speed,
                ..Ai::default()
            },
        );
        self.insert(
            entity,
            Zombie {
                kind,
                aggressiveness: 1.0,
            },
        );
        self.insert(entity, Patrol::default());
        self.insert(entity, Hostile);
        self.insert(entity, Destructible);

        debug!(entity = entity.index(), ?kind, "spawned zombie");
        entity
    }

    pub fn spawn_building(&mut self, position: Vec2, kind: BuildingKind) -> Entity {
        let entity = self.create();
        self.insert(entity, Transform::at(position));
        self.insert(entity, Sprite::new(building_texture(kind), 3));
        // Collider matches the placement footprint
        let size = match kind {
            BuildingKind::Turret => 48.0,
            BuildingKind::Workshop | BuildingKind::House => 96.0,
            BuildingKind::Storage => 80.0,
            BuildingKind::Farm => 128.0,
            BuildingKind::Wall | BuildingKind::Gate | BuildingKind::Generator => 64.0,
        };
        self.insert(entity, Collider::new(size, size));

        let max_durability = match kind {
            BuildingKind::Wall => 200.0,
            BuildingKind::Turret => 100.0,
            BuildingKind::Generator => 150.0,
            BuildingKind::Farm => 80.0,
            BuildingKind::Storage => 120.0,
            BuildingKind::Workshop => 100.0,
            BuildingKind::Gate | BuildingKind::House => 100.0,
        };
        self.insert(
            entity,
            Building {
                kind,
                construction_progress: 0.0,
                complete: false,
                durability: max_durability,
                max_durability,
            },
        );

        match kind {
            BuildingKind::Turret => {
                self.insert(
                    entity,
                    Turret {
                        range: 250.0,
                        damage: 15.0,
                        attack_speed: 2.0,
                        ..Turret::default()
                    },
                );
            }
            BuildingKind::Generator => {
                self.insert(
                    entity,
                    Producer {
                        resource: Resource::Electricity,
                        amount: 1,
                        interval: 10.0,
                        timer: 0.0,
                        active: true,
                    },
                );
            }
            BuildingKind::Farm => {
                self.insert(
                    entity,
                    Producer {
                        resource: Resource::Food,
                        amount: 2,
                        interval: 10.0,
                        timer: 0.0,
                        active: true,
                    },
                );
            }
            BuildingKind::Workshop => {
                self.insert(
                    entity,
                    Producer {
                        resource: Resource::Metal,
                        amount: 1,
                        interval: 15.0,
                        timer: 0.0,
                        active: true,
                    },
                );
            }
            BuildingKind::Storage => {
                self.insert(entity, Inventory::with_slots(50));
            }
            _ => {}
        }

        self.insert(entity, StaticBody);
        self.insert(entity, Destructible);

        info!(entity = entity.index(), ?kind, "spawned building");
        entity
    }

    pub fn spawn_resource_node(
        &mut self,
        position: Vec2,
        resource: Resource,
        amount: i64,
    ) -> Entity {
        let entity = self.create();
        self.insert(entity, Transform::at(position));

        let (texture, collider, harvest_time, harvest_amount, regen_time) = match resource {
            Resource::Wood => ("tree", 48.0, 2.0, 5, 120.0),
            Resource::Metal => ("ore", 40.0, 3.0, 3, 180.0),
            _ => ("resource", 40.0, 2.0, 1, 60.0),
        };
        self.insert(entity, Sprite::new(texture, 4));
        self.insert(entity, Collider::new(collider, collider));
        self.insert(
            entity,
            ResourceNode {
                resource,
                remaining: amount,
                maximum: amount,
                harvest_time,
                harvest_amount,
                regen_time,
                regen_timer: 0.0,
                depleted: false,
            },
        );
        self.insert(entity, StaticBody);

        info!(entity = entity.index(), %resource, amount, "spawned resource node");
        entity
    }

    /// Fire-and-forget tracer; damage is applied instantly by the shooter.
    pub fn spawn_bullet(&mut self, from: Vec2, to: Vec2, owner: Entity) -> Entity {
        let direction = (to - from).normalize();
        let entity = self.create();
        self.insert(entity, Transform::at(from));
        self.insert(
            entity,
            Velocity {
                velocity: direction * 500.0,
                max_speed: 500.0,
            },
        );
        let mut sprite = Sprite::new("bullet", 12);
        sprite.tint = [255, 255, 0, 255];
        self.insert(entity, sprite);
        self.insert(entity, Bullet { owner });
        self.insert(entity, Temporary::new(0.5));
        entity
    }
}

fn building_texture(kind: BuildingKind) -> &'static str {
    match kind {
        BuildingKind::Wall => "building_wall",
        BuildingKind::Turret => "building_turret",
        BuildingKind::Gate => "building_gate",
        BuildingKind::Generator => "building_generator",
        BuildingKind::Storage => "building_storage",
        BuildingKind::Workshop => "building_workshop",
        BuildingKind::Farm => "building_farm",
        BuildingKind::House => "building_house",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_detaches_components() {
        let mut registry = Registry::new();
        let zombie = registry.spawn_zombie(Vec2::new(10.0, 10.0), ZombieKind::Normal);
        assert!(registry.has::<Health>(zombie));

        assert!(registry.destroy(zombie));
        assert!(!registry.is_valid(zombie));
        assert!(registry.get::<Health>(zombie).is_none());
        assert!(registry.get::<Ai>(zombie).is_none());
    }

    #[test]
    fn test_destroy_dead_handle_is_noop() {
        let mut registry = Registry::new();
        let e = registry.create();
        assert!(registry.destroy(e));
        assert!(!registry.destroy(e));
    }

    #[test]
    fn test_zombie_stat_tables() {
        let mut registry = Registry::new();
        let tank = registry.spawn_zombie(Vec2::ZERO, ZombieKind::Tank);
        let boss = registry.spawn_zombie(Vec2::ZERO, ZombieKind::Boss);

        let tank_health = registry.get::<Health>(tank).unwrap();
        assert_eq!(tank_health.maximum, 200.0);
        assert_eq!(registry.get::<Velocity>(tank).unwrap().max_speed, 30.0);

        let boss_ai = registry.get::<Ai>(boss).unwrap();
        assert_eq!(boss_ai.detection_range, 400.0, "boss sees twice as far");
        assert_eq!(registry.get::<Health>(boss).unwrap().maximum, 500.0);
    }

    #[test]
    fn test_building_archetypes() {
        let mut registry = Registry::new();
        let wall = registry.spawn_building(Vec2::ZERO, BuildingKind::Wall);
        let turret = registry.spawn_building(Vec2::ZERO, BuildingKind::Turret);
        let farm = registry.spawn_building(Vec2::ZERO, BuildingKind::Farm);

        assert_eq!(registry.get::<Building>(wall).unwrap().max_durability, 200.0);
        assert!(!registry.get::<Building>(wall).unwrap().complete);

        let turret_comp = registry.get::<Turret>(turret).expect("turret component");
        assert_eq!(turret_comp.range, 250.0);
        assert_eq!(turret_comp.attack_speed, 2.0);

        let producer = registry.get::<Producer>(farm).expect("farm produces food");
        assert_eq!(producer.resource, Resource::Food);
        assert_eq!(producer.amount, 2);
        assert_eq!(producer.interval, 10.0);
    }

    #[test]
    fn test_resource_node_harvest_tables() {
        let mut registry = Registry::new();
        let tree = registry.spawn_resource_node(Vec2::ZERO, Resource::Wood, 50);
        let ore = registry.spawn_resource_node(Vec2::ZERO, Resource::Metal, 30);

        let tree_node = registry.get::<ResourceNode>(tree).unwrap();
        assert_eq!(tree_node.harvest_time, 2.0);
        assert_eq!(tree_node.harvest_amount, 5);
        assert_eq!(tree_node.regen_time, 120.0);

        let ore_node = registry.get::<ResourceNode>(ore).unwrap();
        assert_eq!(ore_node.harvest_time, 3.0);
        assert_eq!(ore_node.harvest_amount, 3);
        assert_eq!(ore_node.regen_time, 180.0);
    }

    #[test]
    fn test_has_all_and_has_any_over_tuples() {
        let mut registry = Registry::new();
        let zombie = registry.spawn_zombie(Vec2::ZERO, ZombieKind::Normal);
        let player = registry.spawn_player(Vec2::ZERO);

        assert!(registry.has_all::<(Zombie, Hostile)>(zombie));
        assert!(registry.has_all::<(Transform, Velocity, Health)>(zombie));
        assert!(!registry.has_all::<(Zombie, Player)>(zombie));

        assert!(registry.has_any::<(Player, Hostile)>(player));
        assert!(!registry.has_any::<(Zombie, Hostile)>(player));

        registry.destroy(zombie);
        assert!(!registry.has_all::<(Zombie, Hostile)>(zombie));
        assert!(!registry.has_any::<(Zombie, Hostile)>(zombie));
    }

    #[test]
    fn test_entities_with_reports_dense_order() {
        let mut registry = Registry::new();
        let a = registry.spawn_zombie(Vec2::ZERO, ZombieKind::Normal);
        let b = registry.spawn_zombie(Vec2::ZERO, ZombieKind::Fast);
        assert_eq!(registry.entities_with::<Zombie>(), vec![a, b]);
    }
}
