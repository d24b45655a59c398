//! Component definitions
//!
//! Plain data only; behavior lives in the systems. Weak references to
//! other entities are stored as raw `Entity` handles and revalidated
//! against the registry before every use.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::core::types::Vec2;

/// Stockpile resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Metal,
    Food,
    Scrap,
    Electricity,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Wood => "wood",
            Resource::Metal => "metal",
            Resource::Food => "food",
            Resource::Scrap => "scrap",
            Resource::Electricity => "electricity",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

/// Render data; the core never draws, the snapshot copies this out.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture_id: String,
    pub z_order: i32,
    pub visible: bool,
    pub tint: [u8; 4],
}

impl Sprite {
    pub fn new(texture_id: &str, z_order: i32) -> Self {
        Self {
            texture_id: texture_id.to_string(),
            z_order,
            visible: true,
            tint: [255, 255, 255, 255],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Velocity {
    pub velocity: Vec2,
    pub max_speed: f32,
}

impl Velocity {
    pub fn with_max_speed(max_speed: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            max_speed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collider {
    pub size: Vec2,
    pub offset: Vec2,
    pub is_trigger: bool,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            is_trigger: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
    pub regeneration: f32,
    pub invincible: bool,
}

impl Health {
    pub fn new(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
            regeneration: 0.0,
            invincible: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

#[derive(Debug, Clone)]
pub struct Hunger {
    pub current: f32,
    pub maximum: f32,
    pub drain_rate: f32,
    pub damage_threshold: f32,
    pub damage_rate: f32,
}

impl Default for Hunger {
    fn default() -> Self {
        Self {
            current: 100.0,
            maximum: 100.0,
            drain_rate: 1.0,
            damage_threshold: 20.0,
            damage_rate: 1.0,
        }
    }
}

impl Hunger {
    pub fn is_starving(&self) -> bool {
        self.current < self.damage_threshold
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

#[derive(Debug, Clone)]
pub struct Temperature {
    pub current: f32,
    pub comfortable: f32,
    pub minimum: f32,
    pub maximum: f32,
}

impl Default for Temperature {
    fn default() -> Self {
        Self {
            current: 37.0,
            comfortable: 37.0,
            minimum: 30.0,
            maximum: 42.0,
        }
    }
}

impl Temperature {
    pub fn is_freezing(&self) -> bool {
        self.current < self.minimum + 2.0
    }

    pub fn is_overheating(&self) -> bool {
        self.current > self.maximum - 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Stamina {
    pub current: f32,
    pub maximum: f32,
    pub regeneration: f32,
    pub sprint_cost: f32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self {
            current: 100.0,
            maximum: 100.0,
            regeneration: 10.0,
            sprint_cost: 20.0,
        }
    }
}

impl Stamina {
    pub fn can_sprint(&self) -> bool {
        self.current > 10.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

#[derive(Debug, Clone)]
pub struct Combat {
    pub attack_damage: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            attack_damage: 10.0,
            attack_speed: 1.0,
            attack_range: 50.0,
            attack_cooldown: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Reserved; no behavior wired yet.
    Flee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZombieKind {
    Normal,
    Fast,
    Tank,
    Exploder,
    Boss,
}

#[derive(Debug, Clone)]
pub struct Ai {
    pub state: AiState,
    pub state_timer: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub move_speed: f32,
    pub target: Entity,
}

impl Default for Ai {
    fn default() -> Self {
        Self {
            state: AiState::Idle,
            state_timer: 0.0,
            detection_range: 300.0,
            attack_range: 50.0,
            attack_cooldown: 1.5,
            move_speed: 80.0,
            target: Entity::null(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Zombie {
    pub kind: ZombieKind,
    pub aggressiveness: f32,
}

#[derive(Debug, Clone)]
pub struct Patrol {
    pub waypoints: Vec<Vec2>,
    pub current_waypoint: usize,
    pub arrival_radius: f32,
    pub looping: bool,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            current_waypoint: 0,
            arrival_radius: 10.0,
            looping: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Wall,
    Turret,
    Gate,
    Generator,
    Storage,
    Workshop,
    Farm,
    House,
}

#[derive(Debug, Clone)]
pub struct Building {
    pub kind: BuildingKind,
    /// 0.0 to 1.0
    pub construction_progress: f32,
    pub complete: bool,
    pub durability: f32,
    pub max_durability: f32,
}

#[derive(Debug, Clone)]
pub struct Producer {
    pub resource: Resource,
    pub amount: i64,
    pub interval: f32,
    pub timer: f32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Turret {
    pub range: f32,
    pub damage: f32,
    pub attack_speed: f32,
    pub attack_cooldown: f32,
    pub current_target: Entity,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Default for Turret {
    fn default() -> Self {
        Self {
            range: 200.0,
            damage: 15.0,
            attack_speed: 1.0,
            attack_cooldown: 0.0,
            current_target: Entity::null(),
            rotation: 0.0,
            rotation_speed: 180.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceNode {
    pub resource: Resource,
    pub remaining: i64,
    pub maximum: i64,
    pub harvest_time: f32,
    pub harvest_amount: i64,
    /// 0 means the node never regrows.
    pub regen_time: f32,
    pub regen_timer: f32,
    pub depleted: bool,
}

#[derive(Debug, Clone)]
pub struct Harvesting {
    pub target_node: Entity,
    /// 0.0 to 1.0
    pub progress: f32,
    pub harvest_time: f32,
    pub node_position: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct InventorySlot {
    pub item_id: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<InventorySlot>,
    pub max_slots: usize,
}

impl Inventory {
    pub fn with_slots(max_slots: usize) -> Self {
        Self {
            slots: vec![InventorySlot::default(); max_slots],
            max_slots,
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_slots(20)
    }
}

// Tags

#[derive(Debug, Clone, Default)]
pub struct Player;

#[derive(Debug, Clone, Default)]
pub struct Hostile;

#[derive(Debug, Clone, Default)]
pub struct Friendly;

#[derive(Debug, Clone, Default)]
pub struct StaticBody;

#[derive(Debug, Clone, Default)]
pub struct Destructible;

/// Auto-destroyed once `elapsed` passes `lifetime`.
#[derive(Debug, Clone)]
pub struct Temporary {
    pub lifetime: f32,
    pub elapsed: f32,
}

impl Temporary {
    pub fn new(lifetime: f32) -> Self {
        Self {
            lifetime,
            elapsed: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub owner: Entity,
}
