//! The game world and its fixed frame pipeline
//!
//! `GameWorld` owns everything a simulation run needs: the registry, the
//! stockpile, the wave director, the placement session, the effect pools
//! and one seeded RNG stream every random draw goes through. `step` runs
//! the systems in a fixed order on a single thread, so a given seed and
//! input sequence reproduces a run exactly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{Frame, Rect, Vec2};
use crate::ecs::components::{BuildingKind, Collider, Resource, Sprite, StaticBody, Transform};
use crate::ecs::{Entity, Registry};
use crate::sim::SimEvent;
use crate::systems::building::PlacementSession;
use crate::systems::economy::ResourceLedger;
use crate::systems::effects::EffectsPool;
use crate::systems::wave::WaveDirector;
use crate::systems::{ai, building, combat, economy, effects, harvest, movement, physics, survival, turret};

/// Frames longer than this are clamped so a hitch cannot tunnel
/// entities through walls.
const MAX_FRAME_DT: f32 = 0.1;

/// Per-frame player intent, fed in by the embedder.
#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    /// Unnormalized movement axis; zero means standing still.
    pub move_dir: Vec2,
    /// Begin harvesting the nearest node this frame.
    pub interact: bool,
}

pub struct GameWorld {
    pub registry: Registry,
    pub ledger: ResourceLedger,
    pub waves: WaveDirector,
    pub placement: PlacementSession,
    pub effects: EffectsPool,
    rng: ChaCha8Rng,
    pub frame: Frame,
    pub player: Entity,
    bounds: Rect,
    player_move_speed: f32,
    game_over: bool,
}

impl GameWorld {
    pub fn new(seed: u64, config: &Config) -> Self {
        let width = config.get_i64("window.width", 1280) as f32;
        let height = config.get_i64("window.height", 720) as f32;
        let bounds = Rect::new(0.0, 0.0, width, height);

        let waves = WaveDirector::new(
            bounds,
            config.get_f32("waves.time_between_waves", 30.0),
            config.get_f32("waves.spawn_delay", 0.5),
        );
        let ledger = ResourceLedger::with_starting_stock(
            config.get_i64("resources.starting_wood", 100),
            config.get_i64("resources.starting_metal", 50),
            config.get_i64("resources.starting_food", 20),
            config.get_i64("resources.starting_scrap", 0),
        );

        info!(seed, width, height, "world created");
        Self {
            registry: Registry::new(),
            ledger,
            waves,
            placement: PlacementSession::new(),
            effects: EffectsPool::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            frame: 0,
            player: Entity::null(),
            bounds,
            player_move_speed: 200.0,
            game_over: false,
        }
    }

    /// The starter layout: player in the middle, a cross of rough walls
    /// around the center, trees and ore scattered over the map.
    pub fn populate_starter_scene(&mut self) {
        let center = self.bounds.center();
        self.player = self.registry.spawn_player(center);

        self.spawn_barrier(center + Vec2::new(0.0, -100.0), Vec2::new(200.0, 30.0));
        self.spawn_barrier(center + Vec2::new(-150.0, 0.0), Vec2::new(30.0, 200.0));
        self.spawn_barrier(center + Vec2::new(150.0, 0.0), Vec2::new(30.0, 200.0));

        let tree_positions = [
            (200.0, 150.0),
            (300.0, 200.0),
            (150.0, 400.0),
            (1000.0, 150.0),
            (1100.0, 300.0),
            (950.0, 500.0),
            (400.0, 600.0),
            (800.0, 550.0),
        ];
        for (x, y) in tree_positions {
            self.registry
                .spawn_resource_node(Vec2::new(x, y), Resource::Wood, 50);
        }

        let ore_positions = [
            (250.0, 500.0),
            (350.0, 350.0),
            (1050.0, 500.0),
            (900.0, 200.0),
            (600.0, 150.0),
            (650.0, 600.0),
        ];
        for (x, y) in ore_positions {
            self.registry
                .spawn_resource_node(Vec2::new(x, y), Resource::Metal, 30);
        }

        info!(entities = self.registry.len(), "starter scene populated");
    }

    fn spawn_barrier(&mut self, position: Vec2, size: Vec2) {
        let entity = self.registry.create();
        self.registry.insert(entity, Transform::at(position));
        let mut sprite = Sprite::new("placeholder", 2);
        sprite.tint = [100, 100, 100, 255];
        self.registry.insert(entity, sprite);
        self.registry
            .insert(entity, Collider::new(size.x, size.y));
        self.registry.insert(entity, StaticBody);
    }

    /// Advances the simulation one frame in the fixed system order.
    pub fn step(&mut self, dt: f32, input: &PlayerInput) -> Vec<SimEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.frame += 1;
        let mut events = Vec::new();

        self.apply_player_input(input);
        harvest::update_harvesting(
            &mut self.registry,
            self.player,
            dt,
            &mut self.ledger,
            &mut events,
        );
        movement::update_movement(&mut self.registry, dt);
        ai::update_zombies(
            &mut self.registry,
            self.player,
            dt,
            &mut self.effects,
            &mut self.ledger,
            &mut self.rng,
            &mut events,
        );
        turret::update_turrets(
            &mut self.registry,
            dt,
            &mut self.effects,
            &mut self.ledger,
            &mut self.rng,
            &mut events,
        );
        combat::sweep_dead(
            &mut self.registry,
            &mut self.effects,
            &mut self.ledger,
            &mut self.rng,
            &mut events,
        );
        self.waves
            .update(&mut self.registry, dt, &mut self.rng, &mut events);
        building::tick_construction(&mut self.registry, dt, &mut events);
        economy::tick_producers(&mut self.registry, dt, &mut self.ledger, &mut events);
        economy::tick_node_regen(&mut self.registry, dt);
        survival::tick_vitals(&mut self.registry, dt);
        self.effects.tick(dt);
        effects::tick_temporaries(&mut self.registry, dt);
        physics::update_physics(&mut self.registry, &self.bounds);

        if !self.game_over {
            let player_dead = self
                .registry
                .healths
                .get(self.player)
                .is_some_and(|health| health.is_dead());
            if player_dead {
                self.game_over = true;
                warn!(frame = self.frame, "game over");
                events.push(SimEvent::GameOver);
            }
        }

        events
    }

    fn apply_player_input(&mut self, input: &PlayerInput) {
        if !self.registry.is_valid(self.player) {
            return;
        }

        let moving = input.move_dir != Vec2::ZERO;
        let speed = self.player_move_speed;
        if let Some(velocity) = self.registry.velocities.get_mut(self.player) {
            velocity.velocity = if moving {
                input.move_dir.normalize() * speed
            } else {
                Vec2::ZERO
            };
        }

        // Walking interrupts any harvest in progress
        if moving && self.registry.harvestings.contains(self.player) {
            harvest::cancel_harvest(&mut self.registry, self.player);
        }

        if input.interact {
            harvest::try_begin_harvest(&mut self.registry, self.player);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Skips the remaining inter-wave countdown.
    pub fn start_next_wave(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        self.waves.start_next_wave(&mut self.rng, &mut events);
        events
    }

    pub fn start_placement(&mut self, kind: BuildingKind) {
        self.placement.start(kind);
    }

    pub fn cancel_placement(&mut self) {
        self.placement.cancel();
    }

    pub fn update_placement_preview(&mut self, position: Vec2) {
        self.placement
            .update_preview(position, &self.registry, &self.ledger);
    }

    pub fn try_place_building(&mut self) -> Result<Entity> {
        let mut events = Vec::new();
        self.placement
            .try_place(&mut self.registry, &mut self.ledger, &mut events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> GameWorld {
        let mut world = GameWorld::new(42, &Config::defaults());
        world.populate_starter_scene();
        world
    }

    #[test]
    fn test_starter_scene_layout() {
        let world = world();
        assert!(world.registry.is_valid(world.player));
        assert_eq!(world.registry.resource_nodes.len(), 14, "8 trees + 6 ore");
        assert_eq!(world.registry.statics.len(), 17, "3 barriers + 14 nodes");
        assert_eq!(world.ledger.amount(Resource::Wood), 100);
        assert_eq!(world.ledger.amount(Resource::Metal), 50);
        assert_eq!(world.ledger.amount(Resource::Food), 20);
        assert_eq!(world.ledger.amount(Resource::Scrap), 0);
    }

    #[test]
    fn test_step_clamps_runaway_dt() {
        let mut world = world();
        let start = world
            .registry
            .transforms
            .get(world.player)
            .unwrap()
            .position;

        let input = PlayerInput {
            move_dir: Vec2::new(1.0, 0.0),
            interact: false,
        };
        world.step(5.0, &input);

        let moved = world
            .registry
            .transforms
            .get(world.player)
            .unwrap()
            .position
            .x
            - start.x;
        assert!(
            moved <= 200.0 * 0.1 + 0.001,
            "a 5s hitch must be treated as 0.1s, moved {}",
            moved
        );
    }

    #[test]
    fn test_moving_cancels_harvest() {
        let mut world = world();
        // Teleport next to a tree and latch on
        world
            .registry
            .transforms
            .get_mut(world.player)
            .unwrap()
            .position = Vec2::new(210.0, 150.0);
        world.step(
            0.016,
            &PlayerInput {
                move_dir: Vec2::ZERO,
                interact: true,
            },
        );
        assert!(world.registry.harvestings.contains(world.player));

        world.step(
            0.016,
            &PlayerInput {
                move_dir: Vec2::new(1.0, 0.0),
                interact: false,
            },
        );
        assert!(
            !world.registry.harvestings.contains(world.player),
            "walking must interrupt the harvest"
        );
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let run = |seed: u64| {
            let mut world = GameWorld::new(seed, &Config::defaults());
            world.populate_starter_scene();
            world.start_next_wave();
            for _ in 0..600 {
                world.step(1.0 / 60.0, &PlayerInput::default());
            }
            let positions: Vec<(u32, i64, i64)> = world
                .registry
                .zombies
                .entities()
                .into_iter()
                .filter_map(|e| {
                    world.registry.transforms.get(e).map(|t| {
                        (
                            e.index(),
                            t.position.x.round() as i64,
                            t.position.y.round() as i64,
                        )
                    })
                })
                .collect();
            positions
        };

        assert_eq!(run(7), run(7), "identical seeds must replay identically");
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut world = world();
        world
            .registry
            .healths
            .get_mut(world.player)
            .unwrap()
            .current = 0.0;

        let events = world.step(0.016, &PlayerInput::default());
        assert!(events.contains(&SimEvent::GameOver));
        assert!(world.is_game_over());
        assert!(
            world.registry.is_valid(world.player),
            "the player entity is kept after game over"
        );

        let events = world.step(0.016, &PlayerInput::default());
        assert!(
            !events.contains(&SimEvent::GameOver),
            "game over is reported a single time"
        );
    }
}
