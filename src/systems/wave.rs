//! Wave scheduling and perimeter spawning
//!
//! Between waves a countdown runs; when it elapses (or the embedder
//! forces the next wave) a spawn queue is composed deterministically from
//! the wave number and drained on a fixed pacing interval. A wave ends
//! only once the queue is empty and no spawned hostile is left alive.

use rand::Rng;
use tracing::info;

use crate::core::types::{Rect, Vec2};
use crate::ecs::components::{Hostile, Zombie, ZombieKind};
use crate::ecs::Registry;
use crate::sim::SimEvent;

const SPAWN_MARGIN: f32 = 50.0;

#[derive(Debug)]
pub struct WaveDirector {
    current_wave: u32,
    active: bool,
    wave_timer: f32,
    time_between_waves: f32,
    spawn_timer: f32,
    spawn_delay: f32,
    spawn_queue: Vec<(ZombieKind, Vec2)>,
    enemies_remaining: usize,
    spawn_area: Rect,
}

impl WaveDirector {
    pub fn new(spawn_area: Rect, time_between_waves: f32, spawn_delay: f32) -> Self {
        Self {
            current_wave: 0,
            active: false,
            wave_timer: 0.0,
            time_between_waves,
            spawn_timer: 0.0,
            spawn_delay,
            spawn_queue: Vec::new(),
            enemies_remaining: 0,
            spawn_area,
        }
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies_remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn update(
        &mut self,
        registry: &mut Registry,
        dt: f32,
        rng: &mut impl Rng,
        events: &mut Vec<SimEvent>,
    ) {
        if !self.active {
            self.wave_timer += dt;
            if self.wave_timer >= self.time_between_waves {
                self.start_next_wave(rng, events);
            }
            return;
        }

        // Drain the spawn queue on the pacing interval
        if !self.spawn_queue.is_empty() {
            self.spawn_timer += dt;
            if self.spawn_timer >= self.spawn_delay {
                if let Some((kind, position)) = self.spawn_queue.pop() {
                    registry.spawn_zombie(position, kind);
                }
                self.spawn_timer = 0.0;
            }
        }

        // Rescan every frame: kills elsewhere in the pipeline must count.
        let alive = registry
            .zombies
            .entities()
            .into_iter()
            .filter(|&e| {
                registry.has_all::<(Zombie, Hostile)>(e)
                    && registry.healths.get(e).is_some_and(|h| !h.is_dead())
            })
            .count();
        self.enemies_remaining = alive;

        if alive == 0 && self.spawn_queue.is_empty() {
            self.active = false;
            self.wave_timer = 0.0;
            events.push(SimEvent::WaveCompleted {
                wave: self.current_wave,
            });
            info!(
                wave = self.current_wave,
                next_in = self.time_between_waves,
                "wave completed"
            );
        }
    }

    /// Composes and arms the next wave. Also the manual trigger.
    pub fn start_next_wave(&mut self, rng: &mut impl Rng, events: &mut Vec<SimEvent>) {
        self.current_wave += 1;
        self.active = true;
        self.wave_timer = 0.0;
        self.spawn_timer = 0.0;
        self.spawn_queue.clear();

        let wave = self.current_wave;
        let normal = 3 + (wave - 1) * 2;
        let fast = if wave > 2 { wave - 2 } else { 0 };
        let tank = if wave > 4 { wave - 4 } else { 0 };

        for _ in 0..normal {
            let position = self.random_spawn_position(rng);
            self.spawn_queue.push((ZombieKind::Normal, position));
        }
        for _ in 0..fast {
            let position = self.random_spawn_position(rng);
            self.spawn_queue.push((ZombieKind::Fast, position));
        }
        for _ in 0..tank {
            let position = self.random_spawn_position(rng);
            self.spawn_queue.push((ZombieKind::Tank, position));
        }

        self.enemies_remaining = self.spawn_queue.len();
        events.push(SimEvent::WaveStarted {
            wave,
            normal,
            fast,
            tank,
        });
        info!(wave, normal, fast, tank, "wave started");
    }

    /// Uniform pick of an edge, then a uniform point along it, pushed
    /// 50px outside the play area.
    fn random_spawn_position(&self, rng: &mut impl Rng) -> Vec2 {
        let area = &self.spawn_area;
        match rng.gen_range(0..4u32) {
            0 => Vec2::new(
                area.x + rng.gen_range(0.0..area.width),
                area.y - SPAWN_MARGIN,
            ),
            1 => Vec2::new(
                area.x + area.width + SPAWN_MARGIN,
                area.y + rng.gen_range(0.0..area.height),
            ),
            2 => Vec2::new(
                area.x + rng.gen_range(0.0..area.width),
                area.y + area.height + SPAWN_MARGIN,
            ),
            _ => Vec2::new(
                area.x - SPAWN_MARGIN,
                area.y + rng.gen_range(0.0..area.height),
            ),
        }
    }
}
