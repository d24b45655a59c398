//! Transient visual records: damage numbers, attack lines, death bursts
//!
//! Nothing here is gameplay-authoritative. The pools are capped; when one
//! is full the oldest record is dropped to make room.

use rand::Rng;

use crate::core::types::Vec2;
use crate::ecs::{Entity, Registry};
use serde::Serialize;

const POOL_CAP: usize = 512;
const PARTICLE_GRAVITY: f32 = 200.0;

#[derive(Debug, Clone, Serialize)]
pub struct DamageNumber {
    pub position: Vec2,
    pub amount: f32,
    pub elapsed: f32,
    pub lifetime: f32,
    /// Pixels per second; negative drifts upward.
    pub rise_speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackLine {
    pub from: Vec2,
    pub to: Vec2,
    pub elapsed: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BurstParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub elapsed: f32,
    pub lifetime: f32,
    pub size: f32,
}

#[derive(Debug, Default)]
pub struct EffectsPool {
    pub damage_numbers: Vec<DamageNumber>,
    pub attack_lines: Vec<AttackLine>,
    pub particles: Vec<BurstParticle>,
}

fn push_capped<T>(pool: &mut Vec<T>, record: T) {
    if pool.len() >= POOL_CAP {
        pool.remove(0);
    }
    pool.push(record);
}

impl EffectsPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_damage_number(&mut self, position: Vec2, amount: f32) {
        push_capped(
            &mut self.damage_numbers,
            DamageNumber {
                position: position + Vec2::new(0.0, -20.0),
                amount,
                elapsed: 0.0,
                lifetime: 1.5,
                rise_speed: -50.0,
            },
        );
    }

    pub fn push_attack_line(&mut self, from: Vec2, to: Vec2) {
        push_capped(
            &mut self.attack_lines,
            AttackLine {
                from,
                to,
                elapsed: 0.0,
                lifetime: 0.15,
            },
        );
    }

    /// Ten particles scattered on random headings with a slight upward
    /// bias, falling under gravity.
    pub fn push_death_burst(&mut self, position: Vec2, rng: &mut impl Rng) {
        for _ in 0..10 {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(100.0..200.0);
            let velocity = Vec2::new(angle.cos() * speed, angle.sin() * speed - 100.0);
            push_capped(
                &mut self.particles,
                BurstParticle {
                    position,
                    velocity,
                    elapsed: 0.0,
                    lifetime: rng.gen_range(0.8..1.2),
                    size: rng.gen_range(2.0..6.0),
                },
            );
        }
    }

    /// Ages every record and drops the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for number in &mut self.damage_numbers {
            number.elapsed += dt;
            number.position.y += number.rise_speed * dt;
        }
        self.damage_numbers.retain(|n| n.elapsed < n.lifetime);

        for line in &mut self.attack_lines {
            line.elapsed += dt;
        }
        self.attack_lines.retain(|l| l.elapsed < l.lifetime);

        for particle in &mut self.particles {
            particle.elapsed += dt;
            particle.position += particle.velocity * dt;
            particle.velocity.y += PARTICLE_GRAVITY * dt;
        }
        self.particles.retain(|p| p.elapsed < p.lifetime);
    }

    pub fn is_empty(&self) -> bool {
        self.damage_numbers.is_empty() && self.attack_lines.is_empty() && self.particles.is_empty()
    }
}

/// Ages `Temporary` entities and destroys the expired ones.
pub fn tick_temporaries(registry: &mut Registry, dt: f32) {
    let mut expired: Vec<Entity> = Vec::new();
    for (entity, temporary) in registry.temporaries.iter_mut() {
        temporary.elapsed += dt;
        if temporary.elapsed >= temporary.lifetime {
            expired.push(entity);
        }
    }
    for entity in expired {
        registry.destroy(entity);
    }
}
