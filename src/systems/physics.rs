//! Post-movement physics: damping, collision resolution, world bounds
//!
//! Runs last in the frame so every other system's position writes get
//! resolved against geometry before the snapshot is taken.

use crate::core::types::{Rect, Vec2};
use crate::ecs::components::{Collider, Transform};
use crate::ecs::{Entity, Registry};
use crate::spatial;

pub fn update_physics(registry: &mut Registry, bounds: &Rect) {
    apply_damping(registry);
    resolve_collisions(registry);
    enforce_bounds(registry, bounds);
}

/// Multiplicative friction per frame, with a snap-to-zero under 0.1
/// so nothing creeps forever.
fn apply_damping(registry: &mut Registry) {
    const DAMPING: f32 = 0.95;
    for (_, velocity) in registry.velocities.iter_mut() {
        velocity.velocity.x *= DAMPING;
        velocity.velocity.y *= DAMPING;
        if velocity.velocity.x.abs() < 0.1 {
            velocity.velocity.x = 0.0;
        }
        if velocity.velocity.y.abs() < 0.1 {
            velocity.velocity.y = 0.0;
        }
    }
}

fn collider_rect(registry: &Registry, entity: Entity) -> Option<Rect> {
    let transform = registry.transforms.get(entity)?;
    let collider = registry.colliders.get(entity)?;
    Some(Rect::from_center(transform.position, collider.size))
}

fn resolve_collisions(registry: &mut Registry) {
    let moving: Vec<Entity> = registry
        .velocities
        .entities()
        .into_iter()
        .filter(|&e| registry.has_all::<(Transform, Collider)>(e))
        .collect();
    let statics: Vec<Entity> = registry
        .statics
        .entities()
        .into_iter()
        .filter(|&e| registry.has_all::<(Transform, Collider)>(e))
        .collect();

    // Moving vs static: push the mover out along the axis of least
    // penetration and kill its velocity on that axis.
    for &mover in &moving {
        for &obstacle in &statics {
            if mover == obstacle {
                continue;
            }
            let (Some(mover_rect), Some(obstacle_rect)) =
                (collider_rect(registry, mover), collider_rect(registry, obstacle))
            else {
                continue;
            };
            if let Some(correction) = spatial::push_out(&mover_rect, &obstacle_rect) {
                if let Some(transform) = registry.transforms.get_mut(mover) {
                    transform.position += correction;
                }
                if let Some(velocity) = registry.velocities.get_mut(mover) {
                    if correction.x.abs() > correction.y.abs() {
                        velocity.velocity.x = 0.0;
                    } else {
                        velocity.velocity.y = 0.0;
                    }
                }
            }
        }
    }

    // Moving vs moving: symmetric separation plus a damped impulse,
    // applied only when the pair is closing.
    for i in 0..moving.len() {
        for j in (i + 1)..moving.len() {
            resolve_moving_pair(registry, moving[i], moving[j]);
        }
    }
}

fn resolve_moving_pair(registry: &mut Registry, a: Entity, b: Entity) {
    let (Some(rect_a), Some(rect_b)) = (collider_rect(registry, a), collider_rect(registry, b))
    else {
        return;
    };
    if !rect_a.intersects(&rect_b) {
        return;
    }

    let pos_a = rect_a.center();
    let pos_b = rect_b.center();
    let delta = pos_b - pos_a;
    let distance = delta.length();
    // Coincident centers have no separation direction; leave them be.
    if distance <= 0.0 {
        return;
    }

    let normal = delta * (1.0 / distance);
    let overlap = (rect_a.width + rect_b.width) / 2.0 - distance;

    if let Some(transform) = registry.transforms.get_mut(a) {
        transform.position += -normal * (overlap * 0.5);
    }
    if let Some(transform) = registry.transforms.get_mut(b) {
        transform.position += normal * (overlap * 0.5);
    }

    let vel_a = registry
        .velocities
        .get(a)
        .map(|v| v.velocity)
        .unwrap_or(Vec2::ZERO);
    let vel_b = registry
        .velocities
        .get(b)
        .map(|v| v.velocity)
        .unwrap_or(Vec2::ZERO);
    let relative = (vel_b - vel_a).dot(&normal);
    if relative < 0.0 {
        let impulse = relative * 0.5;
        if let Some(velocity) = registry.velocities.get_mut(a) {
            velocity.velocity += normal * impulse * -1.0;
        }
        if let Some(velocity) = registry.velocities.get_mut(b) {
            velocity.velocity += normal * impulse;
        }
    }
}

fn enforce_bounds(registry: &mut Registry, bounds: &Rect) {
    let entities: Vec<Entity> = registry
        .colliders
        .entities()
        .into_iter()
        .filter(|&e| registry.transforms.contains(e))
        .collect();

    for entity in entities {
        let half_size = registry.colliders.get(entity).map(|c| c.size * 0.5);
        let Some(half_size) = half_size else { continue };
        let Some(transform) = registry.transforms.get_mut(entity) else {
            continue;
        };

        let (clamped, hit_x, hit_y) = spatial::clamp_to_bounds(transform.position, half_size, bounds);
        if !hit_x && !hit_y {
            continue;
        }
        transform.position = clamped;
        if let Some(velocity) = registry.velocities.get_mut(entity) {
            if hit_x {
                velocity.velocity.x = 0.0;
            }
            if hit_y {
                velocity.velocity.y = 0.0;
            }
        }
    }
}
