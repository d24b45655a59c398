//! Velocity integration

use crate::ecs::Registry;

/// Clamps each velocity to its max speed, then advances positions.
pub fn update_movement(registry: &mut Registry, dt: f32) {
    for (entity, velocity) in registry.velocities.iter_mut() {
        let speed = velocity.velocity.length();
        if speed > velocity.max_speed {
            velocity.velocity = velocity.velocity * (velocity.max_speed / speed);
        }
        if let Some(transform) = registry.transforms.get_mut(entity) {
            transform.position += velocity.velocity * dt;
        }
    }
}
