//! Survival vitals: health regeneration, hunger, stamina
//!
//! Starvation chips health directly; resulting deaths are picked up by
//! the end-of-frame dead sweep like any other kill.

use crate::ecs::Registry;

pub fn tick_vitals(registry: &mut Registry, dt: f32) {
    // Health regeneration, clamped to max. The dead stay dead.
    for (_, health) in registry.healths.iter_mut() {
        if health.regeneration > 0.0 && !health.is_dead() {
            health.current = (health.current + health.regeneration * dt).min(health.maximum);
        }
    }

    // Hunger drains; below the threshold it starts costing health.
    for (entity, hunger) in registry.hungers.iter_mut() {
        hunger.current = (hunger.current - hunger.drain_rate * dt).max(0.0);
        if hunger.is_starving() {
            if let Some(health) = registry.healths.get_mut(entity) {
                if !health.invincible && !health.is_dead() {
                    health.current = (health.current - hunger.damage_rate * dt).max(0.0);
                }
            }
        }
    }

    for (_, stamina) in registry.staminas.iter_mut() {
        stamina.current = (stamina.current + stamina.regeneration * dt).min(stamina.maximum);
    }
}
