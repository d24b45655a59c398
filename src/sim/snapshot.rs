//! Read-only presentation snapshot
//!
//! One call per rendered frame copies everything a renderer or HUD
//! needs out of the world. The core never calls into presentation; this
//! is the only crossing point, and it only reads.

use serde::Serialize;

use crate::core::types::{Frame, Vec2};
use crate::ecs::components::{BuildingKind, Resource};
use crate::sim::world::GameWorld;
use crate::systems::building;
use crate::systems::effects::{AttackLine, BurstParticle, DamageNumber};

#[derive(Debug, Clone, Serialize)]
pub struct SpriteDraw {
    pub entity_index: u32,
    pub texture_id: String,
    pub position: Vec2,
    pub rotation: f32,
    pub z_order: i32,
    pub tint: [u8; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthBar {
    pub position: Vec2,
    pub percentage: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementGhost {
    pub kind: BuildingKind,
    pub position: Vec2,
    pub size: Vec2,
    pub valid: bool,
    pub cost_wood: i64,
    pub cost_metal: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub wave: u32,
    pub wave_active: bool,
    pub enemies_remaining: usize,
    pub resources: Vec<(Resource, i64)>,
    pub player_health: Option<f32>,
    pub player_hunger: Option<f32>,
    pub player_stamina: Option<f32>,
    pub harvest_progress: Option<f32>,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: Frame,
    pub sprites: Vec<SpriteDraw>,
    pub health_bars: Vec<HealthBar>,
    pub hud: Hud,
    pub placement: Option<PlacementGhost>,
    pub damage_numbers: Vec<DamageNumber>,
    pub attack_lines: Vec<AttackLine>,
    pub particles: Vec<BurstParticle>,
}

impl Snapshot {
    pub fn capture(world: &GameWorld) -> Self {
        let registry = &world.registry;

        let mut sprites: Vec<SpriteDraw> = registry
            .sprites
            .iter()
            .filter(|(_, sprite)| sprite.visible)
            .filter_map(|(entity, sprite)| {
                registry.transforms.get(entity).map(|transform| SpriteDraw {
                    entity_index: entity.index(),
                    texture_id: sprite.texture_id.clone(),
                    position: transform.position,
                    rotation: transform.rotation,
                    z_order: sprite.z_order,
                    tint: sprite.tint,
                })
            })
            .collect();
        // Painter's order: back to front, entity index as the stable tiebreak
        sprites.sort_by_key(|draw| (draw.z_order, draw.entity_index));

        let health_bars = registry
            .healths
            .iter()
            .filter(|(_, health)| health.current < health.maximum)
            .filter_map(|(entity, health)| {
                registry.transforms.get(entity).map(|transform| HealthBar {
                    position: transform.position,
                    percentage: health.percentage(),
                })
            })
            .collect();

        let resources = [
            Resource::Wood,
            Resource::Metal,
            Resource::Food,
            Resource::Scrap,
            Resource::Electricity,
        ]
        .into_iter()
        .map(|resource| (resource, world.ledger.amount(resource)))
        .collect();

        let hud = Hud {
            wave: world.waves.current_wave(),
            wave_active: world.waves.is_active(),
            enemies_remaining: world.waves.enemies_remaining(),
            resources,
            player_health: registry
                .healths
                .get(world.player)
                .map(|health| health.percentage()),
            player_hunger: registry
                .hungers
                .get(world.player)
                .map(|hunger| hunger.percentage()),
            player_stamina: registry
                .staminas
                .get(world.player)
                .map(|stamina| stamina.percentage()),
            harvest_progress: registry
                .harvestings
                .get(world.player)
                .map(|harvesting| harvesting.progress),
            game_over: world.is_game_over(),
        };

        let placement = world.placement.preview().map(|preview| {
            let cost = building::building_cost(preview.kind);
            PlacementGhost {
                kind: preview.kind,
                position: preview.position,
                size: building::building_size(preview.kind),
                valid: preview.valid,
                cost_wood: cost.wood,
                cost_metal: cost.metal,
            }
        });

        Self {
            frame: world.frame,
            sprites,
            health_bars,
            hud,
            placement,
            damage_numbers: world.effects.damage_numbers.clone(),
            attack_lines: world.effects.attack_lines.clone(),
            particles: world.effects.particles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::sim::world::PlayerInput;

    fn world() -> GameWorld {
        let mut world = GameWorld::new(42, &Config::defaults());
        world.populate_starter_scene();
        world
    }

    #[test]
    fn test_sprites_sorted_back_to_front() {
        let world = world();
        let snapshot = Snapshot::capture(&world);

        assert!(!snapshot.sprites.is_empty());
        for pair in snapshot.sprites.windows(2) {
            assert!(
                (pair[0].z_order, pair[0].entity_index) <= (pair[1].z_order, pair[1].entity_index),
                "draw list must be ordered by (z, entity)"
            );
        }
        // The player sits above the scenery
        let last = snapshot.sprites.last().unwrap();
        assert_eq!(last.texture_id, "player");
    }

    #[test]
    fn test_hud_reflects_ledger_and_wave() {
        let mut world = world();
        world.start_next_wave();
        let snapshot = Snapshot::capture(&world);

        assert_eq!(snapshot.hud.wave, 1);
        assert!(snapshot.hud.wave_active);
        assert!(snapshot
            .hud
            .resources
            .contains(&(Resource::Wood, 100)));
        assert_eq!(snapshot.hud.player_health, Some(1.0));
        assert_eq!(snapshot.hud.player_hunger, Some(1.0));
        assert_eq!(snapshot.hud.player_stamina, Some(1.0));
        assert!(!snapshot.hud.game_over);
    }

    #[test]
    fn test_placement_ghost_carries_cost() {
        let mut world = world();
        world.start_placement(BuildingKind::Turret);
        world.update_placement_preview(Vec2::new(900.0, 650.0));
        let snapshot = Snapshot::capture(&world);

        let ghost = snapshot.placement.expect("session active");
        assert_eq!(ghost.kind, BuildingKind::Turret);
        assert_eq!(ghost.cost_wood, 20);
        assert_eq!(ghost.cost_metal, 30);
        assert_eq!(ghost.size, Vec2::new(48.0, 48.0));
    }

    #[test]
    fn test_full_health_entities_have_no_bar() {
        let mut world = world();
        let snapshot = Snapshot::capture(&world);
        assert!(snapshot.health_bars.is_empty(), "nobody is hurt yet");

        world
            .registry
            .healths
            .get_mut(world.player)
            .unwrap()
            .current = 40.0;
        let snapshot = Snapshot::capture(&world);
        assert_eq!(snapshot.health_bars.len(), 1);
        assert!((snapshot.health_bars[0].percentage - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut world = world();
        world.step(0.016, &PlayerInput::default());
        let snapshot = Snapshot::capture(&world);
        let json = serde_json::to_string(&snapshot).expect("snapshot must serialize");
        assert!(json.contains("\"frame\":1"));
    }
}
