//! Property tests for the invariants the rest of the simulation leans
//! on: the stockpile never goes negative, damage never heals, and stale
//! entity handles never resolve.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use palisade::core::types::Vec2;
use palisade::ecs::components::Resource;
use palisade::ecs::{Entity, Registry};
use palisade::systems::combat;
use palisade::systems::economy::ResourceLedger;
use palisade::systems::effects::EffectsPool;

#[derive(Debug, Clone)]
enum LedgerOp {
    Add(Resource, i64),
    Remove(Resource, i64),
}

fn resource_strategy() -> impl Strategy<Value = Resource> {
    prop_oneof![
        Just(Resource::Wood),
        Just(Resource::Metal),
        Just(Resource::Food),
        Just(Resource::Scrap),
        Just(Resource::Electricity),
    ]
}

fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        (resource_strategy(), -50i64..500).prop_map(|(r, n)| LedgerOp::Add(r, n)),
        (resource_strategy(), -50i64..500).prop_map(|(r, n)| LedgerOp::Remove(r, n)),
    ]
}

proptest! {
    #[test]
    fn ledger_never_goes_negative(ops in prop::collection::vec(ledger_op_strategy(), 0..200)) {
        let mut ledger = ResourceLedger::new();
        for op in ops {
            match op {
                LedgerOp::Add(resource, amount) => ledger.add(resource, amount),
                LedgerOp::Remove(resource, amount) => {
                    let before = ledger.amount(resource);
                    let ok = ledger.remove(resource, amount);
                    if !ok {
                        prop_assert_eq!(
                            ledger.amount(resource),
                            before,
                            "a refused withdrawal must not touch the balance"
                        );
                    }
                }
            }
        }
        for resource in [
            Resource::Wood,
            Resource::Metal,
            Resource::Food,
            Resource::Scrap,
            Resource::Electricity,
        ] {
            prop_assert!(ledger.amount(resource) >= 0);
        }
    }

    #[test]
    fn damage_never_heals(amounts in prop::collection::vec(0.0f32..500.0, 1..30)) {
        let mut registry = Registry::new();
        let player = registry.spawn_player(Vec2::ZERO);
        let mut effects = EffectsPool::new();
        let mut ledger = ResourceLedger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();

        let mut previous = registry.healths.get(player).unwrap().current;
        for amount in amounts {
            combat::apply_damage(
                &mut registry,
                Entity::null(),
                player,
                amount,
                &mut effects,
                &mut ledger,
                &mut rng,
                &mut events,
            );
            let current = registry.healths.get(player).unwrap().current;
            prop_assert!(current <= previous, "damage must never heal");
            prop_assert!(current >= 0.0, "health is floored at zero");
            previous = current;
        }
    }

    #[test]
    fn stale_handles_never_resolve(churn in prop::collection::vec(any::<bool>(), 1..100)) {
        let mut registry = Registry::new();
        let mut live: Vec<Entity> = Vec::new();
        let mut stale: Vec<Entity> = Vec::new();

        for spawn in churn {
            if spawn || live.is_empty() {
                live.push(registry.spawn_player(Vec2::ZERO));
            } else {
                let victim = live.swap_remove(live.len() / 2);
                registry.destroy(victim);
                stale.push(victim);
            }
        }

        for &entity in &live {
            prop_assert!(registry.is_valid(entity));
            prop_assert!(registry.transforms.get(entity).is_some());
        }
        for &entity in &stale {
            prop_assert!(!registry.is_valid(entity));
            prop_assert!(registry.transforms.get(entity).is_none());
        }
    }
}
