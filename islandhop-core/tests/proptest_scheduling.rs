//! Property-based tests for the scheduler core.
//!
//! Uses `proptest` to check that plans are reproducible from their inputs
//! and respect capacity and exclusion rules for arbitrary rosters.

use proptest::prelude::*;

use islandhop_core::config::{AllowFlag, SchedulerConfig};
use islandhop_core::decision::DecisionEngine;
use islandhop_core::random::SeededRandom;
use islandhop_core::types::{EntityId, ExclusionOverride, VisitRole};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_roster() -> impl Strategy<Value = Vec<EntityId>> {
    prop::collection::vec("[A-Z][a-z]{2,8}", 0..24)
        .prop_map(|names| names.into_iter().map(EntityId::new).collect())
}

fn arb_config() -> impl Strategy<Value = SchedulerConfig> {
    (0u8..=15, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64).prop_map(
        |(capacity, group, explorer, special)| {
            let mut config = SchedulerConfig::default();
            config.scheduler.capacity = capacity;
            config.chances.group_chance = group;
            config.chances.explorer_chance = explorer;
            config.chances.special_case_chance = special;
            config
        },
    )
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plans_are_reproducible(
        roster in arb_roster(),
        config in arb_config(),
        day in 1u32..400,
        world in any::<u64>(),
    ) {
        let engine = DecisionEngine::new(&config);
        let a = engine.compute_day(day, world, &roster, |_| true);
        let b = engine.compute_day(day, world, &roster, |_| true);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn capacity_is_never_exceeded(
        mut roster in arb_roster(),
        config in arb_config(),
        day in 1u32..400,
        world in any::<u64>(),
    ) {
        roster.push(config.chances.special_case_entity.clone());
        let plan = DecisionEngine::new(&config).compute_day(day, world, &roster, |_| true);
        prop_assert!(plan.capacity_used() <= usize::from(config.scheduler.capacity));
        let specials = plan.records().filter(|r| r.role == VisitRole::SpecialCase).count();
        prop_assert!(specials <= 1);
    }

    #[test]
    fn excluded_entities_never_visit(
        roster in arb_roster(),
        mut config in arb_config(),
        day in 1u32..400,
        world in any::<u64>(),
        excluded_mask in any::<u32>(),
    ) {
        config.chances.group_chance = 1.0;
        let excluded: Vec<&EntityId> = roster
            .iter()
            .enumerate()
            .filter(|(i, _)| excluded_mask & (1 << (i % 32)) != 0)
            .map(|(_, id)| id)
            .collect();
        for id in &excluded {
            config.allow.insert((*id).clone(), AllowFlag::Override(ExclusionOverride::Exclude));
        }
        let plan = DecisionEngine::new(&config).compute_day(day, world, &roster, |_| true);
        for id in excluded {
            prop_assert!(!plan.will_visit(id));
        }
    }

    #[test]
    fn roster_order_does_not_matter(
        roster in arb_roster(),
        config in arb_config(),
        day in 1u32..400,
        world in any::<u64>(),
    ) {
        let mut config = config;
        config.scheduler.capacity = 15;
        let engine = DecisionEngine::new(&config);
        let mut reversed = roster.clone();
        reversed.reverse();
        prop_assert_eq!(
            engine.compute_day(day, world, &roster, |_| true),
            engine.compute_day(day, world, &reversed, |_| true)
        );
    }

    #[test]
    fn removing_an_entity_keeps_other_records(
        roster in prop::collection::vec("[A-Z][a-z]{2,8}", 1..15),
        config in arb_config(),
        day in 1u32..400,
        world in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        // A roster this small never fills the resort, so no entity competes
        // with another for a slot.
        let mut config = config;
        config.scheduler.capacity = 15;
        let roster: Vec<EntityId> = roster.into_iter().map(EntityId::new).collect();
        let removed = pick.get(&roster).clone();
        let shorter: Vec<EntityId> = roster.iter().filter(|id| **id != removed).cloned().collect();

        let engine = DecisionEngine::new(&config);
        let full = engine.compute_day(day, world, &roster, |_| true);
        let without = engine.compute_day(day, world, &shorter, |_| true);

        prop_assert!(without.get(&removed).is_none());
        for id in &shorter {
            prop_assert_eq!(full.get(id), without.get(id));
        }
    }

    #[test]
    fn unresolvable_entities_get_no_record(
        roster in arb_roster(),
        config in arb_config(),
        day in 1u32..400,
    ) {
        let even = |id: &EntityId| id.as_str().len() % 2 == 0;
        let plan = DecisionEngine::new(&config).compute_day(day, 3, &roster, even);
        for record in plan.records() {
            prop_assert!(record.entity_id.as_str().len() % 2 == 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Seeded streams
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn boundary_chances_do_not_consume(
        day in 1u32..10_000,
        world in any::<u64>(),
        salt in "[a-z]{1,12}",
    ) {
        let mut rng = SeededRandom::seed(day, world, &salt);
        let untouched = rng.clone();
        prop_assert!(!rng.of_chance(0.0));
        prop_assert!(!rng.of_chance(-3.0));
        prop_assert!(rng.of_chance(1.0));
        prop_assert!(rng.of_chance(7.5));
        prop_assert_eq!(rng, untouched);
    }

    #[test]
    fn streams_replay_identically(
        day in 1u32..10_000,
        world in any::<u64>(),
        salt in "[a-z]{1,12}",
    ) {
        let mut a = SeededRandom::seed(day, world, &salt);
        let mut b = SeededRandom::seed(day, world, &salt);
        for _ in 0..16 {
            prop_assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn next_below_stays_in_range(
        day in 1u32..10_000,
        world in any::<u64>(),
        bound in 1u32..1_000,
    ) {
        let mut rng = SeededRandom::seed(day, world, "range");
        for _ in 0..8 {
            prop_assert!(rng.next_below(bound) < bound);
        }
    }
}
