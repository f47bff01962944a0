//! End-of-window fix-up pass.
//!
//! Runs once, when the clock first reaches the cutoff. Unlike the mid-day
//! ticks it does not give `Default` entities the benefit of the doubt: any
//! remaining conflict is corrected unless the entity is `Lenient`. Visitors the
//! host cannot route to the resort are staged at the fallback location when
//! `stage_far_entities_at_fallback` is on.

use tracing::{debug, info};

use crate::cache::EntityCache;
use crate::config::SchedulerConfig;
use crate::decision::DayPlan;
use crate::host::HostWorld;
use crate::reconcile::{
    Assessment, Correction, ReconcileReport, assess, replacement_for, write_target,
};
use crate::types::{DecisionRecord, NativeSchedule, StrictnessLevel, TravelTarget};

/// Tallies for the fix-up pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixupReport {
    /// Per-entity outcomes.
    pub corrections: ReconcileReport,
    /// Visitors sent to the fallback location instead of the resort.
    pub staged: u32,
}

/// Run the fix-up pass over every record in the plan.
pub fn run_fixup<W: HostWorld>(
    world: &mut W,
    cache: &mut EntityCache<W::Handle>,
    plan: &DayPlan,
    config: &SchedulerConfig,
) -> FixupReport {
    let mut report = FixupReport::default();
    for record in plan.records() {
        let Some(handle) = cache.resolve(&record.entity_id, &*world) else {
            report.corrections.skipped += 1;
            continue;
        };
        let (correction, staged) = fix_entity(world, &handle, record, config);
        if staged {
            report.staged += 1;
        }
        report.corrections.record(&correction);
    }
    info!(
        injected = report.corrections.injected,
        overwritten = report.corrections.overwritten,
        tolerated = report.corrections.tolerated,
        staged = report.staged,
        skipped = report.corrections.skipped,
        "end-of-window fix-up complete"
    );
    report
}

fn fix_entity<W: HostWorld>(
    world: &mut W,
    handle: &W::Handle,
    record: &DecisionRecord,
    config: &SchedulerConfig,
) -> (Correction, bool) {
    let resort = &config.resort;
    let lenient = record.strictness == StrictnessLevel::Lenient;
    let stage_far = record.will_visit && config.scheduler.stage_far_entities_at_fallback;
    let native = world.native_schedule(handle);
    let injected = match assess(record, &native, &resort.destination) {
        Assessment::InSync => match &native {
            // Already headed for the resort, possibly by an earlier tick's
            // injection, but the host cannot route the entity there.
            NativeSchedule::Target(current)
                if stage_far && !lenient && !world.is_reachable(handle, current) =>
            {
                false
            }
            _ => return (Correction::Unchanged, false),
        },
        Assessment::Idle => return (Correction::Unchanged, false),
        Assessment::Conflict(current) if lenient => {
            debug!(
                entity = %record.entity_id,
                native = %current,
                "lenient entity left alone at cutoff"
            );
            return (Correction::Tolerated, false);
        }
        Assessment::Conflict(_) => false,
        Assessment::MissingVisit => true,
    };

    let Some(mut target) = replacement_for(world, handle, record, resort) else {
        return (Correction::Failed, false);
    };

    let mut staged = false;
    if stage_far && !world.is_reachable(handle, &target) {
        debug!(
            entity = %record.entity_id,
            target = %target,
            "resort unreachable, staging at fallback"
        );
        target = TravelTarget::location(resort.fallback_location.as_str());
        staged = true;
    }

    let correction = write_target(world, handle, record, target, injected);
    let wrote = matches!(correction, Correction::Injected(_) | Correction::Overwritten(_));
    (correction, staged && wrote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionEngine;
    use crate::reconcile::reconcile_tick;
    use crate::test_support::MockWorld;
    use crate::types::EntityId;

    fn visiting_plan(world: &MockWorld, config: &SchedulerConfig) -> DayPlan {
        DecisionEngine::new(config).compute_day(4, 11, &world.roster, |_| true)
    }

    fn all_visit() -> SchedulerConfig {
        let mut config = SchedulerConfig::default();
        config.chances.group_chance = 1.0;
        config
    }

    #[test]
    fn far_visitor_is_staged() {
        let mut world = MockWorld::new(&["Willy", "Leah"]);
        world.far.insert(EntityId::from("Willy"));
        let config = all_visit();
        let plan = visiting_plan(&world, &config);

        let report = run_fixup(&mut world, &mut EntityCache::new(), &plan, &config);
        assert_eq!(report.staged, 1);
        assert_eq!(report.corrections.injected, 2);
        assert_eq!(
            world.schedule_of("Willy"),
            NativeSchedule::Target(TravelTarget::location("Saloon"))
        );
    }

    #[test]
    fn far_visitor_injected_earlier_is_still_staged() {
        let mut world = MockWorld::new(&["Willy"]);
        world.far.insert(EntityId::from("Willy"));
        let config = all_visit();
        let plan = visiting_plan(&world, &config);
        let mut cache = EntityCache::new();

        let midday = reconcile_tick(&mut world, &mut cache, &plan, &config.resort);
        assert_eq!(midday.injected, 1);

        let report = run_fixup(&mut world, &mut cache, &plan, &config);
        assert_eq!(report.staged, 1);
        assert_eq!(report.corrections.overwritten, 1);
        assert_eq!(
            world.schedule_of("Willy"),
            NativeSchedule::Target(TravelTarget::location("Saloon"))
        );

        let again = run_fixup(&mut world, &mut cache, &plan, &config);
        assert_eq!(again.staged, 0);
    }

    #[test]
    fn lenient_conflict_survives_fixup() {
        let mut world = MockWorld::new(&["Leah"]);
        world.set_native("Leah", "Forest");
        let mut config = all_visit();
        config.strictness.insert("Leah".into(), StrictnessLevel::Lenient);
        let plan = visiting_plan(&world, &config);

        let report = run_fixup(&mut world, &mut EntityCache::new(), &plan, &config);
        assert_eq!(report.corrections.tolerated, 1);
        assert_eq!(world.writes, 0);
    }

    #[test]
    fn refused_write_counts_as_failed() {
        let mut world = MockWorld::new(&["Leah"]);
        world.set_native("Leah", "Forest");
        world.refuse.insert(EntityId::from("Leah"));
        let config = all_visit();
        let plan = visiting_plan(&world, &config);

        let report = run_fixup(&mut world, &mut EntityCache::new(), &plan, &config);
        assert_eq!(report.corrections.failed, 1);
        assert_eq!(report.staged, 0);
    }

    #[test]
    fn second_run_writes_nothing() {
        let mut world = MockWorld::new(&["Leah", "Elliott"]);
        world.set_native("Elliott", "Beach");
        let config = all_visit();
        let plan = visiting_plan(&world, &config);
        let mut cache = EntityCache::new();

        run_fixup(&mut world, &mut cache, &plan, &config);
        let writes = world.writes;
        let again = run_fixup(&mut world, &mut cache, &plan, &config);
        assert_eq!(world.writes, writes);
        assert!(!again.corrections.changed_anything());
    }
}
