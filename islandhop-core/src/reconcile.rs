//! Mid-day reconciliation between committed decisions and host schedules.
//!
//! Runs on every tick of the reconciliation window. Each pass re-reads the
//! host's current assignment before writing anything, so an entity that is
//! already where it should be costs one read and no write. Repeating a pass
//! is therefore a no-op.

use tracing::{debug, trace, warn};

use crate::cache::EntityCache;
use crate::config::ResortConfig;
use crate::decision::DayPlan;
use crate::host::HostWorld;
use crate::types::{DecisionRecord, NativeSchedule, StrictnessLevel, TravelTarget, VisitRole};

/// How an entity's host schedule relates to its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// Host schedule agrees with the decision.
    InSync,
    /// No host schedule, and the entity stays home. Nothing to do.
    Idle,
    /// No host schedule, but the entity is visiting.
    MissingVisit,
    /// Host schedule disagrees with the decision.
    Conflict(TravelTarget),
}

/// Classify an entity's host schedule against its decision.
///
/// A host target counts as "visiting" when its location is the resort; the
/// exact spot inside the resort is the host's business.
#[must_use]
pub fn assess(record: &DecisionRecord, native: &NativeSchedule, destination: &str) -> Assessment {
    match native {
        NativeSchedule::Missing if record.will_visit => Assessment::MissingVisit,
        NativeSchedule::Missing => Assessment::Idle,
        NativeSchedule::Target(target) => {
            if (target.location == destination) == record.will_visit {
                Assessment::InSync
            } else {
                Assessment::Conflict(target.clone())
            }
        }
    }
}

/// Where a visiting entity should head, by role.
#[must_use]
pub fn visit_target(record: &DecisionRecord, resort: &ResortConfig) -> Option<TravelTarget> {
    if !record.will_visit {
        return None;
    }
    let destination = resort.destination.as_str();
    let target = match record.role {
        VisitRole::GroupMember => match &record.group_key {
            Some(key) => TravelTarget::spot(destination, key.as_str()),
            None => TravelTarget::location(destination),
        },
        VisitRole::SoloExplorer => TravelTarget::spot(destination, resort.explorer_spot.as_str()),
        VisitRole::SpecialCase => {
            TravelTarget::spot(destination, resort.special_case_spot.as_str())
        }
        VisitRole::None => TravelTarget::location(destination),
    };
    Some(target)
}

/// What one reconciliation step did to one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// Nothing needed.
    Unchanged,
    /// A synthetic target was written for a missing schedule.
    Injected(TravelTarget),
    /// A conflicting host target was replaced.
    Overwritten(TravelTarget),
    /// A conflict was left alone by policy.
    Tolerated,
    /// A write was needed but the host refused or had no replacement.
    Failed,
}

/// Per-pass tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Synthetic targets written.
    pub injected: u32,
    /// Conflicting targets replaced.
    pub overwritten: u32,
    /// Conflicts left alone by policy.
    pub tolerated: u32,
    /// Entities needing nothing.
    pub unchanged: u32,
    /// Entities the host could not resolve today.
    pub skipped: u32,
    /// Writes the host refused.
    pub failed: u32,
}

impl ReconcileReport {
    /// Whether this pass wrote anything.
    #[must_use]
    pub fn changed_anything(&self) -> bool {
        self.injected + self.overwritten > 0
    }

    pub(crate) fn record(&mut self, correction: &Correction) {
        match correction {
            Correction::Unchanged => self.unchanged += 1,
            Correction::Injected(_) => self.injected += 1,
            Correction::Overwritten(_) => self.overwritten += 1,
            Correction::Tolerated => self.tolerated += 1,
            Correction::Failed => self.failed += 1,
        }
    }
}

/// Write `target` unless the host already has it.
pub(crate) fn write_target<W: HostWorld>(
    world: &mut W,
    handle: &W::Handle,
    record: &DecisionRecord,
    target: TravelTarget,
    injected: bool,
) -> Correction {
    if world.native_schedule(handle) == NativeSchedule::Target(target.clone()) {
        return Correction::Unchanged;
    }
    match world.set_travel_target(handle, &target) {
        Ok(()) if injected => Correction::Injected(target),
        Ok(()) => Correction::Overwritten(target),
        Err(err) => {
            warn!(
                entity = %record.entity_id,
                target = %target,
                error = %err,
                "host refused travel target"
            );
            Correction::Failed
        }
    }
}

/// The replacement for a conflicting host target: the resort spot for
/// visitors, the host's fallback for everyone else.
pub(crate) fn replacement_for<W: HostWorld>(
    world: &W,
    handle: &W::Handle,
    record: &DecisionRecord,
    resort: &ResortConfig,
) -> Option<TravelTarget> {
    if record.will_visit {
        visit_target(record, resort)
    } else {
        world.fallback_target(handle)
    }
}

/// Reconcile one entity under its own strictness level.
pub fn reconcile_entity<W: HostWorld>(
    world: &mut W,
    handle: &W::Handle,
    record: &DecisionRecord,
    resort: &ResortConfig,
) -> Correction {
    let native = world.native_schedule(handle);
    match assess(record, &native, &resort.destination) {
        Assessment::InSync | Assessment::Idle => Correction::Unchanged,
        Assessment::MissingVisit => match visit_target(record, resort) {
            Some(target) => write_target(world, handle, record, target, true),
            None => Correction::Failed,
        },
        Assessment::Conflict(current) => {
            let overwrite = match record.strictness {
                StrictnessLevel::Strict => true,
                StrictnessLevel::Lenient => false,
                StrictnessLevel::Default => !world.is_reachable(handle, &current),
            };
            if !overwrite {
                trace!(
                    entity = %record.entity_id,
                    strictness = ?record.strictness,
                    native = %current,
                    "schedule conflict tolerated"
                );
                return Correction::Tolerated;
            }
            match replacement_for(world, handle, record, resort) {
                Some(target) => write_target(world, handle, record, target, false),
                None => {
                    warn!(
                        entity = %record.entity_id,
                        "no replacement target for conflicting schedule"
                    );
                    Correction::Failed
                }
            }
        }
    }
}

/// One reconciliation tick over every record in the plan.
///
/// Bounded by the plan size; never blocks.
pub fn reconcile_tick<W: HostWorld>(
    world: &mut W,
    cache: &mut EntityCache<W::Handle>,
    plan: &DayPlan,
    resort: &ResortConfig,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    for record in plan.records() {
        let Some(handle) = cache.resolve(&record.entity_id, &*world) else {
            report.skipped += 1;
            continue;
        };
        let correction = reconcile_entity(world, &handle, record, resort);
        report.record(&correction);
    }
    if report.changed_anything() {
        debug!(
            injected = report.injected,
            overwritten = report.overwritten,
            tolerated = report.tolerated,
            "reconciliation tick corrected schedules"
        );
    }
    report
}
