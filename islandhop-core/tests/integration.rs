//! Integration tests: whole scheduling days against an in-memory host.
//!
//! Covers plan commitment, mid-day reconciliation under each strictness
//! level, the one-shot fix-up, staging, and cross-day save data.

use std::collections::{HashMap, HashSet};

use islandhop_core::config::SchedulerConfig;
use islandhop_core::decision::DecisionEngine;
use islandhop_core::fixup::run_fixup;
use islandhop_core::reconcile::reconcile_tick;
use islandhop_core::save_data::{JsonFileStore, SaveDataStore};
use islandhop_core::types::{
    ClockTime, DayPhase, EntityId, ExclusionOverride, NativeSchedule, StrictnessLevel, TravelTarget,
};
use islandhop_core::config::AllowFlag;
use islandhop_core::{
    Authority, EntityCache, EntityResolver, HostWorld, LifecycleController, SchedError, TickOutcome,
};

// ---------------------------------------------------------------------------
// Test host
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Valley {
    npcs: Vec<EntityId>,
    locked: bool,
    schedules: HashMap<EntityId, NativeSchedule>,
    /// NPCs that can only walk home.
    far: HashSet<EntityId>,
    busy: HashSet<EntityId>,
    writes: u32,
}

impl Valley {
    fn new(names: &[&str]) -> Self {
        Self {
            npcs: names.iter().copied().map(EntityId::from).collect(),
            ..Self::default()
        }
    }

    fn put(&mut self, name: &str, location: &str) {
        self.schedules
            .insert(name.into(), NativeSchedule::Target(TravelTarget::location(location)));
    }

    fn location_of(&self, name: &str) -> Option<String> {
        match self.schedules.get(&EntityId::from(name)) {
            Some(NativeSchedule::Target(t)) => Some(t.location.clone()),
            _ => None,
        }
    }
}

impl EntityResolver for Valley {
    type Handle = EntityId;

    fn resolve(&self, name: &EntityId) -> Option<EntityId> {
        self.npcs.contains(name).then(|| name.clone())
    }
}

impl HostWorld for Valley {
    fn roster(&self) -> Vec<EntityId> {
        self.npcs.clone()
    }

    fn resort_unlocked(&self) -> bool {
        !self.locked
    }

    fn native_schedule(&self, handle: &EntityId) -> NativeSchedule {
        self.schedules.get(handle).cloned().unwrap_or(NativeSchedule::Missing)
    }

    fn is_reachable(&self, handle: &EntityId, target: &TravelTarget) -> bool {
        !self.far.contains(handle) || target.location == "Home"
    }

    fn fallback_target(&self, _handle: &EntityId) -> Option<TravelTarget> {
        Some(TravelTarget::location("Home"))
    }

    fn set_travel_target(
        &mut self,
        handle: &EntityId,
        target: &TravelTarget,
    ) -> islandhop_core::Result<()> {
        if self.busy.contains(handle) {
            return Err(SchedError::HostIntegration(format!("{handle} is in a cutscene")));
        }
        self.writes += 1;
        self.schedules.insert(handle.clone(), NativeSchedule::Target(target.clone()));
        Ok(())
    }

    fn clear_visitors(&mut self) {}
}

/// Everyone eligible visits; nobody explores.
fn all_visit() -> SchedulerConfig {
    let mut config = SchedulerConfig::default();
    config.scheduler.capacity = 15;
    config.chances.group_chance = 1.0;
    config.chances.explorer_chance = 0.0;
    config
}

fn with_strictness(
    mut config: SchedulerConfig,
    name: &str,
    level: StrictnessLevel,
) -> SchedulerConfig {
    config.strictness.insert(name.into(), level);
    config
}

// ---------------------------------------------------------------------------
// Full day
// ---------------------------------------------------------------------------

#[test]
fn full_day_lifecycle_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("islandhop.json"));
    let mut valley = Valley::new(&["Leah", "Elliott", "Emily", "Haley"]);
    let mut ctl = LifecycleController::new(all_visit(), Authority::Authoritative);

    ctl.on_save_loaded(&valley, &store);
    ctl.on_day_started(&valley, 12, 0xDEAD_BEEF);
    assert_eq!(ctl.phase(), DayPhase::Pending);
    assert_eq!(ctl.cache_len(), 0);

    let TickOutcome::Reconciled(report) = ctl.on_time_changed(&mut valley, ClockTime(600)) else {
        panic!("first tick should reconcile");
    };
    assert_eq!(report.injected, 4);
    for name in ["Leah", "Elliott", "Emily", "Haley"] {
        assert_eq!(valley.location_of(name).as_deref(), Some("IslandSouth"));
    }

    assert!(matches!(
        ctl.on_time_changed(&mut valley, ClockTime(610)),
        TickOutcome::Reconciled(r) if !r.changed_anything()
    ));
    assert!(matches!(ctl.on_time_changed(&mut valley, ClockTime(620)), TickOutcome::Finalized(_)));
    assert_eq!(ctl.on_time_changed(&mut valley, ClockTime(630)), TickOutcome::Ignored);

    ctl.on_day_ending(&mut valley, &mut store);
    assert_eq!(ctl.phase(), DayPhase::Idle);

    let saved = store.load().unwrap();
    assert_eq!(saved.last_day, 12);
    assert_eq!(saved.visits(&"Haley".into()), 1);
}

#[test]
fn participants_agree_on_the_plan() {
    let valley = Valley::new(&["Abigail", "Sam", "Sebastian", "Penny", "Maru", "Alex", "Shane"]);
    let config = SchedulerConfig::default();
    let mut host = LifecycleController::new(config.clone(), Authority::Authoritative);
    let mut other = LifecycleController::new(config, Authority::Authoritative);

    for day in 1..=28 {
        host.on_day_started(&valley, day, 77);
        other.on_day_started(&valley, day, 77);
        assert_eq!(host.plan(), other.plan(), "day {day}");
    }
}

#[test]
fn locked_resort_overwrites_stray_visitors() {
    let mut valley = Valley::new(&["Leah"]);
    valley.locked = true;
    valley.put("Leah", "IslandSouth");
    let config = with_strictness(all_visit(), "Leah", StrictnessLevel::Strict);
    let mut ctl = LifecycleController::new(config, Authority::Authoritative);

    ctl.on_day_started(&valley, 3, 1);
    ctl.on_time_changed(&mut valley, ClockTime(600));
    assert_eq!(valley.location_of("Leah").as_deref(), Some("Home"));
}

// ---------------------------------------------------------------------------
// Reconciliation policy
// ---------------------------------------------------------------------------

#[test]
fn reconcile_is_idempotent() {
    let mut valley = Valley::new(&["Leah", "Emily"]);
    valley.put("Emily", "Town");
    let config = with_strictness(all_visit(), "Emily", StrictnessLevel::Strict);
    let plan = DecisionEngine::new(&config).compute_day(5, 9, &valley.roster(), |_| true);
    let mut cache = EntityCache::new();

    let first = reconcile_tick(&mut valley, &mut cache, &plan, &config.resort);
    assert!(first.changed_anything());
    let writes = valley.writes;

    let second = reconcile_tick(&mut valley, &mut cache, &plan, &config.resort);
    assert!(!second.changed_anything());
    assert_eq!(valley.writes, writes);
}

#[test]
fn strictness_levels_mid_day() {
    let mut valley = Valley::new(&["Strict", "Lenient", "Near", "Far"]);
    for name in ["Strict", "Lenient", "Near", "Far"] {
        valley.put(name, "Town");
    }
    valley.far.insert("Far".into());
    let config = with_strictness(all_visit(), "Strict", StrictnessLevel::Strict);
    let config = with_strictness(config, "Lenient", StrictnessLevel::Lenient);
    let plan = DecisionEngine::new(&config).compute_day(2, 4, &valley.roster(), |_| true);
    let mut cache = EntityCache::new();

    let report = reconcile_tick(&mut valley, &mut cache, &plan, &config.resort);
    assert_eq!(report.overwritten, 2);
    assert_eq!(report.tolerated, 2);
    assert_eq!(valley.location_of("Strict").as_deref(), Some("IslandSouth"));
    assert_eq!(valley.location_of("Far").as_deref(), Some("IslandSouth"));
    assert_eq!(valley.location_of("Lenient").as_deref(), Some("Town"));
    assert_eq!(valley.location_of("Near").as_deref(), Some("Town"));
}

#[test]
fn fixup_overrides_default_but_not_lenient() {
    let mut valley = Valley::new(&["Lenient", "Near"]);
    valley.put("Lenient", "Town");
    valley.put("Near", "Town");
    let config = with_strictness(all_visit(), "Lenient", StrictnessLevel::Lenient);
    let plan = DecisionEngine::new(&config).compute_day(2, 4, &valley.roster(), |_| true);
    let mut cache = EntityCache::new();

    let report = run_fixup(&mut valley, &mut cache, &plan, &config);
    assert_eq!(report.corrections.overwritten, 1);
    assert_eq!(report.corrections.tolerated, 1);
    assert_eq!(valley.location_of("Near").as_deref(), Some("IslandSouth"));
    assert_eq!(valley.location_of("Lenient").as_deref(), Some("Town"));
}

#[test]
fn excluded_entity_sent_home_from_resort() {
    let mut valley = Valley::new(&["Pam"]);
    valley.put("Pam", "IslandSouth");
    let mut config = with_strictness(all_visit(), "Pam", StrictnessLevel::Strict);
    config.allow.insert("Pam".into(), AllowFlag::Override(ExclusionOverride::Exclude));
    let plan = DecisionEngine::new(&config).compute_day(2, 4, &valley.roster(), |_| true);
    assert!(!plan.will_visit(&"Pam".into()));

    reconcile_tick(&mut valley, &mut EntityCache::new(), &plan, &config.resort);
    assert_eq!(valley.location_of("Pam").as_deref(), Some("Home"));
}

#[test]
fn unreachable_visitors_staged_at_fallback() {
    let mut valley = Valley::new(&["Willy"]);
    valley.far.insert("Willy".into());
    let config = all_visit();
    let mut ctl = LifecycleController::new(config, Authority::Authoritative);
    ctl.on_day_started(&valley, 8, 2);

    let TickOutcome::Finalized(report) = ctl.on_time_changed(&mut valley, ClockTime(900)) else {
        panic!("tick past cutoff should finalize");
    };
    assert_eq!(report.staged, 1);
    assert_eq!(valley.location_of("Willy").as_deref(), Some("Saloon"));
}

#[test]
fn far_visitor_injected_mid_day_is_staged_at_cutoff() {
    let mut valley = Valley::new(&["Willy"]);
    valley.far.insert("Willy".into());
    let mut ctl = LifecycleController::new(all_visit(), Authority::Authoritative);
    ctl.on_day_started(&valley, 8, 2);

    let TickOutcome::Reconciled(midday) = ctl.on_time_changed(&mut valley, ClockTime(600)) else {
        panic!("tick before cutoff should reconcile");
    };
    assert_eq!(midday.injected, 1);
    assert_eq!(valley.location_of("Willy").as_deref(), Some("IslandSouth"));

    let TickOutcome::Finalized(report) = ctl.on_time_changed(&mut valley, ClockTime(620)) else {
        panic!("tick past cutoff should finalize");
    };
    assert_eq!(report.staged, 1);
    assert_eq!(valley.location_of("Willy").as_deref(), Some("Saloon"));
}

#[test]
fn staging_can_be_switched_off() {
    let mut valley = Valley::new(&["Willy"]);
    valley.far.insert("Willy".into());
    let mut config = all_visit();
    config.scheduler.stage_far_entities_at_fallback = false;
    let plan = DecisionEngine::new(&config).compute_day(8, 2, &valley.roster(), |_| true);

    let report = run_fixup(&mut valley, &mut EntityCache::new(), &plan, &config);
    assert_eq!(report.staged, 0);
    assert_eq!(valley.location_of("Willy").as_deref(), Some("IslandSouth"));
}

#[test]
fn refused_writes_are_counted_not_fatal() {
    let mut valley = Valley::new(&["Leah", "Emily"]);
    valley.busy.insert("Emily".into());
    let config = all_visit();
    let plan = DecisionEngine::new(&config).compute_day(1, 1, &valley.roster(), |_| true);

    let report = reconcile_tick(&mut valley, &mut EntityCache::new(), &plan, &config.resort);
    assert_eq!(report.injected, 1);
    assert_eq!(report.failed, 1);
}

#[test]
fn entities_leaving_mid_day_are_skipped() {
    let mut valley = Valley::new(&["Leah", "Emily"]);
    let config = all_visit();
    let plan = DecisionEngine::new(&config).compute_day(1, 1, &valley.roster(), |_| true);
    valley.npcs.retain(|n| n.as_str() != "Emily");

    let report = reconcile_tick(&mut valley, &mut EntityCache::new(), &plan, &config.resort);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.injected, 1);
}
