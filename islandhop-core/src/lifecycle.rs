//! Day lifecycle controller.
//!
//! Owns the per-day state machine:
//!
//! ```text
//! Idle ──day started──▶ Pending ──first tick──▶ Reconciling ──cutoff──▶ Finalized
//!  ▲                                                                        │
//!  └──────────────────────────────── day ending ◀───────────────────────────┘
//! ```
//!
//! Only the authoritative participant drives it; on every other participant
//! each handler returns without touching the world.

use tracing::{debug, info, trace, warn};

use crate::cache::EntityCache;
use crate::config::SchedulerConfig;
use crate::decision::{DayPlan, DecisionEngine};
use crate::fixup::{FixupReport, run_fixup};
use crate::host::HostWorld;
use crate::reconcile::{ReconcileReport, reconcile_tick};
use crate::save_data::{CustomSaveData, SaveDataStore};
use crate::types::{ClockTime, DayPhase, EntityId};

/// Whether this participant may write scheduling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// Host, or single-player. Runs the state machine.
    Authoritative,
    /// Remote or split-screen participant. Observes only.
    Follower,
}

/// What a time tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not authoritative, no plan, or the day is already finalized.
    Ignored,
    /// A mid-day reconciliation pass ran.
    Reconciled(ReconcileReport),
    /// The one-shot fix-up ran and the day is finalized.
    Finalized(FixupReport),
}

/// Drives one participant's scheduling day.
#[derive(Debug)]
pub struct LifecycleController<H> {
    config: SchedulerConfig,
    authority: Authority,
    phase: DayPhase,
    fixup_done: bool,
    cache: EntityCache<H>,
    plan: Option<DayPlan>,
    strictness_populated: bool,
    save_data: CustomSaveData,
}

impl<H: Clone> LifecycleController<H> {
    /// New controller in the `Idle` phase.
    #[must_use]
    pub fn new(config: SchedulerConfig, authority: Authority) -> Self {
        Self {
            config: config.validated(),
            authority,
            phase: DayPhase::Idle,
            fixup_done: false,
            cache: EntityCache::new(),
            plan: None,
            strictness_populated: false,
            save_data: CustomSaveData::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    /// Whether today's fix-up has run.
    #[must_use]
    pub fn fixup_done(&self) -> bool {
        self.fixup_done
    }

    /// Today's committed plan, if any.
    #[must_use]
    pub fn plan(&self) -> Option<&DayPlan> {
        self.plan.as_ref()
    }

    /// Entries in the per-day lookup cache.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next day started.
    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config.validated();
        self.strictness_populated = false;
    }

    /// Cross-day tallies.
    #[must_use]
    pub fn save_data(&self) -> &CustomSaveData {
        &self.save_data
    }

    /// Whether this participant drives the state machine.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.authority == Authority::Authoritative
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    /// Load cross-day data and fill in strictness defaults for the roster.
    pub fn on_save_loaded<W>(&mut self, world: &W, store: &dyn SaveDataStore)
    where
        W: HostWorld<Handle = H>,
    {
        if !self.is_authoritative() {
            return;
        }
        self.save_data = match store.load() {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "custom save data unreadable, starting fresh");
                CustomSaveData::default()
            }
        };
        self.ensure_strictness(world);
        info!(last_day = self.save_data.last_day, "save loaded");
    }

    /// Commit the day's plan and enter `Pending`.
    ///
    /// The lookup cache stays empty: the plan only asks the host whether each
    /// entity resolves, and handles are cached lazily by the ticks.
    pub fn on_day_started<W>(&mut self, world: &W, day_count: u32, world_id: u64)
    where
        W: HostWorld<Handle = H>,
    {
        if !self.is_authoritative() {
            trace!(day = day_count, "not authoritative, ignoring day start");
            return;
        }
        if self.phase != DayPhase::Idle {
            warn!(
                phase = ?self.phase,
                day = day_count,
                "day started without day ending, resetting"
            );
        }
        self.cache.clear();
        self.fixup_done = false;
        self.ensure_strictness(world);

        let roster = world.roster();
        let engine = DecisionEngine::new(&self.config);
        let resolvable = |id: &EntityId| world.resolve(id).is_some();
        let plan = if !self.config.scheduler.use_this_scheduler {
            debug!(day = day_count, "scheduler disabled, committing empty plan");
            DayPlan::empty(day_count)
        } else if self.config.scheduler.require_resort_unlocked && !world.resort_unlocked() {
            debug!(day = day_count, "resort locked, everyone stays home");
            engine.closed_day(day_count, &roster, resolvable)
        } else {
            engine.compute_day(day_count, world_id, &roster, resolvable)
        };

        self.plan = Some(plan);
        self.phase = DayPhase::Pending;
    }

    /// Handle a clock tick.
    pub fn on_time_changed<W>(&mut self, world: &mut W, now: ClockTime) -> TickOutcome
    where
        W: HostWorld<Handle = H>,
    {
        if !self.is_authoritative() {
            return TickOutcome::Ignored;
        }
        let Some(plan) = self.plan.as_ref() else {
            return TickOutcome::Ignored;
        };
        match self.phase {
            DayPhase::Idle | DayPhase::Finalized => return TickOutcome::Ignored,
            DayPhase::Pending => {
                debug!(time = %now, "first tick, reconciling");
                self.phase = DayPhase::Reconciling;
            }
            DayPhase::Reconciling => {}
        }

        if now >= ClockTime::FIXUP_CUTOFF && !self.fixup_done {
            let report = run_fixup(world, &mut self.cache, plan, &self.config);
            self.fixup_done = true;
            self.phase = DayPhase::Finalized;
            return TickOutcome::Finalized(report);
        }
        TickOutcome::Reconciled(reconcile_tick(world, &mut self.cache, plan, &self.config.resort))
    }

    /// Tally the day, clear the host's visitor list, save, and return to
    /// `Idle`. Every per-day structure is dropped.
    pub fn on_day_ending<W>(&mut self, world: &mut W, store: &mut dyn SaveDataStore)
    where
        W: HostWorld<Handle = H>,
    {
        if !self.is_authoritative() {
            return;
        }
        if let Some(plan) = self.plan.take() {
            self.save_data.record_day(&plan);
        }
        world.clear_visitors();
        if let Err(err) = store.save(&self.save_data) {
            warn!(error = %err, "failed to save custom data");
        }
        self.reset_day();
    }

    /// Leaving to the title screen: drop everything, including cross-day data.
    pub fn on_returned_to_title(&mut self) {
        self.reset_day();
        self.plan = None;
        self.strictness_populated = false;
        self.save_data = CustomSaveData::default();
        debug!("returned to title, scheduler state cleared");
    }

    fn reset_day(&mut self) {
        self.cache.clear();
        self.fixup_done = false;
        self.phase = DayPhase::Idle;
    }

    fn ensure_strictness<W: HostWorld>(&mut self, world: &W) {
        if self.strictness_populated {
            return;
        }
        let roster = world.roster();
        let added = self.config.populate_strictness(&roster);
        self.strictness_populated = true;
        debug!(added, "populated strictness defaults");
    }
}
