//! Hooks into host scheduling and pathing.
//!
//! Each hook is a pure decision the host patch applies; none of them touch
//! the world directly.

use islandhop_core::config::ResortConfig;
use islandhop_core::decision::DayPlan;
use islandhop_core::types::EntityId;
use tracing::{debug, trace};

use crate::assets::{AssetRouter, dialogue_asset};
use crate::logging::log_error;

/// Speed given to visitors with a long walk.
pub const BOOSTED_SPEED: u32 = 4;

/// Travel-time threshold above which visitors are boosted.
const LONG_TRIP: usize = 340;

/// What the host should do with the original routine it hooked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Run the host's own routine.
    RunOriginal,
    /// Skip it and report `result` as its return value.
    Skip {
        /// Value the skipped routine returns.
        result: bool,
    },
}

/// Movement override for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelBoost {
    /// New walking speed.
    pub speed: u32,
    /// Whether the entity ignores collisions while walking.
    pub charging: bool,
}

/// Skip schedule parsing for entities whose raw schedule is absent or empty.
///
/// The host would otherwise throw on an empty schedule; skipping it with
/// `false` leaves the entity with no schedule for the day.
#[must_use]
pub fn skip_empty_schedule(entity: &EntityId, raw_entry_count: Option<usize>) -> HookDecision {
    match raw_entry_count {
        None | Some(0) => {
            debug!(entity = %entity, "empty raw schedule, skipping host parse");
            HookDecision::Skip { result: false }
        }
        Some(_) => HookDecision::RunOriginal,
    }
}

/// Speed up today's visitors when the walk to their target is long.
#[must_use]
pub fn travel_speed_boost(
    entity: &EntityId,
    path_len: usize,
    plan: Option<&DayPlan>,
) -> Option<TravelBoost> {
    let visiting = plan.is_some_and(|p| p.will_visit(entity));
    if !visiting || path_len.saturating_mul(32) / 42 <= LONG_TRIP {
        return None;
    }
    trace!(entity = %entity, path_len, "boosting visitor speed");
    Some(TravelBoost {
        speed: BOOSTED_SPEED,
        charging: true,
    })
}

/// Keep visitors from trampling or destroying objects on protected locations.
#[must_use]
pub fn prevent_trample(location: &str, resort: &ResortConfig) -> HookDecision {
    if resort.protected_locations.iter().any(|p| p == location) {
        HookDecision::Skip { result: false }
    } else {
        HookDecision::RunOriginal
    }
}

/// Re-fetch dialogue of the configured characters once the resort opens.
///
/// Returns how many assets were invalidated. Failures are logged and skipped.
pub fn on_resort_unlocked(router: &mut dyn AssetRouter, resort: &ResortConfig) -> usize {
    let mut invalidated = 0;
    for character in &resort.dialogue_characters {
        let name = dialogue_asset(character.as_str());
        match router.invalidate(&name) {
            Ok(()) => invalidated += 1,
            Err(err) => log_error(&format!("invalidating {name}"), &err),
        }
    }
    debug!(invalidated, "resort unlocked, dialogue refreshed");
    invalidated
}
