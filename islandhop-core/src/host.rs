//! The narrow interface the scheduler needs from the host simulation.
//!
//! The host owns every entity; the scheduler only ever holds handles it got
//! back from [`EntityResolver::resolve`], and only for the current day.

use crate::error::Result;
use crate::types::{EntityId, NativeSchedule, TravelTarget};

/// Canonical name → handle resolution.
pub trait EntityResolver {
    /// Host-side reference to a live entity.
    type Handle: Clone;

    /// Resolve a name, or `None` if the host has no such entity right now.
    fn resolve(&self, name: &EntityId) -> Option<Self::Handle>;
}

/// Everything the daily passes read from and write to the host world.
pub trait HostWorld: EntityResolver {
    /// Every NPC the host knows about, in any order.
    fn roster(&self) -> Vec<EntityId>;

    /// Whether the resort is open for visitors.
    fn resort_unlocked(&self) -> bool;

    /// The entity's host-native travel assignment for today.
    fn native_schedule(&self, handle: &Self::Handle) -> NativeSchedule;

    /// Whether the host can actually route the entity to `target`.
    fn is_reachable(&self, handle: &Self::Handle, target: &TravelTarget) -> bool;

    /// Where the entity goes when it is not visiting (usually home).
    fn fallback_target(&self, handle: &Self::Handle) -> Option<TravelTarget>;

    /// Replace the entity's travel target for the rest of the day.
    ///
    /// # Errors
    /// Host-defined; callers log and continue.
    fn set_travel_target(&mut self, handle: &Self::Handle, target: &TravelTarget) -> Result<()>;

    /// Drop the host's own list of today's resort visitors.
    fn clear_visitors(&mut self);
}
