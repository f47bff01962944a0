//! # Islandhop Core
//!
//! Deterministic daily scheduler for NPC visits to a resort location.
//!
//! Each in-game day the scheduler:
//!
//! 1. **Decides** who visits, in which role, from a seeded stream keyed on
//!    the world and the day ([`DecisionEngine`]). Every participant that
//!    computes the same day gets the same plan.
//! 2. **Reconciles** the host's native schedules against that plan on every
//!    clock tick ([`reconcile::reconcile_tick`]), under each entity's
//!    [`StrictnessLevel`].
//! 3. **Fixes up** remaining conflicts exactly once at the cutoff time
//!    ([`fixup::run_fixup`]).
//!
//! [`LifecycleController`] ties the three together and owns all per-day
//! state. The host simulation is reached only through [`HostWorld`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod decision;
pub mod error;
pub mod fixup;
pub mod host;
pub mod lifecycle;
pub mod random;
pub mod reconcile;
pub mod save_data;
pub mod types;

#[cfg(test)]
mod test_support;

pub use cache::EntityCache;
pub use config::SchedulerConfig;
pub use decision::{DayPlan, DecisionEngine};
pub use error::{Result, SchedError};
pub use host::{EntityResolver, HostWorld};
pub use lifecycle::{Authority, LifecycleController, TickOutcome};
pub use random::SeededRandom;
pub use save_data::{CustomSaveData, JsonFileStore, SaveDataStore};
pub use types::*;
