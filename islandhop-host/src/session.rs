//! Event dispatch for one participant.
//!
//! A [`Session`] owns the participant's [`LifecycleController`] and the
//! collaborators the host supplies. Hosts that call back from several
//! threads share it through a [`SessionHandle`].
//!
//! ## Routing
//!
//! ```text
//! SaveLoaded       → version check (followers) / load save data (authority)
//! DayStarted       → LifecycleController::on_day_started
//! TimeChanged      → LifecycleController::on_time_changed
//! DayEnding        → LifecycleController::on_day_ending
//! ReturnedToTitle  → LifecycleController::on_returned_to_title
//! AssetRequested   → assets::route (load, then edit)
//! ButtonPressed    → ShopHandler, action button in normal gameplay only
//! ResortUnlocked   → hooks::on_resort_unlocked
//! ```

use std::path::Path;
use std::sync::Arc;

use islandhop_core::config::SchedulerConfig;
use islandhop_core::save_data::SaveDataStore;
use islandhop_core::{Authority, HostWorld, LifecycleController, TickOutcome};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::assets::{self, AssetRequest, AssetRouter};
use crate::events::HostEvent;
use crate::hooks;

/// Version of this integration, compared across participants.
pub const INTEGRATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Who this participant is in a multiplayer game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    /// This participant hosts the world (or plays alone).
    pub is_main_player: bool,
    /// Split-screen index; `0` for the first (or only) screen.
    pub screen_id: u32,
}

impl Participant {
    /// Single-player, or the host of a multiplayer game.
    pub const MAIN: Self = Self {
        is_main_player: true,
        screen_id: 0,
    };

    /// Whether this participant runs the scheduler.
    #[must_use]
    pub fn authority(self) -> Authority {
        if self.is_main_player && self.screen_id == 0 {
            Authority::Authoritative
        } else {
            Authority::Follower
        }
    }

    /// Secondary split-screen players share the first screen's process.
    #[must_use]
    pub fn is_split_screen_secondary(self) -> bool {
        self.screen_id != 0
    }
}

/// Handles the action button on shop tiles.
pub trait ShopHandler {
    /// Try to open a shop at `tile`. Returns whether one opened.
    fn on_action(&mut self, tile: (i32, i32)) -> bool;
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to do for this participant.
    Ignored,
    /// Handled with no further output.
    Handled,
    /// Outcome of a clock tick.
    Tick(TickOutcome),
    /// A routed asset request.
    Asset(AssetRequest),
    /// Whether a shop opened.
    Shop(bool),
    /// Whether the authoritative participant runs a compatible version.
    VersionChecked(bool),
    /// Dialogue assets invalidated after the resort opened.
    DialogueRefreshed(usize),
}

/// Compare the host's integration version with ours. Logs mismatches.
#[must_use]
pub fn check_host_version(own: &str, host: Option<&str>) -> bool {
    match host {
        None => {
            warn!("host does not have islandhop installed; visit schedules may desync");
            false
        }
        Some(v) if v != own => {
            warn!(host = v, own, "host runs a different islandhop version");
            false
        }
        Some(_) => true,
    }
}

/// One participant's scheduler plus the host collaborators it calls.
pub struct Session<W: HostWorld> {
    controller: LifecycleController<W::Handle>,
    participant: Participant,
    store: Box<dyn SaveDataStore + Send>,
    assets: Box<dyn AssetRouter + Send>,
    shops: Option<Box<dyn ShopHandler + Send>>,
}

impl<W: HostWorld> std::fmt::Debug for Session<W>
where
    W::Handle: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("controller", &self.controller)
            .field("participant", &self.participant)
            .finish_non_exhaustive()
    }
}

impl<W: HostWorld> Session<W> {
    /// New session with the given save store and asset router.
    pub fn new(
        config: SchedulerConfig,
        participant: Participant,
        store: Box<dyn SaveDataStore + Send>,
        assets: Box<dyn AssetRouter + Send>,
    ) -> Self {
        Self {
            controller: LifecycleController::new(config, participant.authority()),
            participant,
            store,
            assets,
            shops: None,
        }
    }

    /// Attach a shop handler for action-button presses.
    #[must_use]
    pub fn with_shops(mut self, shops: Box<dyn ShopHandler + Send>) -> Self {
        self.shops = Some(shops);
        self
    }

    /// The participant's controller.
    #[must_use]
    pub fn controller(&self) -> &LifecycleController<W::Handle> {
        &self.controller
    }

    /// Reload configuration from `path`, falling back to defaults.
    pub fn reload_config(&mut self, path: &Path) {
        let config = SchedulerConfig::load_or_default(path);
        info!(path = %path.display(), "configuration reloaded");
        self.controller.set_config(config);
    }

    /// Route one host event.
    pub fn dispatch(&mut self, world: &mut W, event: HostEvent) -> Dispatch {
        if self.participant.is_split_screen_secondary() && is_scheduling_event(&event) {
            return Dispatch::Ignored;
        }
        match event {
            HostEvent::SaveLoaded { host_version } => {
                self.on_save_loaded(world, host_version.as_deref())
            }
            HostEvent::DayStarted { day_count, world_id } => {
                if !self.controller.is_authoritative() {
                    return Dispatch::Ignored;
                }
                self.controller.on_day_started(world, day_count, world_id);
                Dispatch::Handled
            }
            HostEvent::TimeChanged { new_time } => {
                match self.controller.on_time_changed(world, new_time) {
                    TickOutcome::Ignored => Dispatch::Ignored,
                    outcome => Dispatch::Tick(outcome),
                }
            }
            HostEvent::DayEnding => {
                if !self.controller.is_authoritative() {
                    return Dispatch::Ignored;
                }
                self.controller.on_day_ending(world, self.store.as_mut());
                Dispatch::Handled
            }
            HostEvent::ReturnedToTitle => {
                self.controller.on_returned_to_title();
                Dispatch::Handled
            }
            HostEvent::AssetRequested { name } => {
                Dispatch::Asset(assets::route(self.assets.as_mut(), &name))
            }
            HostEvent::ButtonPressed { button, context, tile } => {
                if !button.is_action() || !context.is_normal_gameplay() {
                    return Dispatch::Ignored;
                }
                match self.shops.as_mut() {
                    Some(shops) => Dispatch::Shop(shops.on_action(tile)),
                    None => Dispatch::Ignored,
                }
            }
            HostEvent::ResortUnlocked => {
                let resort = &self.controller.config().resort;
                let refreshed = hooks::on_resort_unlocked(self.assets.as_mut(), resort);
                Dispatch::DialogueRefreshed(refreshed)
            }
        }
    }

    fn on_save_loaded(&mut self, world: &W, host_version: Option<&str>) -> Dispatch {
        if self.controller.is_authoritative() {
            self.controller.on_save_loaded(world, self.store.as_ref());
            return Dispatch::Handled;
        }
        debug!("follower save loaded, checking host version");
        Dispatch::VersionChecked(check_host_version(INTEGRATION_VERSION, host_version))
    }
}

fn is_scheduling_event(event: &HostEvent) -> bool {
    !matches!(event, HostEvent::AssetRequested { .. } | HostEvent::ButtonPressed { .. })
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Cloneable, lockable handle to a [`Session`].
pub struct SessionHandle<W: HostWorld> {
    inner: Arc<Mutex<Session<W>>>,
}

impl<W: HostWorld> Clone for SessionHandle<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: HostWorld> SessionHandle<W> {
    /// Wrap a session for sharing.
    #[must_use]
    pub fn new(session: Session<W>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock and dispatch one event.
    pub fn dispatch(&self, world: &mut W, event: HostEvent) -> Dispatch {
        self.inner.lock().dispatch(world, event)
    }

    /// Run `f` with the session locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session<W>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
