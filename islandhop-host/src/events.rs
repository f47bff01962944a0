//! Host events the scheduler reacts to.
//!
//! The host translates its own callbacks into [`HostEvent`]s and hands them
//! to [`crate::session::Session::dispatch`].

use islandhop_core::types::ClockTime;

/// A host callback, already translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A save was loaded. `host_version` is the version of this integration
    /// the authoritative participant reported, if it has it at all.
    SaveLoaded {
        /// Version string reported by the authoritative participant.
        host_version: Option<String>,
    },

    /// A new in-game day began.
    DayStarted {
        /// Absolute day count since the save began.
        day_count: u32,
        /// World-unique identifier, shared by all participants.
        world_id: u64,
    },

    /// The in-game clock advanced.
    TimeChanged {
        /// The new clock value.
        new_time: ClockTime,
    },

    /// The day is about to end and the host is about to save.
    DayEnding,

    /// The player left to the title screen.
    ReturnedToTitle,

    /// The host is asking who provides or edits an asset.
    AssetRequested {
        /// Asset name as the host knows it.
        name: String,
    },

    /// A button was pressed.
    ButtonPressed {
        /// Which kind of button.
        button: Button,
        /// What the player was doing at the time.
        context: GameplayContext,
        /// Tile the player was facing.
        tile: (i32, i32),
    },

    /// The resort became accessible for the first time.
    ResortUnlocked,
}

/// Button classes the integration distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// The "interact / check" button.
    Action,
    /// Anything else.
    Other,
}

/// Snapshot of player state when a button was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GameplayContext {
    /// A world is loaded.
    pub world_ready: bool,
    /// A menu, dialogue box or cutscene has focus.
    pub menu_open: bool,
    /// The player can move and interact.
    pub can_move: bool,
}

impl GameplayContext {
    /// Normal gameplay: world loaded, nothing modal open, player free.
    #[must_use]
    pub fn is_normal_gameplay(&self) -> bool {
        self.world_ready && !self.menu_open && self.can_move
    }
}

impl Button {
    /// Whether this is the action button.
    #[must_use]
    pub fn is_action(self) -> bool {
        matches!(self, Self::Action)
    }
}
