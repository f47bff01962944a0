//! Core type definitions for the islandhop scheduler.
//!
//! Everything here is plain data: cheap to clone, serializable where it
//! crosses the configuration surface, and free of host references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SchedError};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable identifier of an NPC, as used by the host's name resolver.
///
/// Ordering is the plain byte order of the name, which is what every
/// deterministic pass sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create an id from any string-like name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ---------------------------------------------------------------------------
// Per-entity policy
// ---------------------------------------------------------------------------

/// How forcefully mid-day reconciliation overrides a conflicting host schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrictnessLevel {
    /// Overwrite only when the host's own target is unreachable or invalid.
    #[default]
    Default,
    /// Never overwrite; conflicts are logged and tolerated.
    Lenient,
    /// Always overwrite a conflicting host schedule.
    Strict,
}

impl StrictnessLevel {
    /// Convert a raw discriminant as stored by the host's settings store.
    ///
    /// # Errors
    /// Returns [`SchedError::UnexpectedEnumValue`] for unknown discriminants.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Self::Default),
            1 => Ok(Self::Lenient),
            2 => Ok(Self::Strict),
            other => Err(SchedError::unexpected_enum::<Self>(other)),
        }
    }
}

impl std::str::FromStr for StrictnessLevel {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Default" => Ok(Self::Default),
            "Lenient" => Ok(Self::Lenient),
            "Strict" => Ok(Self::Strict),
            other => Err(SchedError::unexpected_enum::<Self>(other)),
        }
    }
}

/// Whether an entity is forced out of, forced into, or left to chance in the
/// daily visit lottery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusionOverride {
    /// Normal chance-based evaluation.
    #[default]
    Default,
    /// Never visits. Beats every probability.
    Exclude,
    /// Always visits, capacity permitting.
    Include,
}

impl ExclusionOverride {
    /// Convert a raw discriminant as stored by the host's settings store.
    ///
    /// # Errors
    /// Returns [`SchedError::UnexpectedEnumValue`] for unknown discriminants.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Self::Default),
            1 => Ok(Self::Exclude),
            2 => Ok(Self::Include),
            other => Err(SchedError::unexpected_enum::<Self>(other)),
        }
    }
}

impl std::str::FromStr for ExclusionOverride {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Default" => Ok(Self::Default),
            "Exclude" => Ok(Self::Exclude),
            "Include" => Ok(Self::Include),
            other => Err(SchedError::unexpected_enum::<Self>(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// The role an entity plays at the resort today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitRole {
    /// Not visiting.
    #[default]
    None,
    /// Part of the day's shared group, meeting at the group key.
    GroupMember,
    /// Visiting alone, wandering the resort.
    SoloExplorer,
    /// The designated special-case entity, decided outside capacity.
    SpecialCase,
}

/// The committed outcome for one entity and one day.
///
/// Built only by the decision engine; everything downstream reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Which entity this record is about.
    pub entity_id: EntityId,
    /// Whether the entity travels to the resort today.
    pub will_visit: bool,
    /// Role at the resort.
    pub role: VisitRole,
    /// Shared meeting point for group members.
    pub group_key: Option<String>,
    /// Reconciliation policy, carried along for the mid-day passes.
    pub strictness: StrictnessLevel,
}

impl DecisionRecord {
    /// A "stays home" record.
    #[must_use]
    pub fn stays_home(entity_id: EntityId, strictness: StrictnessLevel) -> Self {
        Self {
            entity_id,
            will_visit: false,
            role: VisitRole::None,
            group_key: None,
            strictness,
        }
    }

    /// A visiting record with the given role.
    #[must_use]
    pub fn visiting(
        entity_id: EntityId,
        role: VisitRole,
        group_key: Option<String>,
        strictness: StrictnessLevel,
    ) -> Self {
        Self {
            entity_id,
            will_visit: true,
            role,
            group_key,
            strictness,
        }
    }
}

// ---------------------------------------------------------------------------
// Day & time
// ---------------------------------------------------------------------------

/// Phase of the per-day state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayPhase {
    /// No day in progress (before day start, after day end, at the title menu).
    #[default]
    Idle,
    /// Plan committed, no tick processed yet.
    Pending,
    /// Live correction on every tick.
    Reconciling,
    /// Fix-up done; nothing more happens until the day ends.
    Finalized,
}

/// Day of the week, as the host's calendar counts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    #[default]
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayOfWeek {
    /// All days, in calendar order.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Weekday of an absolute day count. Day 1 is a Monday.
    #[must_use]
    pub fn from_day_count(day_count: u32) -> Self {
        Self::ALL[(day_count.saturating_sub(1) % 7) as usize]
    }
}

/// In-game clock value in the host's `HHMM` encoding (06:15 is `615`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime(pub u16);

impl ClockTime {
    /// The end of the reconciliation window.
    pub const FIXUP_CUTOFF: Self = Self(615);

    /// Hours component.
    #[must_use]
    pub fn hours(self) -> u16 {
        self.0 / 100
    }

    /// Minutes component.
    #[must_use]
    pub fn minutes(self) -> u16 {
        self.0 % 100
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

/// Where an entity is headed for the day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelTarget {
    /// Host location name.
    pub location: String,
    /// Named spot inside the location, if any.
    pub spot: Option<String>,
}

impl TravelTarget {
    /// Target a whole location.
    #[must_use]
    pub fn location(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            spot: None,
        }
    }

    /// Target a named spot inside a location.
    #[must_use]
    pub fn spot(location: impl Into<String>, spot: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            spot: Some(spot.into()),
        }
    }
}

impl fmt::Display for TravelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.spot {
            Some(spot) => write!(f, "{}@{spot}", self.location),
            None => f.write_str(&self.location),
        }
    }
}

/// An entity's host-native travel assignment for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeSchedule {
    /// The host failed to load a schedule, or the entity has none.
    Missing,
    /// The host's own target.
    Target(TravelTarget),
}
