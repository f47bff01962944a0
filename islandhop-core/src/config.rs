//! Configuration for the islandhop scheduler.
//!
//! Maps directly to `islandhop.toml`. Every field has a default, so a partial
//! file is fine and an unreadable one degrades to [`SchedulerConfig::default`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SchedError};
use crate::types::{DayOfWeek, EntityId, ExclusionOverride, StrictnessLevel};

/// Highest capacity the settings surface allows.
pub const MAX_CAPACITY: u8 = 15;

/// Top-level scheduler configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Scheduler switches and the capacity bound.
    #[serde(default)]
    pub scheduler: SchedulerOptions,
    /// Role probabilities.
    #[serde(default)]
    pub chances: RoleChances,
    /// Location and spot names used for travel targets.
    #[serde(default)]
    pub resort: ResortConfig,
    /// Per-entity reconciliation policy. Filled lazily from the roster.
    #[serde(default)]
    pub strictness: BTreeMap<EntityId, StrictnessLevel>,
    /// Per-entity `Allow*` overrides: a bool toggle or an exclusion override.
    #[serde(default)]
    pub allow: BTreeMap<EntityId, AllowFlag>,
}

impl SchedulerConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SchedError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SchedError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load and validate, falling back to defaults when the file is missing
    /// or ill-formatted. Never fails.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config.validated(),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Config file seems ill-formatted, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Serialize back to TOML (used when the settings surface saves).
    ///
    /// # Errors
    /// Returns `SchedError::Serialization` if a value cannot be represented.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SchedError::Serialization(e.to_string()))
    }

    /// Write the config to `path`.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Clamp out-of-range values, warning about each one.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.scheduler.capacity > MAX_CAPACITY {
            warn!(capacity = self.scheduler.capacity, "capacity above {MAX_CAPACITY}, clamping");
            self.scheduler.capacity = MAX_CAPACITY;
        }
        let chances = &mut self.chances;
        chances.group_chance =
            clamp_chance("group_chance", chances.group_chance, default_group_chance());
        chances.explorer_chance =
            clamp_chance("explorer_chance", chances.explorer_chance, default_explorer_chance());
        chances.special_case_chance = clamp_chance(
            "special_case_chance",
            chances.special_case_chance,
            default_special_case_chance(),
        );
        self
    }

    /// Exclusion override for an entity; `Default` when unconfigured.
    #[must_use]
    pub fn exclusion_for(&self, entity: &EntityId) -> ExclusionOverride {
        self.allow
            .get(entity)
            .map_or(ExclusionOverride::Default, AllowFlag::exclusion)
    }

    /// Strictness for an entity; `Default` when unconfigured.
    #[must_use]
    pub fn strictness_for(&self, entity: &EntityId) -> StrictnessLevel {
        self.strictness.get(entity).copied().unwrap_or_default()
    }

    /// Give every roster entity without a strictness entry the default level.
    ///
    /// Returns how many entries were added.
    pub fn populate_strictness<'a>(
        &mut self,
        roster: impl IntoIterator<Item = &'a EntityId>,
    ) -> usize {
        let before = self.strictness.len();
        for entity in roster {
            self.strictness.entry(entity.clone()).or_default();
        }
        self.strictness.len() - before
    }
}

fn clamp_chance(name: &str, value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        warn!(option = name, "chance is NaN, using default {fallback}");
        fallback
    } else if !(0.0..=1.0).contains(&value) {
        warn!(option = name, value, "chance outside [0, 1], clamping");
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra per-entity logging and diagnostics.
    #[serde(default)]
    pub debug_mode: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            debug_mode: false,
        }
    }
}

/// What visitors wear at the resort. Consumed by the outfit collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClothingPolicy {
    /// Only entities the host ships resort outfits for.
    #[default]
    Vanilla,
    /// Every visitor that has an outfit available.
    All,
    /// Nobody changes.
    None,
}

/// Scheduler switches and the capacity bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Keep visitors to the host's resort opening hours.
    #[serde(default = "default_true")]
    pub enforce_timing: bool,
    /// No visitors at all until the resort is unlocked.
    #[serde(default = "default_true")]
    pub require_resort_unlocked: bool,
    /// Outfit policy for visitors.
    #[serde(default)]
    pub clothing_policy: ClothingPolicy,
    /// Replace the host's own visitor lottery with this scheduler.
    #[serde(default = "default_true")]
    pub use_this_scheduler: bool,
    /// Maximum visitors per day, `0..=15`.
    #[serde(default = "default_capacity")]
    pub capacity: u8,
    /// Stage visitors the host cannot route directly at the fallback location.
    #[serde(default = "default_true")]
    pub stage_far_entities_at_fallback: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            enforce_timing: true,
            require_resort_unlocked: true,
            clothing_policy: ClothingPolicy::default(),
            use_this_scheduler: true,
            capacity: default_capacity(),
            stage_far_entities_at_fallback: true,
        }
    }
}

/// Role probabilities and the special-case gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChances {
    /// Chance an eligible entity joins the day's group.
    #[serde(default = "default_group_chance")]
    pub group_chance: f64,
    /// Chance an entity not in the group explores alone.
    #[serde(default = "default_explorer_chance")]
    pub explorer_chance: f64,
    /// The only weekday the special case is rolled.
    #[serde(default)]
    pub special_case_weekday: DayOfWeek,
    /// Chance the special-case entity visits on its weekday.
    #[serde(default = "default_special_case_chance")]
    pub special_case_chance: f64,
    /// The designated special-case entity.
    #[serde(default = "default_special_case_entity")]
    pub special_case_entity: EntityId,
}

impl Default for RoleChances {
    fn default() -> Self {
        Self {
            group_chance: default_group_chance(),
            explorer_chance: default_explorer_chance(),
            special_case_weekday: DayOfWeek::default(),
            special_case_chance: default_special_case_chance(),
            special_case_entity: default_special_case_entity(),
        }
    }
}

/// Location and spot names used when building travel targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortConfig {
    /// The resort location.
    #[serde(default = "default_destination")]
    pub destination: String,
    /// Where far-away visitors are staged when they cannot be routed.
    #[serde(default = "default_fallback_location")]
    pub fallback_location: String,
    /// Candidate group meeting points; one is drawn per day.
    #[serde(default = "default_meeting_points")]
    pub meeting_points: Vec<String>,
    /// Spot solo explorers head for.
    #[serde(default = "default_explorer_spot")]
    pub explorer_spot: String,
    /// Spot the special-case entity heads for.
    #[serde(default = "default_special_case_spot")]
    pub special_case_spot: String,
    /// Locations where NPCs may not trample or destroy objects.
    #[serde(default = "default_protected_locations")]
    pub protected_locations: Vec<String>,
    /// Characters whose dialogue is re-fetched once the resort opens.
    #[serde(default)]
    pub dialogue_characters: Vec<EntityId>,
}

impl Default for ResortConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            fallback_location: default_fallback_location(),
            meeting_points: default_meeting_points(),
            explorer_spot: default_explorer_spot(),
            special_case_spot: default_special_case_spot(),
            protected_locations: default_protected_locations(),
            dialogue_characters: Vec::new(),
        }
    }
}

/// One `Allow*` entry: either a plain toggle or a full exclusion override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowFlag {
    /// `true` leaves the entity to chance, `false` excludes it.
    Toggle(bool),
    /// Explicit override.
    Override(ExclusionOverride),
}

impl AllowFlag {
    /// The exclusion override this flag amounts to.
    #[must_use]
    pub fn exclusion(&self) -> ExclusionOverride {
        match self {
            Self::Toggle(true) => ExclusionOverride::Default,
            Self::Toggle(false) => ExclusionOverride::Exclude,
            Self::Override(o) => *o,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_capacity() -> u8 { 6 }
fn default_group_chance() -> f64 { 0.6 }
fn default_explorer_chance() -> f64 { 0.05 }
fn default_special_case_chance() -> f64 { 0.5 }
fn default_special_case_entity() -> EntityId { EntityId::new("Gus") }
fn default_destination() -> String { "IslandSouth".to_string() }
fn default_fallback_location() -> String { "Saloon".to_string() }
fn default_meeting_points() -> Vec<String> {
    ["beach_towels", "dance_floor", "bar_counter", "pier"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_explorer_spot() -> String { "north_trail".to_string() }
fn default_special_case_spot() -> String { "bar_service".to_string() }
fn default_protected_locations() -> Vec<String> { vec!["IslandWest".to_string()] }

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
