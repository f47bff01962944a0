//! Settings enumeration for an external settings UI.
//!
//! [`describe`] lists every option with its current value and bounds;
//! [`apply`] writes one value back. Rendering is the UI's business.

use islandhop_core::config::{AllowFlag, ClothingPolicy, MAX_CAPACITY, SchedulerConfig};
use islandhop_core::types::{DayOfWeek, EntityId, ExclusionOverride, StrictnessLevel};
use islandhop_core::{Result, SchedError};

const STRICTNESS_CHOICES: &[&str] = &["Default", "Lenient", "Strict"];
const EXCLUSION_CHOICES: &[&str] = &["Default", "Exclude", "Include"];
const CLOTHING_CHOICES: &[&str] = &["Vanilla", "All", "None"];
const WEEKDAY_CHOICES: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// A value as the settings UI edits it.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// On/off.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Fraction.
    Float(f64),
    /// One of a fixed set of names.
    Choice(String),
}

/// Shape of one option.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingKind {
    /// Checkbox.
    Bool,
    /// Integer slider.
    Int {
        /// Inclusive minimum.
        min: i64,
        /// Inclusive maximum.
        max: i64,
    },
    /// Fractional slider.
    Float {
        /// Inclusive minimum.
        min: f64,
        /// Inclusive maximum.
        max: f64,
    },
    /// Dropdown.
    Choice {
        /// Allowed names.
        options: &'static [&'static str],
    },
}

/// One option the UI can show.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    /// Dotted key, e.g. `scheduler.capacity` or `strictness.Leah`.
    pub key: String,
    /// Page the option belongs on.
    pub section: &'static str,
    /// Shape and bounds.
    pub kind: SettingKind,
    /// Current value.
    pub value: SettingValue,
}

impl SettingDescriptor {
    fn new(
        key: impl Into<String>,
        section: &'static str,
        kind: SettingKind,
        value: SettingValue,
    ) -> Self {
        Self {
            key: key.into(),
            section,
            kind,
            value,
        }
    }
}

fn choice(value: impl std::fmt::Debug) -> SettingValue {
    SettingValue::Choice(format!("{value:?}"))
}

const FRACTION: SettingKind = SettingKind::Float { min: 0.0, max: 1.0 };

/// Every option in `config`, static ones first, then the per-entity families.
#[must_use]
pub fn describe(config: &SchedulerConfig) -> Vec<SettingDescriptor> {
    let s = &config.scheduler;
    let c = &config.chances;
    let mut out = vec![
        SettingDescriptor::new(
            "general.debug_mode",
            "general",
            SettingKind::Bool,
            SettingValue::Bool(config.general.debug_mode),
        ),
        SettingDescriptor::new(
            "scheduler.enforce_timing",
            "scheduler",
            SettingKind::Bool,
            SettingValue::Bool(s.enforce_timing),
        ),
        SettingDescriptor::new(
            "scheduler.require_resort_unlocked",
            "scheduler",
            SettingKind::Bool,
            SettingValue::Bool(s.require_resort_unlocked),
        ),
        SettingDescriptor::new(
            "scheduler.clothing_policy",
            "scheduler",
            SettingKind::Choice { options: CLOTHING_CHOICES },
            choice(s.clothing_policy),
        ),
        SettingDescriptor::new(
            "scheduler.use_this_scheduler",
            "scheduler",
            SettingKind::Bool,
            SettingValue::Bool(s.use_this_scheduler),
        ),
        SettingDescriptor::new(
            "scheduler.capacity",
            "scheduler",
            SettingKind::Int { min: 0, max: i64::from(MAX_CAPACITY) },
            SettingValue::Int(i64::from(s.capacity)),
        ),
        SettingDescriptor::new(
            "scheduler.stage_far_entities_at_fallback",
            "scheduler",
            SettingKind::Bool,
            SettingValue::Bool(s.stage_far_entities_at_fallback),
        ),
        SettingDescriptor::new(
            "chances.group_chance",
            "chances",
            FRACTION,
            SettingValue::Float(c.group_chance),
        ),
        SettingDescriptor::new(
            "chances.explorer_chance",
            "chances",
            FRACTION,
            SettingValue::Float(c.explorer_chance),
        ),
        SettingDescriptor::new(
            "chances.special_case_weekday",
            "chances",
            SettingKind::Choice { options: WEEKDAY_CHOICES },
            choice(c.special_case_weekday),
        ),
        SettingDescriptor::new(
            "chances.special_case_chance",
            "chances",
            FRACTION,
            SettingValue::Float(c.special_case_chance),
        ),
    ];

    for (entity, flag) in &config.allow {
        let key = format!("allow.{entity}");
        out.push(match flag {
            AllowFlag::Toggle(on) => {
                SettingDescriptor::new(key, "allow", SettingKind::Bool, SettingValue::Bool(*on))
            }
            AllowFlag::Override(o) => SettingDescriptor::new(
                key,
                "allow",
                SettingKind::Choice { options: EXCLUSION_CHOICES },
                choice(o),
            ),
        });
    }
    for (entity, level) in &config.strictness {
        out.push(SettingDescriptor::new(
            format!("strictness.{entity}"),
            "strictness",
            SettingKind::Choice { options: STRICTNESS_CHOICES },
            choice(level),
        ));
    }
    out
}

/// Write one option back into `config`.
///
/// # Errors
/// Returns [`SchedError::Config`] for unknown keys or mismatched value types,
/// and [`SchedError::UnexpectedEnumValue`] for unknown choice names.
pub fn apply(config: &mut SchedulerConfig, key: &str, value: SettingValue) -> Result<()> {
    let mismatch = || SchedError::Config(format!("wrong value type for {key}"));
    if let Some(entity) = key.strip_prefix("allow.") {
        let flag = match value {
            SettingValue::Bool(on) => AllowFlag::Toggle(on),
            SettingValue::Choice(name) => AllowFlag::Override(name.parse::<ExclusionOverride>()?),
            _ => return Err(mismatch()),
        };
        config.allow.insert(EntityId::from(entity), flag);
        return Ok(());
    }
    if let Some(entity) = key.strip_prefix("strictness.") {
        let SettingValue::Choice(name) = value else {
            return Err(mismatch());
        };
        config.strictness.insert(EntityId::from(entity), name.parse::<StrictnessLevel>()?);
        return Ok(());
    }

    let s = &mut config.scheduler;
    let c = &mut config.chances;
    match (key, value) {
        ("general.debug_mode", SettingValue::Bool(v)) => config.general.debug_mode = v,
        ("scheduler.enforce_timing", SettingValue::Bool(v)) => s.enforce_timing = v,
        ("scheduler.require_resort_unlocked", SettingValue::Bool(v)) => {
            s.require_resort_unlocked = v;
        }
        ("scheduler.use_this_scheduler", SettingValue::Bool(v)) => s.use_this_scheduler = v,
        ("scheduler.stage_far_entities_at_fallback", SettingValue::Bool(v)) => {
            s.stage_far_entities_at_fallback = v;
        }
        ("scheduler.clothing_policy", SettingValue::Choice(v)) => {
            s.clothing_policy = parse_clothing(&v)?;
        }
        ("scheduler.capacity", SettingValue::Int(v)) => {
            s.capacity = u8::try_from(v.clamp(0, i64::from(MAX_CAPACITY))).unwrap_or(MAX_CAPACITY);
        }
        ("chances.group_chance", SettingValue::Float(v)) => c.group_chance = v.clamp(0.0, 1.0),
        ("chances.explorer_chance", SettingValue::Float(v)) => {
            c.explorer_chance = v.clamp(0.0, 1.0);
        }
        ("chances.special_case_chance", SettingValue::Float(v)) => {
            c.special_case_chance = v.clamp(0.0, 1.0);
        }
        ("chances.special_case_weekday", SettingValue::Choice(v)) => {
            c.special_case_weekday = parse_weekday(&v)?;
        }
        (other, _) if describe(&SchedulerConfig::default()).iter().any(|d| d.key == other) => {
            return Err(mismatch());
        }
        (other, _) => return Err(SchedError::Config(format!("unknown setting {other}"))),
    }
    Ok(())
}

fn parse_clothing(name: &str) -> Result<ClothingPolicy> {
    match name {
        "Vanilla" => Ok(ClothingPolicy::Vanilla),
        "All" => Ok(ClothingPolicy::All),
        "None" => Ok(ClothingPolicy::None),
        other => Err(SchedError::unexpected_enum::<ClothingPolicy>(other)),
    }
}

fn parse_weekday(name: &str) -> Result<DayOfWeek> {
    WEEKDAY_CHOICES
        .iter()
        .position(|d| *d == name)
        .map(|i| DayOfWeek::ALL[i])
        .ok_or_else(|| SchedError::unexpected_enum::<DayOfWeek>(name))
}
