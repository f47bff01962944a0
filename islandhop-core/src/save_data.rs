//! Cross-day custom save data.
//!
//! The only state that outlives a day. Decisions themselves are never stored;
//! this is a running tally the host saves alongside its own save file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decision::DayPlan;
use crate::error::Result;
use crate::types::EntityId;

/// Data carried from one day to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSaveData {
    /// Last day a plan was recorded for.
    #[serde(default)]
    pub last_day: u32,
    /// Days each entity has visited the resort.
    #[serde(default)]
    pub visit_counts: BTreeMap<EntityId, u32>,
}

impl CustomSaveData {
    /// Fold a finished day's visitors into the tally. Recording the same day
    /// twice counts it once.
    pub fn record_day(&mut self, plan: &DayPlan) {
        if plan.day_count != 0 && plan.day_count <= self.last_day {
            debug!(day = plan.day_count, last = self.last_day, "day already recorded");
            return;
        }
        for visitor in plan.visitors() {
            *self.visit_counts.entry(visitor.clone()).or_default() += 1;
        }
        self.last_day = plan.day_count;
    }

    /// Days `entity` has visited.
    #[must_use]
    pub fn visits(&self, entity: &EntityId) -> u32 {
        self.visit_counts.get(entity).copied().unwrap_or(0)
    }
}

/// Where custom save data lives. Owned by the host integration.
pub trait SaveDataStore {
    /// Read the saved data. A store with nothing saved yet returns defaults.
    ///
    /// # Errors
    /// Returns an error if stored data exists but cannot be read.
    fn load(&self) -> Result<CustomSaveData>;

    /// Persist `data`, replacing what was there.
    ///
    /// # Errors
    /// Returns an error if the data cannot be written.
    fn save(&mut self, data: &CustomSaveData) -> Result<()>;
}

/// JSON file next to the host's save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveDataStore for JsonFileStore {
    fn load(&self) -> Result<CustomSaveData> {
        if !self.path.exists() {
            return Ok(CustomSaveData::default());
        }
        let bytes = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&mut self, data: &CustomSaveData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)?;
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), day = data.last_day, "saved custom data");
        Ok(())
    }
}

/// Store that keeps data in memory. For hosts without a save directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<CustomSaveData>,
}

impl SaveDataStore for MemoryStore {
    fn load(&self) -> Result<CustomSaveData> {
        Ok(self.data.clone().unwrap_or_default())
    }

    fn save(&mut self, data: &CustomSaveData) -> Result<()> {
        self.data = Some(data.clone());
        Ok(())
    }
}
