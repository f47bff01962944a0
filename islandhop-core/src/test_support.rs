//! In-memory host world shared by unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::error::{Result, SchedError};
use crate::host::{EntityResolver, HostWorld};
use crate::types::{EntityId, NativeSchedule, TravelTarget};

#[derive(Debug, Default)]
pub(crate) struct MockWorld {
    pub roster: Vec<EntityId>,
    pub unlocked: bool,
    pub schedules: HashMap<EntityId, NativeSchedule>,
    /// Entities that can only reach their home.
    pub far: HashSet<EntityId>,
    /// Entities whose writes the host refuses.
    pub refuse: HashSet<EntityId>,
    pub resolves: Cell<u32>,
    pub writes: u32,
    pub visitors_cleared: u32,
}

impl MockWorld {
    pub fn new(names: &[&str]) -> Self {
        Self {
            roster: names.iter().copied().map(EntityId::from).collect(),
            unlocked: true,
            ..Self::default()
        }
    }

    pub fn schedule_of(&self, name: &str) -> NativeSchedule {
        self.schedules
            .get(&EntityId::from(name))
            .cloned()
            .unwrap_or(NativeSchedule::Missing)
    }

    pub fn set_native(&mut self, name: &str, location: &str) {
        self.schedules
            .insert(EntityId::from(name), NativeSchedule::Target(TravelTarget::location(location)));
    }
}

impl EntityResolver for MockWorld {
    type Handle = EntityId;

    fn resolve(&self, name: &EntityId) -> Option<EntityId> {
        self.resolves.set(self.resolves.get() + 1);
        self.roster.contains(name).then(|| name.clone())
    }
}

impl HostWorld for MockWorld {
    fn roster(&self) -> Vec<EntityId> {
        self.roster.clone()
    }

    fn resort_unlocked(&self) -> bool {
        self.unlocked
    }

    fn native_schedule(&self, handle: &EntityId) -> NativeSchedule {
        self.schedules.get(handle).cloned().unwrap_or(NativeSchedule::Missing)
    }

    fn is_reachable(&self, handle: &EntityId, target: &TravelTarget) -> bool {
        !self.far.contains(handle) || target.location == "Home"
    }

    fn fallback_target(&self, _handle: &EntityId) -> Option<TravelTarget> {
        Some(TravelTarget::location("Home"))
    }

    fn set_travel_target(&mut self, handle: &EntityId, target: &TravelTarget) -> Result<()> {
        if self.refuse.contains(handle) {
            return Err(SchedError::HostIntegration(format!("{handle} is busy")));
        }
        self.writes += 1;
        self.schedules.insert(handle.clone(), NativeSchedule::Target(target.clone()));
        Ok(())
    }

    fn clear_visitors(&mut self) {
        self.visitors_cleared += 1;
    }
}
