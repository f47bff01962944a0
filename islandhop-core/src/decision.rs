//! The daily decision engine.
//!
//! Once per day, turns the roster plus configuration into one immutable
//! [`DecisionRecord`] per entity. Pipeline, in order:
//!
//! 1. Skip unresolvable entities (logged).
//! 2. Hard exclusions stay home. Nothing outranks an exclusion.
//! 3. Hard inclusions are admitted in sorted order, capacity permitting.
//! 4. Group pass: each remaining entity draws `group_chance` from its own
//!    stream; all members share one meeting point drawn once for the day.
//! 5. Explorer pass: the same per-entity streams draw `explorer_chance`.
//! 6. Special case: on its weekday the designated entity draws
//!    `special_case_chance`, outside the capacity bound.
//!
//! Everything iterates in sorted id order, so the plan depends only on the
//! roster's contents, never its order.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::random::SeededRandom;
use crate::types::{DayOfWeek, DecisionRecord, EntityId, ExclusionOverride, VisitRole};

/// Salt for the single shared meeting-point draw.
pub const GROUP_SALT: &str = "islandhop:group-meeting-point";

/// The committed decisions for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayPlan {
    /// Absolute day this plan was computed for.
    pub day_count: u32,
    /// The day's shared group meeting point.
    pub group_key: Option<String>,
    records: BTreeMap<EntityId, DecisionRecord>,
}

impl DayPlan {
    /// A plan with no records.
    #[must_use]
    pub fn empty(day_count: u32) -> Self {
        Self {
            day_count,
            group_key: None,
            records: BTreeMap::new(),
        }
    }

    /// Decision for one entity.
    #[must_use]
    pub fn get(&self, entity: &EntityId) -> Option<&DecisionRecord> {
        self.records.get(entity)
    }

    /// Whether the entity is visiting today. Unknown entities are not.
    #[must_use]
    pub fn will_visit(&self, entity: &EntityId) -> bool {
        self.get(entity).is_some_and(|r| r.will_visit)
    }

    /// All records, in id order.
    pub fn records(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.records.values()
    }

    /// Visiting entities, in id order.
    pub fn visitors(&self) -> impl Iterator<Item = &EntityId> {
        self.records().filter(|r| r.will_visit).map(|r| &r.entity_id)
    }

    /// Visitors that count against capacity (everyone but the special case).
    #[must_use]
    pub fn capacity_used(&self) -> usize {
        self.records()
            .filter(|r| r.will_visit && r.role != VisitRole::SpecialCase)
            .count()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the plan has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn commit(&mut self, record: DecisionRecord) {
        self.records.insert(record.entity_id.clone(), record);
    }
}

/// Computes [`DayPlan`]s from a configuration.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine<'a> {
    config: &'a SchedulerConfig,
}

impl<'a> DecisionEngine<'a> {
    /// Create an engine over the given configuration.
    #[must_use]
    pub fn new(config: &'a SchedulerConfig) -> Self {
        Self { config }
    }

    /// Compute the plan for `day_count` in world `world_id`.
    ///
    /// `is_resolvable` reports whether the host currently knows an entity;
    /// unknown entities get no record. Duplicate roster entries collapse.
    pub fn compute_day(
        &self,
        day_count: u32,
        world_id: u64,
        roster: &[EntityId],
        is_resolvable: impl Fn(&EntityId) -> bool,
    ) -> DayPlan {
        let config = self.config;
        let capacity = usize::from(config.scheduler.capacity);
        let special = &config.chances.special_case_entity;

        let mut plan = DayPlan::empty(day_count);
        plan.group_key = SeededRandom::seed(day_count, world_id, GROUP_SALT)
            .choose(&config.resort.meeting_points)
            .cloned();

        let mut ids: Vec<&EntityId> = roster.iter().collect();
        ids.sort();
        ids.dedup();

        let mut included = Vec::new();
        let mut candidates = Vec::new();
        let mut special_override = None;

        for id in ids {
            if !is_resolvable(id) {
                warn!(entity = %id, day = day_count, "entity not resolvable, skipping");
                continue;
            }
            let exclusion = config.exclusion_for(id);
            if id == special {
                special_override = Some(exclusion);
                continue;
            }
            match exclusion {
                ExclusionOverride::Exclude => {
                    plan.commit(DecisionRecord::stays_home(id.clone(), config.strictness_for(id)));
                }
                ExclusionOverride::Include => included.push(id),
                ExclusionOverride::Default => candidates.push(id),
            }
        }

        let mut admitted = 0usize;

        for id in included {
            let strictness = config.strictness_for(id);
            if admitted < capacity {
                admitted += 1;
                plan.commit(DecisionRecord::visiting(
                    id.clone(),
                    VisitRole::GroupMember,
                    plan.group_key.clone(),
                    strictness,
                ));
            } else {
                warn!(
                    entity = %id,
                    capacity,
                    "hard-included entity exceeds capacity, staying home"
                );
                plan.commit(DecisionRecord::stays_home(id.clone(), strictness));
            }
        }

        let mut streams: Vec<(&EntityId, SeededRandom, bool)> = candidates
            .into_iter()
            .map(|id| (id, SeededRandom::seed(day_count, world_id, id.as_str()), false))
            .collect();

        for (id, stream, committed) in &mut streams {
            if admitted >= capacity {
                break;
            }
            if stream.of_chance(config.chances.group_chance) {
                admitted += 1;
                *committed = true;
                plan.commit(DecisionRecord::visiting(
                    (*id).clone(),
                    VisitRole::GroupMember,
                    plan.group_key.clone(),
                    config.strictness_for(*id),
                ));
            }
        }

        for (id, stream, committed) in &mut streams {
            if *committed {
                continue;
            }
            let strictness = config.strictness_for(*id);
            if admitted < capacity && stream.of_chance(config.chances.explorer_chance) {
                admitted += 1;
                *committed = true;
                plan.commit(DecisionRecord::visiting(
                    (*id).clone(),
                    VisitRole::SoloExplorer,
                    None,
                    strictness,
                ));
            } else {
                plan.commit(DecisionRecord::stays_home((*id).clone(), strictness));
            }
        }

        if let Some(exclusion) = special_override {
            plan.commit(self.decide_special_case(day_count, world_id, exclusion));
        } else {
            debug!(entity = %special, "special-case entity not on today's roster");
        }

        info!(
            day = day_count,
            visitors = plan.visitors().count(),
            capacity,
            group_key = plan.group_key.as_deref().unwrap_or("-"),
            "committed day plan"
        );
        plan
    }

    /// A plan where every resolvable roster entity stays home.
    ///
    /// Used when the resort is closed.
    pub fn closed_day(
        &self,
        day_count: u32,
        roster: &[EntityId],
        is_resolvable: impl Fn(&EntityId) -> bool,
    ) -> DayPlan {
        let mut plan = DayPlan::empty(day_count);
        for id in roster.iter().filter(|id| is_resolvable(id)) {
            plan.commit(DecisionRecord::stays_home(id.clone(), self.config.strictness_for(id)));
        }
        plan
    }

    fn decide_special_case(
        &self,
        day_count: u32,
        world_id: u64,
        exclusion: ExclusionOverride,
    ) -> DecisionRecord {
        let chances = &self.config.chances;
        let id = chances.special_case_entity.clone();
        let strictness = self.config.strictness_for(&id);

        let visits = match exclusion {
            ExclusionOverride::Exclude => false,
            ExclusionOverride::Include => true,
            ExclusionOverride::Default => {
                DayOfWeek::from_day_count(day_count) == chances.special_case_weekday
                    && SeededRandom::seed(day_count, world_id, id.as_str())
                        .of_chance(chances.special_case_chance)
            }
        };

        if visits {
            DecisionRecord::visiting(id, VisitRole::SpecialCase, None, strictness)
        } else {
            DecisionRecord::stays_home(id, strictness)
        }
    }
}
