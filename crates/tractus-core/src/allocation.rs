//! Capacity allocation over timeline sub-periods.
//!
//! # Algorithm Summary
//!
//! 1. Build the [`Timeline`] and walk its sub-periods in order.
//! 2. For each developer (input order), count the workdays of the
//!    sub-period after removing holidays and the developer's birthday.
//! 3. Give those days to the anchor project up to its remaining effort.
//! 4. If the anchor is done and days are left, hand them to the other
//!    started, not yet ended projects, most recently started first.
//!
//! Remaining effort and the started/ended bookkeeping carry over from one
//! sub-period to the next, and from one developer to the next within a
//! sub-period, so the sweep is strictly sequential.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::calendar::{self, CalendarContext};
use crate::error::Result;
use crate::holidays::NationalHolidays;
use crate::model::{DeveloperId, Plan, Project, ProjectId};
use crate::timeline::{EventKind, SubPeriod, Timeline, TimelineEvent};

/// Days assigned per `(developer, project)` pair.
pub type Assignments = BTreeMap<(DeveloperId, ProjectId), u32>;

/// What one developer did in one sub-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodLoad {
    /// The sub-period the load belongs to.
    pub period: SubPeriod,
    /// The developer whose capacity was allocated.
    pub developer_id: DeveloperId,
    /// Workdays available to the developer in the sub-period.
    pub workdays: u32,
    /// Workdays assigned across all projects.
    pub assigned: u32,
}

/// Result of an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Cumulative days per `(developer, project)` pair.
    pub assignments: Assignments,
    /// Effort left per project once the sweep is over.
    pub remaining: BTreeMap<ProjectId, u32>,
    /// One entry per developer and sub-period, in sweep order.
    pub loads: Vec<PeriodLoad>,
}

/// Mutable state carried across the sweep.
#[derive(Debug)]
struct SweepState {
    remaining: BTreeMap<ProjectId, u32>,
    /// Started projects in chronological order, without duplicates.
    started: Vec<ProjectId>,
    /// Membership index for `started`.
    started_set: HashSet<ProjectId>,
    ended: HashSet<ProjectId>,
    /// Number of timeline events already observed.
    observed: usize,
}

impl SweepState {
    fn new(projects: &[Project]) -> Self {
        Self {
            remaining: projects.iter().map(|p| (p.id, p.effort_days)).collect(),
            started: Vec::with_capacity(projects.len()),
            started_set: HashSet::with_capacity(projects.len()),
            ended: HashSet::with_capacity(projects.len()),
            observed: 0,
        }
    }

    /// Records every event up to and including `events[index]`.
    fn observe_through(&mut self, events: &[TimelineEvent], index: usize) {
        while self.observed <= index && self.observed < events.len() {
            let event = events[self.observed];
            match event.kind {
                EventKind::Start => {
                    if self.started_set.insert(event.project_id) {
                        self.started.push(event.project_id);
                    }
                }
                EventKind::End => {
                    self.ended.insert(event.project_id);
                }
            }
            self.observed += 1;
        }
    }

    fn remaining(&self, project: ProjectId) -> u32 {
        self.remaining.get(&project).copied().unwrap_or(0)
    }

    /// Takes up to `days` from the project's remaining effort.
    fn take(&mut self, project: ProjectId, days: u32) -> u32 {
        let Some(remaining) = self.remaining.get_mut(&project) else {
            return 0;
        };
        let taken = days.min(*remaining);
        *remaining -= taken;
        taken
    }

    /// Assigns `workdays` of `developer` to `anchor`, then to other open projects.
    ///
    /// Returns the number of days assigned.
    fn assign(
        &mut self,
        developer: DeveloperId,
        anchor: ProjectId,
        workdays: u32,
        assignments: &mut Assignments,
    ) -> u32 {
        let mut assigned = self.take(anchor, workdays);
        credit(assignments, developer, anchor, assigned);

        let mut leftover = workdays - assigned;
        if self.remaining(anchor) > 0 || leftover == 0 {
            return assigned;
        }

        for index in (0..self.started.len()).rev() {
            if leftover == 0 {
                break;
            }
            let project = self.started[index];
            if project == anchor || self.ended.contains(&project) {
                continue;
            }
            let days = self.take(project, leftover);
            if days == 0 {
                continue;
            }
            tracing::trace!(%developer, %project, days, "redistributed leftover days");
            credit(assignments, developer, project, days);
            leftover -= days;
            assigned += days;
        }

        assigned
    }
}

fn credit(assignments: &mut Assignments, developer: DeveloperId, project: ProjectId, days: u32) {
    if days > 0 {
        *assignments.entry((developer, project)).or_insert(0) += days;
    }
}

/// Runs the interval sweep against a national holiday source.
pub struct AllocationEngine<'a> {
    national_holidays: &'a dyn NationalHolidays,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(national_holidays: &'a dyn NationalHolidays) -> Self {
        Self { national_holidays }
    }

    /// Local and national holidays inside `[since, until]`, sorted and deduplicated.
    fn period_holidays(
        &self,
        since: NaiveDate,
        until: NaiveDate,
        local_holidays: &[NaiveDate],
    ) -> Vec<NaiveDate> {
        local_holidays
            .iter()
            .copied()
            .filter(|day| (since..=until).contains(day))
            .chain(self.national_holidays.between(since, until))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Allocates developer capacity for the whole plan.
    pub fn allocate(&self, plan: &Plan) -> Result<Allocation> {
        let timeline = Timeline::build(&plan.projects)?;
        let mut state = SweepState::new(&plan.projects);
        let mut assignments = Assignments::new();
        let mut loads = Vec::with_capacity(timeline.sub_periods().len() * plan.developers.len());

        for period in timeline.sub_periods() {
            state.observe_through(timeline.events(), period.event_index);
            let holidays = self.period_holidays(period.since, period.until, &plan.local_holidays);

            for developer in &plan.developers {
                let context = CalendarContext::for_period(
                    period.since,
                    period.until,
                    &holidays,
                    developer.birthday,
                );
                let summary = calendar::summarize(period.since, period.until, &context)?;
                let workdays = u32::try_from(summary.workdays).unwrap_or_else(|_| {
                    tracing::warn!(
                        developer = %developer.id,
                        since = %period.since,
                        until = %period.until,
                        workdays = summary.workdays,
                        "negative workday count, treating as zero"
                    );
                    0
                });

                let assigned =
                    state.assign(developer.id, period.anchor, workdays, &mut assignments);
                tracing::debug!(
                    developer = %developer.id,
                    anchor = %period.anchor,
                    since = %period.since,
                    until = %period.until,
                    total_days = summary.total_days,
                    holidays = summary.holidays,
                    weekend_days = summary.weekend_days,
                    workdays,
                    assigned,
                    "allocated sub-period"
                );
                loads.push(PeriodLoad {
                    period: *period,
                    developer_id: developer.id,
                    workdays,
                    assigned,
                });
            }
        }

        Ok(Allocation {
            assignments,
            remaining: state.remaining,
            loads,
        })
    }
}
