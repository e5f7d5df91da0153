//! Partition of the project ranges into disjoint sub-periods.
//!
//! # Algorithm Summary
//!
//! 1. Emit a START and an END event per project and sort them.
//! 2. Walk consecutive event pairs; each pair yields at most one sub-period
//!    (plus a bridge sub-period when an END is followed by a later START
//!    while other projects are still running).
//! 3. A coverage cursor clips every sub-period to start after the last day
//!    already covered, so sub-periods never overlap.
//!
//! Events on the same date are ordered by `(rank, project id)`: ENDs of
//! projects spanning several days first, then STARTs, then ENDs of
//! single-day projects (so a project always starts before it ends).

use std::fmt;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Project, ProjectId};

/// Whether an event opens or closes a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    End,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::End => "end",
        };
        write!(f, "{s}")
    }
}

/// A project boundary on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent {
    /// The project's first day for a START, its last day for an END.
    pub date: NaiveDate,
    /// The project this boundary belongs to.
    pub project_id: ProjectId,
    /// Whether the project opens or closes here.
    pub kind: EventKind,
    /// Set when the project starts and ends on the same day.
    single_day: bool,
}

impl TimelineEvent {
    fn sort_key(&self) -> (NaiveDate, u8, ProjectId) {
        let rank = match (self.kind, self.single_day) {
            (EventKind::End, false) => 0,
            (EventKind::Start, _) => 1,
            (EventKind::End, true) => 2,
        };
        (self.date, rank, self.project_id)
    }
}

/// A contiguous date range whose capacity goes to `anchor` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPeriod {
    /// First day of the sub-period.
    pub since: NaiveDate,
    /// Last day of the sub-period, included.
    pub until: NaiveDate,
    /// Project that receives the sub-period's workdays first.
    pub anchor: ProjectId,
    /// Index of the event that opened this sub-period.
    pub event_index: usize,
}

/// Sorted events and the sub-periods derived from them.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    sub_periods: Vec<SubPeriod>,
}

impl Timeline {
    /// Builds the timeline for `projects`.
    pub fn build(projects: &[Project]) -> Result<Self> {
        let mut events = Vec::with_capacity(projects.len() * 2);
        for project in projects {
            let project = Project::new(
                project.id,
                project.since,
                project.until,
                project.effort_days,
            )?;
            let single_day = project.since == project.until;
            events.push(TimelineEvent {
                date: project.since,
                project_id: project.id,
                kind: EventKind::Start,
                single_day,
            });
            events.push(TimelineEvent {
                date: project.until,
                project_id: project.id,
                kind: EventKind::End,
                single_day,
            });
        }
        events.sort_by_key(TimelineEvent::sort_key);

        let sub_periods = sweep(&events);
        tracing::debug!(
            events = events.len(),
            sub_periods = sub_periods.len(),
            "built timeline"
        );
        Ok(Self {
            events,
            sub_periods,
        })
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn sub_periods(&self) -> &[SubPeriod] {
        &self.sub_periods
    }
}

/// Walks consecutive event pairs and collects the kept sub-periods.
fn sweep(events: &[TimelineEvent]) -> Vec<SubPeriod> {
    let mut sub_periods = Vec::new();
    let mut open: Vec<ProjectId> = Vec::new();
    let mut covered: Option<NaiveDate> = None;

    let mut push = |since: NaiveDate, until: NaiveDate, anchor, event_index| {
        let since = match covered.and_then(|day| day.succ_opt()) {
            Some(next) => since.max(next),
            None => since,
        };
        if until < since {
            return;
        }
        covered = Some(until);
        sub_periods.push(SubPeriod {
            since,
            until,
            anchor,
            event_index,
        });
    };

    for (index, pair) in events.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        match a.kind {
            EventKind::Start => open.push(a.project_id),
            EventKind::End => open.retain(|id| *id != a.project_id),
        }

        match (a.kind, b.kind) {
            (EventKind::Start, EventKind::Start) => {
                // The project starting at `b` takes its own first day.
                if let Some(until) = b.date.pred_opt() {
                    push(a.date, until, a.project_id, index);
                }
            }
            (EventKind::Start, EventKind::End) => push(a.date, b.date, a.project_id, index),
            (EventKind::End, EventKind::End) => push(a.date, b.date, b.project_id, index),
            (EventKind::End, EventKind::Start) => {
                // Projects still running between the two events keep the
                // days in between; the most recently started one anchors them.
                if let (Some(&running), Some(since), Some(until)) =
                    (open.last(), a.date.succ_opt(), b.date.pred_opt())
                {
                    push(since, until, running, index);
                }
                push(b.date, b.date, b.project_id, index);
            }
        }
    }

    sub_periods
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Datelike;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan(d: u32) -> NaiveDate {
        date(2023, 1, d)
    }

    fn project(id: u64, since: u32, until: u32) -> Project {
        Project::new(id, jan(since), jan(until), 10).unwrap()
    }

    fn ranges(timeline: &Timeline) -> Vec<(u32, u32, u64)> {
        timeline
            .sub_periods()
            .iter()
            .map(|p| (p.since.day(), p.until.day(), p.anchor.0))
            .collect()
    }

    /// Every day inside some project is covered exactly once, and no other day is.
    fn assert_partition(projects: &[Project]) {
        let timeline = Timeline::build(projects).unwrap();
        let mut coverage: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for period in timeline.sub_periods() {
            assert!(period.since <= period.until, "{period:?}");
            for day in period.since.iter_days().take_while(|d| *d <= period.until) {
                *coverage.entry(day).or_default() += 1;
            }
        }
        for pair in timeline.sub_periods().windows(2) {
            assert!(pair[0].until < pair[1].since, "{pair:?}");
        }

        let mut expected: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for p in projects {
            for day in p.since.iter_days().take_while(|d| *d <= p.until) {
                expected.insert(day, 1);
            }
        }
        assert_eq!(coverage, expected, "{:?}", ranges(&timeline));
    }

    #[test]
    fn test_overlapping_projects_split_at_boundaries() {
        let timeline = Timeline::build(&[project(1, 1, 10), project(2, 5, 20)]).unwrap();
        assert_eq!(ranges(&timeline), vec![(1, 4, 1), (5, 10, 2), (11, 20, 2)]);
    }

    #[test]
    fn test_events_are_sorted_with_documented_tie_break() {
        let timeline =
            Timeline::build(&[project(2, 1, 10), project(3, 10, 10), project(1, 10, 20)])
                .unwrap();
        let order: Vec<(u32, u64, EventKind)> = timeline
            .events()
            .iter()
            .map(|e| (e.date.day(), e.project_id.0, e.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, 2, EventKind::Start),
                (10, 2, EventKind::End),
                (10, 1, EventKind::Start),
                (10, 3, EventKind::Start),
                (10, 3, EventKind::End),
                (20, 1, EventKind::End),
            ]
        );
    }

    #[test]
    fn test_gap_inside_outer_project_is_bridged() {
        let timeline =
            Timeline::build(&[project(1, 1, 31), project(2, 5, 10), project(3, 20, 25)])
                .unwrap();
        assert_eq!(
            ranges(&timeline),
            vec![
                (1, 4, 1),
                (5, 10, 2),
                (11, 19, 1),
                (20, 20, 3),
                (21, 25, 3),
                (26, 31, 1),
            ]
        );
    }

    #[test]
    fn test_disjoint_projects_leave_the_gap_uncovered() {
        let timeline = Timeline::build(&[project(1, 1, 5), project(2, 10, 12)]).unwrap();
        assert_eq!(ranges(&timeline), vec![(1, 5, 1), (10, 10, 2), (11, 12, 2)]);
    }

    #[test]
    fn test_sub_periods_partition_the_project_union() {
        let cases: Vec<Vec<Project>> = vec![
            vec![project(1, 1, 10)],
            vec![project(1, 1, 10), project(2, 10, 20)],
            vec![project(1, 1, 10), project(2, 1, 5)],
            vec![project(1, 3, 3), project(2, 1, 5)],
            vec![project(1, 3, 3), project(2, 3, 3)],
            vec![project(1, 1, 5), project(2, 10, 12)],
            vec![project(1, 1, 10), project(2, 5, 10)],
            vec![project(1, 1, 31), project(2, 5, 10), project(3, 20, 25)],
            vec![
                project(1, 2, 28),
                project(2, 4, 9),
                project(3, 4, 15),
                project(4, 15, 15),
                project(5, 16, 30),
                project(6, 29, 31),
            ],
        ];
        for projects in &cases {
            assert_partition(projects);
        }
    }

    #[test]
    fn test_sub_periods_record_their_opening_event() {
        let timeline = Timeline::build(&[project(1, 1, 10), project(2, 5, 20)]).unwrap();
        let indices: Vec<usize> = timeline
            .sub_periods()
            .iter()
            .map(|p| p.event_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_inverted_project_is_rejected() {
        let mut broken = project(1, 1, 10);
        broken.until = jan(1).pred_opt().unwrap();
        assert!(Timeline::build(&[broken]).is_err());
    }

    #[test]
    fn test_empty_input_has_no_sub_periods() {
        let timeline = Timeline::build(&[]).unwrap();
        assert!(timeline.events().is_empty());
        assert!(timeline.sub_periods().is_empty());
    }
}
