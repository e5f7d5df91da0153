//! Core domain logic for tractus.
//!
//! This crate contains:
//! - Calendar: closed-form workday counts over date ranges
//! - Holidays: national holiday sources (Italian calendar built in)
//! - Timeline: partition of project ranges into disjoint sub-periods
//! - Allocation: the interval sweep assigning developer workdays to projects
//! - Documents: the JSON input and output formats

mod allocation;
pub mod calendar;
pub mod document;
mod error;
pub mod holidays;
pub mod model;
mod report;
pub mod timeline;

pub use allocation::{Allocation, AllocationEngine, Assignments, PeriodLoad};
pub use calendar::{CalendarContext, PeriodSummary};
pub use error::{Error, Result};
pub use holidays::{HolidayCalendar, ItalianHolidays, NationalHolidays, NoNationalHolidays};
pub use model::{Birthday, Developer, DeveloperId, Plan, Project, ProjectId};
pub use report::{AssignmentRecord, assemble};
pub use timeline::{EventKind, SubPeriod, Timeline, TimelineEvent};

/// Runs the full pipeline on a validated plan and returns the output records.
pub fn plan_assignments(
    plan: &Plan,
    national_holidays: &dyn NationalHolidays,
) -> Result<Vec<AssignmentRecord>> {
    let allocation = AllocationEngine::new(national_holidays).allocate(plan)?;
    Ok(assemble(&allocation.assignments))
}
