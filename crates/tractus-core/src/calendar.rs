//! Closed-form workday arithmetic.
//!
//! Workdays are computed without walking the range day by day: whole weeks
//! contribute two weekend days each, and a correction term accounts for the
//! weekend days of the trailing partial week. Holidays are counted
//! separately and only when they fall on a weekday, so no weekend day is
//! ever subtracted twice.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Error, Result};
use crate::model::Birthday;

/// Weekday number with Sunday = 0 and Saturday = 6.
fn weekday_number(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_sunday())
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of days in `[since, until]`, both ends included.
pub fn total_days(since: NaiveDate, until: NaiveDate) -> Result<i64> {
    if until < since {
        return Err(Error::validation(format!(
            "period ends on {until} before it starts on {since}"
        )));
    }
    Ok((until - since).num_days() + 1)
}

/// Weekend days in the partial week not covered by `total / 7 * 2`.
fn extra_weekend_days(since: NaiveDate, until: NaiveDate) -> i64 {
    let from = weekday_number(since);
    let to = weekday_number(until);
    let sunday = i64::from(Weekday::Sun.num_days_from_sunday());
    let saturday = i64::from(Weekday::Sat.num_days_from_sunday());

    if to + 1 < from {
        // The partial week wraps around a whole weekend, e.g. Friday to Wednesday.
        2
    } else if (from == sunday && to != saturday) || (from != sunday && to == saturday) {
        1
    } else {
        0
    }
}

/// Workdays in `[since, until]` given the number of weekday holidays in it.
///
/// A negative result means `holiday_count` included weekend days or dates
/// outside the range.
pub fn workdays(since: NaiveDate, until: NaiveDate, holiday_count: usize) -> Result<i64> {
    let total = total_days(since, until)?;
    let weekend_pairs = total / 7 * 2;
    let holidays = i64::try_from(holiday_count).unwrap_or(i64::MAX);
    Ok(total - weekend_pairs - extra_weekend_days(since, until) - holidays)
}

/// Dates excluded from one developer's calendar for one sub-period.
///
/// Built fresh for every (sub-period, developer) pair and passed down
/// explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarContext {
    exclusions: Vec<NaiveDate>,
    birthdays: Vec<NaiveDate>,
}

impl CalendarContext {
    pub fn new(exclusions: Vec<NaiveDate>, birthdays: Vec<NaiveDate>) -> Self {
        Self {
            exclusions,
            birthdays,
        }
    }

    /// Context for `birthday`'s owner over `[since, until]`.
    ///
    /// `holidays` holds the local and national holidays of the sub-period.
    pub fn for_period(
        since: NaiveDate,
        until: NaiveDate,
        holidays: &[NaiveDate],
        birthday: Birthday,
    ) -> Self {
        Self::new(holidays.to_vec(), birthday.occurrences(since, until))
    }
}

/// Number of distinct weekday exclusions inside `[since, until]`.
pub fn holiday_count(since: NaiveDate, until: NaiveDate, context: &CalendarContext) -> usize {
    context
        .exclusions
        .iter()
        .chain(&context.birthdays)
        .filter(|day| (since..=until).contains(*day) && !is_weekend(**day))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Day counts for one period and one calendar context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSummary {
    /// Days in the period, both ends included.
    pub total_days: i64,
    /// Days left after weekends and holidays.
    pub workdays: i64,
    /// Distinct holidays falling on a weekday.
    pub holidays: usize,
    /// Saturdays and Sundays in the period.
    pub weekend_days: i64,
}

/// Counts total days, workdays, holidays and weekend days of a period.
pub fn summarize(
    since: NaiveDate,
    until: NaiveDate,
    context: &CalendarContext,
) -> Result<PeriodSummary> {
    let total_days = total_days(since, until)?;
    let holidays = holiday_count(since, until, context);
    let workdays = workdays(since, until, holidays)?;
    let holiday_days = i64::try_from(holidays).unwrap_or(i64::MAX);
    Ok(PeriodSummary {
        total_days,
        workdays,
        holidays,
        weekend_days: total_days - workdays - holiday_days,
    })
}
