//! National holiday sources.
//!
//! The calendar consumes national holidays read-only through the
//! [`NationalHolidays`] trait, so the allocation can run against the
//! Italian calendar, an empty one, or a test fixture.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A source of public holidays for some locale.
pub trait NationalHolidays {
    /// Returns the holidays inside `[since, until]`, in ascending order.
    fn between(&self, since: NaiveDate, until: NaiveDate) -> Vec<NaiveDate>;
}

/// No national holidays at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNationalHolidays;

impl NationalHolidays for NoNationalHolidays {
    fn between(&self, _since: NaiveDate, _until: NaiveDate) -> Vec<NaiveDate> {
        Vec::new()
    }
}

/// Italian public holidays.
///
/// Italy does not move holidays that fall on a weekend, so the observed
/// date is always the actual one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItalianHolidays;

/// Fixed-date holidays as `(month, day)`.
const ITALIAN_FIXED: [(u32, u32); 10] = [
    (1, 1),   // Capodanno
    (1, 6),   // Epifania
    (4, 25),  // Festa della Liberazione
    (5, 1),   // Festa del Lavoro
    (6, 2),   // Festa della Repubblica
    (8, 15),  // Ferragosto
    (11, 1),  // Ognissanti
    (12, 8),  // Immacolata Concezione
    (12, 25), // Natale
    (12, 26), // Santo Stefano
];

impl ItalianHolidays {
    /// All holidays of `year`, sorted.
    pub fn for_year(year: i32) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = ITALIAN_FIXED
            .iter()
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect();
        if let Some(easter) = easter_sunday(year) {
            days.push(easter);
            days.push(easter + Duration::days(1));
        }
        days.sort_unstable();
        days
    }
}

impl NationalHolidays for ItalianHolidays {
    fn between(&self, since: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
        (since.year()..=until.year())
            .flat_map(Self::for_year)
            .filter(|day| (since..=until).contains(day))
            .collect()
    }
}

/// Easter Sunday of `year`.
///
/// Anonymous Gregorian algorithm, see
/// <https://en.wikipedia.org/wiki/Date_of_Easter#Anonymous_Gregorian_algorithm>
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Which national holiday calendar a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayCalendar {
    /// Italian public holidays.
    #[default]
    Italy,
    /// Only weekends, local holidays and birthdays are excluded.
    None,
}

impl HolidayCalendar {
    /// Returns the holiday source for this calendar.
    pub fn source(self) -> Box<dyn NationalHolidays> {
        match self {
            Self::Italy => Box::new(ItalianHolidays),
            Self::None => Box::new(NoNationalHolidays),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_sunday_known_years() {
        for expected in [
            date(2017, 4, 16),
            date(2018, 4, 1),
            date(2019, 4, 21),
            date(2020, 4, 12),
            date(2021, 4, 4),
            date(2022, 4, 17),
            date(2023, 4, 9),
            date(2024, 3, 31),
            date(2025, 4, 20),
            date(2026, 4, 5),
            date(2027, 3, 28),
        ] {
            assert_eq!(easter_sunday(expected.year()), Some(expected));
        }
    }

    #[test]
    fn test_italian_holidays_2023() {
        assert_eq!(
            ItalianHolidays::for_year(2023),
            vec![
                date(2023, 1, 1),
                date(2023, 1, 6),
                date(2023, 4, 9),
                date(2023, 4, 10),
                date(2023, 4, 25),
                date(2023, 5, 1),
                date(2023, 6, 2),
                date(2023, 8, 15),
                date(2023, 11, 1),
                date(2023, 12, 8),
                date(2023, 12, 25),
                date(2023, 12, 26),
            ]
        );
    }

    #[test]
    fn test_between_filters_to_range_across_years() {
        let days = ItalianHolidays.between(date(2022, 12, 20), date(2023, 1, 5));
        assert_eq!(
            days,
            vec![date(2022, 12, 25), date(2022, 12, 26), date(2023, 1, 1)]
        );
    }

    #[test]
    fn test_between_includes_both_ends() {
        let days = ItalianHolidays.between(date(2023, 4, 25), date(2023, 5, 1));
        assert_eq!(days, vec![date(2023, 4, 25), date(2023, 5, 1)]);
    }

    #[test]
    fn test_no_holidays_is_empty() {
        assert!(NoNationalHolidays
            .between(date(2023, 1, 1), date(2023, 12, 31))
            .is_empty());
        assert!(HolidayCalendar::None
            .source()
            .between(date(2023, 1, 1), date(2023, 12, 31))
            .is_empty());
    }
}
