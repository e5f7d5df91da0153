//! Core planning types with validation.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used by every document date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| Error::DateFormat {
        value: value.to_string(),
        source,
    })
}

/// Generates a numeric ID newtype with common trait implementations.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

define_numeric_id!(
    /// Identifier of a project.
    ProjectId
);

define_numeric_id!(
    /// Identifier of a developer.
    DeveloperId
);

/// A project with a fixed date range and an effort budget in workdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// First day work may happen.
    pub since: NaiveDate,
    /// Deadline, the last day work may happen.
    pub until: NaiveDate,
    /// Developer-workdays the project needs.
    pub effort_days: u32,
}

impl Project {
    /// Creates a project, rejecting ranges that end before they start.
    pub fn new(
        id: impl Into<ProjectId>,
        since: NaiveDate,
        until: NaiveDate,
        effort_days: u32,
    ) -> Result<Self> {
        let id = id.into();
        if until < since {
            return Err(Error::validation(format!(
                "project {id} ends on {until} before it starts on {since}"
            )));
        }
        Ok(Self {
            id,
            since,
            until,
            effort_days,
        })
    }
}

/// A recurring yearly birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    month: u32,
    day: u32,
}

impl Birthday {
    /// Takes month and day from a full birth date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Returns the birthday occurrence in `year`.
    ///
    /// 29 February is observed on 28 February in non-leap years.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            (self.month == 2 && self.day == 29)
                .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
                .flatten()
        })
    }

    /// Returns one occurrence per calendar year overlapped by `[since, until]`.
    ///
    /// Occurrences can fall outside the range itself; callers filter them.
    pub fn occurrences(self, since: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
        (since.year()..=until.year())
            .filter_map(|year| self.in_year(year))
            .collect()
    }
}

/// A developer whose capacity gets allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Developer {
    /// Unique developer identifier.
    pub id: DeveloperId,
    /// Day off every year.
    pub birthday: Birthday,
}

impl Developer {
    pub fn new(id: impl Into<DeveloperId>, birth_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            birthday: Birthday::from_date(birth_date),
        }
    }
}

/// Everything one allocation run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Projects competing for capacity.
    pub projects: Vec<Project>,
    /// Developers, in the order their capacity is allocated.
    pub developers: Vec<Developer>,
    /// Holidays excluded for every developer and project.
    pub local_holidays: Vec<NaiveDate>,
}

impl Plan {
    /// Builds a plan after checking that identifiers are unique.
    pub fn new(
        projects: Vec<Project>,
        developers: Vec<Developer>,
        local_holidays: Vec<NaiveDate>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = projects.iter().find(|p| !seen.insert(p.id)) {
            return Err(Error::validation(format!("duplicate project id {}", dup.id)));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = developers.iter().find(|d| !seen.insert(d.id)) {
            return Err(Error::validation(format!(
                "duplicate developer id {}",
                dup.id
            )));
        }
        Ok(Self {
            projects,
            developers,
            local_holidays,
        })
    }
}
