//! The allocation run behind the `tractus` command.

use std::path::PathBuf;

use tractus_core::{Error, HolidayCalendar, document};

use crate::{Cli, Config};

/// Exit status for failures that are not part of the planning taxonomy.
pub const EXIT_FAILURE: u8 = 1;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Input document to read.
    pub input: PathBuf,
    /// Output document to write.
    pub output: PathBuf,
    /// National holiday calendar excluded from workdays.
    pub national_holidays: HolidayCalendar,
}

impl PlanOptions {
    /// Command-line flags take precedence over configuration.
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        Self {
            input: cli.input.clone().unwrap_or(config.input),
            output: cli.output.clone().unwrap_or(config.output),
            national_holidays: config.national_holidays,
        }
    }
}

/// Reads the input, allocates, and writes the output.
///
/// Returns the number of records written.
pub fn run(options: &PlanOptions) -> Result<usize, Error> {
    let plan = document::read_plan(&options.input)?;
    let holidays = options.national_holidays.source();
    let records = tractus_core::plan_assignments(&plan, holidays.as_ref())?;
    document::write_records(&options.output, &records)?;
    Ok(records.len())
}

/// Maps a planning error to the process exit status.
pub const fn exit_code(error: &Error) -> u8 {
    match error {
        Error::InputAccess { .. } => 2,
        Error::OutputAccess { .. } => 3,
        Error::MalformedDocument(_) => 4,
        Error::Validation(_) => 5,
        Error::DateFormat { .. } => 6,
    }
}

/// Exit status for any error reaching `main`.
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<Error>()
        .map_or(EXIT_FAILURE, exit_code)
}
