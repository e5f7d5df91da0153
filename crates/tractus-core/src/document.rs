//! Input and output JSON documents.
//!
//! The input is read and validated in full before any allocation starts,
//! and the output is rendered in full before the output file is touched.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Developer, DeveloperId, Plan, Project, ProjectId, parse_date};
use crate::report::AssignmentRecord;

/// Input document as written on disk.
///
/// Sections are optional here so that a missing section is reported as a
/// validation failure rather than a parse failure.
#[derive(Debug, Deserialize)]
struct RawDocument {
    projects: Option<Vec<RawProject>>,
    developers: Option<Vec<RawDeveloper>>,
    local_holidays: Option<Vec<RawLocalHoliday>>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: ProjectId,
    since: String,
    until: String,
    effort_days: u32,
}

#[derive(Debug, Deserialize)]
struct RawDeveloper {
    id: DeveloperId,
    birthday: String,
}

#[derive(Debug, Deserialize)]
struct RawLocalHoliday {
    day: String,
}

fn required<T>(section: Option<T>, name: &str) -> Result<T> {
    section.ok_or_else(|| Error::validation(format!("missing {name}")))
}

/// Parses and validates an input document.
pub fn parse_plan(text: &str) -> Result<Plan> {
    let raw: RawDocument = serde_json::from_str(text)?;
    let raw_projects = required(raw.projects, "projects")?;
    let raw_developers = required(raw.developers, "developers")?;
    let raw_holidays = required(raw.local_holidays, "local_holidays")?;

    let local_holidays = raw_holidays
        .iter()
        .map(|holiday| parse_date(&holiday.day))
        .collect::<Result<Vec<_>>>()?;

    let projects = raw_projects
        .into_iter()
        .map(|p| {
            let since = parse_date(&p.since)?;
            let until = parse_date(&p.until)?;
            Project::new(p.id, since, until, p.effort_days)
        })
        .collect::<Result<Vec<_>>>()?;

    let developers = raw_developers
        .into_iter()
        .map(|d| -> Result<Developer> { Ok(Developer::new(d.id, parse_date(&d.birthday)?)) })
        .collect::<Result<Vec<_>>>()?;

    Plan::new(projects, developers, local_holidays)
}

/// Reads and validates the input document at `path`.
pub fn read_plan(path: &Path) -> Result<Plan> {
    let text = fs::read_to_string(path).map_err(|source| Error::InputAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse_plan(&text)?;
    tracing::info!(
        path = %path.display(),
        projects = plan.projects.len(),
        developers = plan.developers.len(),
        local_holidays = plan.local_holidays.len(),
        "loaded input document"
    );
    Ok(plan)
}

/// Renders the output document as pretty-printed JSON.
pub fn render_records(records: &[AssignmentRecord]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Writes the output document to `path`.
///
/// The document goes to a sibling temporary file first and is renamed into
/// place, so `path` never holds a partial document.
pub fn write_records(path: &Path, records: &[AssignmentRecord]) -> Result<()> {
    let json = render_records(records)?;

    let mut staging = OsString::from(path.as_os_str());
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|source| {
            let _ = fs::remove_file(&staging);
            Error::OutputAccess {
                path: path.to_path_buf(),
                source,
            }
        })?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote output document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn sample() -> serde_json::Value {
        json!({
            "projects": [
                {"id": 1, "since": "2023-01-02", "until": "2023-01-08", "effort_days": 10}
            ],
            "developers": [{"id": 1, "birthday": "1990-06-15"}],
            "local_holidays": [{"day": "2023-01-03"}]
        })
    }

    #[test]
    fn test_parses_valid_document() {
        let plan = parse_plan(&sample().to_string()).unwrap();
        assert_eq!(plan.projects.len(), 1);
        assert_eq!(plan.projects[0].effort_days, 10);
        assert_eq!(plan.developers[0].id, DeveloperId(1));
        assert_eq!(
            plan.local_holidays,
            vec![NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()]
        );
    }

    #[test]
    fn test_missing_sections_are_validation_errors() {
        for section in ["projects", "developers", "local_holidays"] {
            let mut doc = sample();
            doc.as_object_mut().unwrap().remove(section);
            let err = parse_plan(&doc.to_string()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{section}: {err:?}");
            assert_eq!(err.to_string(), format!("invalid input: missing {section}"));
        }
    }

    #[test]
    fn test_inverted_project_is_a_validation_error() {
        let mut doc = sample();
        doc["projects"][0]["until"] = json!("2023-01-01");
        let err = parse_plan(&doc.to_string()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_bad_date_is_a_date_format_error() {
        let mut doc = sample();
        doc["developers"][0]["birthday"] = json!("15/06/1990");
        let err = parse_plan(&doc.to_string()).unwrap_err();
        assert!(matches!(err, Error::DateFormat { ref value, .. } if value == "15/06/1990"));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_plan("{\"projects\": [").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));

        let err = parse_plan("{\"projects\": 3}").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_input_file_is_input_access_error() {
        let temp = TempDir::new().unwrap();
        let err = read_plan(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::InputAccess { .. }));
    }

    #[test]
    fn test_unwritable_output_is_output_access_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("output.json");
        let err = write_records(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::OutputAccess { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_writes_pretty_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("output.json");
        let records = [AssignmentRecord {
            developer_id: DeveloperId(1),
            project_id: ProjectId(1),
            tot_working_days: 5,
        }];
        write_records(&path, &records).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        insta::assert_snapshot!(written, @r#"
        [
          {
            "developer_id": 1,
            "project_id": 1,
            "tot_working_days": 5
          }
        ]
        "#);
        assert!(!temp.path().join("output.json.tmp").exists());
    }
}
