//! Flattening of assignments into output records.

use serde::{Deserialize, Serialize};

use crate::allocation::Assignments;
use crate::model::{DeveloperId, ProjectId};

/// Total workdays one developer spends on one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// The developer doing the work.
    pub developer_id: DeveloperId,
    /// The project receiving the work.
    pub project_id: ProjectId,
    /// Workdays assigned over the whole run.
    pub tot_working_days: u32,
}

/// One record per pair with a non-zero total, ordered by developer then project.
pub fn assemble(assignments: &Assignments) -> Vec<AssignmentRecord> {
    // BTreeMap iteration is already ordered by (developer, project).
    assignments
        .iter()
        .filter(|(_, days)| **days > 0)
        .map(|(&(developer_id, project_id), &days)| AssignmentRecord {
            developer_id,
            project_id,
            tot_working_days: days,
        })
        .collect()
}
