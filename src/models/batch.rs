//! Batch and elective group models.

use serde::{Deserialize, Serialize};

/// A student batch (one cohort section, e.g. `CSE_2A`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch identifier.
    pub id: String,
    /// Year of study.
    pub year: u8,
    /// Branch code (e.g. `CSE`).
    pub branch: String,
    /// Cohort size.
    pub size: u32,
    /// Elective groups this batch chooses from.
    pub elective_groups: Vec<String>,
}

impl Batch {
    /// Creates a batch.
    pub fn new(id: impl Into<String>, year: u8, branch: impl Into<String>, size: u32) -> Self {
        Self {
            id: id.into(),
            year,
            branch: branch.into(),
            size,
            elective_groups: Vec::new(),
        }
    }

    /// Registers an elective group available to this batch.
    pub fn with_elective_group(mut self, group: impl Into<String>) -> Self {
        self.elective_groups.push(group.into());
        self
    }
}

/// A set of mutually substitutable courses.
///
/// Students of a batch each enroll in exactly one course of the group, so
/// the group's sessions are scheduled concurrently: they may share a slot
/// for the same batch without double-booking any student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectiveGroup {
    /// Unique group identifier.
    pub id: String,
    /// Course codes in the group.
    pub courses: Vec<String>,
}

impl ElectiveGroup {
    /// Creates an elective group.
    pub fn new(id: impl Into<String>, courses: Vec<String>) -> Self {
        Self {
            id: id.into(),
            courses,
        }
    }

    /// Whether the group contains the given course.
    pub fn contains(&self, course_code: &str) -> bool {
        self.courses.iter().any(|c| c == course_code)
    }
}
