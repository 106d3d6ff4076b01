//! Input validation for timetabling problems.
//!
//! Checks structural integrity of courses, classrooms, professors, and
//! batches before scheduling. Detects:
//! - Duplicate codes/names
//! - Dangling references (course → batch, course → professor,
//!   elective group → course)
//! - Professors assigned courses outside their teaching list
//! - Unusable resources (zero-capacity rooms, empty grids)
//!
//! All errors are collected and returned together; the engine refuses to
//! search on any of them.

use std::collections::HashSet;

use crate::models::{Batch, Classroom, Course, ElectiveGroup, Professor, SlotGrid};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identifier.
    DuplicateId,
    /// A course references a batch that doesn't exist.
    UnknownBatch,
    /// A course references a professor that doesn't exist.
    UnknownProfessor,
    /// An elective group references a course that doesn't exist.
    UnknownCourse,
    /// A professor is assigned a course outside their teaching list.
    NotQualified,
    /// A room cannot seat anyone.
    ZeroCapacityRoom,
    /// The slot grid has no usable slots.
    EmptyGrid,
    /// The slot grid exceeds the supported size.
    GridTooLarge,
}

/// Largest supported periods-per-day (grid days are capped by the week).
pub const MAX_PERIODS_PER_DAY: usize = 64;

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_input(
    courses: &[Course],
    rooms: &[Classroom],
    professors: &[Professor],
    batches: &[Batch],
    elective_groups: &[ElectiveGroup],
    grid: &SlotGrid,
) -> ValidationResult {
    let mut errors = Vec::new();

    if grid.days == 0 || grid.teaching_periods() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            format!(
                "grid has {} days and {} teachable periods",
                grid.days,
                grid.teaching_periods()
            ),
        ));
    }
    if grid.periods_per_day > MAX_PERIODS_PER_DAY {
        errors.push(ValidationError::new(
            ValidationErrorKind::GridTooLarge,
            format!(
                "{} periods per day exceeds the supported maximum of {}",
                grid.periods_per_day, MAX_PERIODS_PER_DAY
            ),
        ));
    }

    let mut course_codes = HashSet::new();
    for course in courses {
        if !course_codes.insert(course.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate course code: {}", course.code),
            ));
        }
    }

    let mut room_codes = HashSet::new();
    for room in rooms {
        if !room_codes.insert(room.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate room code: {}", room.code),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacityRoom,
                format!("room '{}' has zero capacity", room.code),
            ));
        }
    }

    let mut prof_names = HashSet::new();
    for prof in professors {
        if !prof_names.insert(prof.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate professor: {}", prof.name),
            ));
        }
    }

    let mut batch_ids = HashSet::new();
    for batch in batches {
        if !batch_ids.insert(batch.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate batch: {}", batch.id),
            ));
        }
    }

    // Reference checks course → batch / professor.
    for course in courses {
        for batch in &course.batches {
            if !batch_ids.contains(batch.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownBatch,
                    format!("course '{}' references unknown batch '{}'", course.code, batch),
                ));
            }
        }
        let mut assigned: Vec<&str> = course
            .batch_professors
            .values()
            .map(String::as_str)
            .collect();
        assigned.sort_unstable();
        assigned.dedup();
        if !course.professor.is_empty() && !assigned.contains(&course.professor.as_str()) {
            assigned.push(&course.professor);
        }
        for name in assigned {
            match professors.iter().find(|p| p.name == name) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownProfessor,
                    format!("course '{}' references unknown professor '{}'", course.code, name),
                )),
                Some(prof) => {
                    if !prof.courses.is_empty() && !prof.teaches(&course.code) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::NotQualified,
                            format!("professor '{}' is not listed for course '{}'", name, course.code),
                        ));
                    }
                }
            }
        }
    }

    // Elective group references.
    for group in elective_groups {
        for code in &group.courses {
            if !course_codes.contains(code.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!("elective group '{}' references unknown course '{}'", group.id, code),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
