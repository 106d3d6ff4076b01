//! Course model.
//!
//! A course is the unit the loader hands the engine: weekly contact hours
//! broken down by session kind (the LTPSC convention), the batches it
//! serves, its professor assignment, and its room requirement. Courses are
//! immutable once loaded; the engine expands them into [`Session`]s before
//! search begins.
//!
//! [`Session`]: super::Session

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Weekly contact hours per session kind, plus credits.
///
/// The Lecture/Tutorial/Practical/Self-study/Credits breakdown. Self-study
/// hours are never scheduled; credits are carried for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHours {
    /// Lecture hours per week.
    pub lecture: u8,
    /// Tutorial hours per week.
    pub tutorial: u8,
    /// Practical (lab) hours per week.
    pub practical: u8,
    /// Self-study hours per week (not scheduled).
    pub self_study: u8,
    /// Credit value.
    pub credits: u8,
}

impl ContactHours {
    /// Creates an hour breakdown from the (L, T, P, S, C) convention.
    pub fn new(lecture: u8, tutorial: u8, practical: u8, self_study: u8, credits: u8) -> Self {
        Self {
            lecture,
            tutorial,
            practical,
            self_study,
            credits,
        }
    }

    /// Total scheduled hours per week (L + T + P).
    pub fn scheduled(&self) -> u8 {
        self.lecture + self.tutorial + self.practical
    }
}

/// Kind of a schedulable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Lecture,
    Tutorial,
    Practical,
}

impl SessionKind {
    /// Room type this kind of session must be held in.
    pub fn required_room_type(self) -> RoomType {
        match self {
            SessionKind::Lecture | SessionKind::Tutorial => RoomType::Lecture,
            SessionKind::Practical => RoomType::Lab,
        }
    }

    /// Short label used in export rows.
    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Lecture => "Lecture",
            SessionKind::Tutorial => "Tutorial",
            SessionKind::Practical => "Lab",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classroom category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Regular lecture/tutorial room.
    Lecture,
    /// Laboratory.
    Lab,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoomType::Lecture => "Lecture",
            RoomType::Lab => "Lab",
        })
    }
}

/// Which part of the term a course runs in.
///
/// Sessions of courses in opposite halves never share resources, so they
/// may occupy the same (room, slot) cell of the weekly grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemesterSpan {
    /// Whole term.
    #[default]
    Full,
    /// First half of the term.
    FirstHalf,
    /// Second half of the term.
    SecondHalf,
}

impl SemesterSpan {
    /// Whether two spans share any weeks.
    pub fn overlaps(self, other: SemesterSpan) -> bool {
        use SemesterSpan::*;
        match (self, other) {
            (Full, _) | (_, Full) => true,
            (FirstHalf, FirstHalf) | (SecondHalf, SecondHalf) => true,
            _ => false,
        }
    }
}

/// A course to be timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Weekly contact hour breakdown.
    pub hours: ContactHours,
    /// Default professor for all batches.
    pub professor: String,
    /// Per-batch professor overrides.
    pub batch_professors: HashMap<String, String>,
    /// Semester number the course belongs to.
    pub semester: u8,
    /// Room category required by lecture/tutorial sessions.
    pub room_type: RoomType,
    /// Batches taking this course.
    pub batches: Vec<String>,
    /// Enrolled student count per batch.
    pub students_per_batch: HashMap<String, u32>,
    /// Full- or half-semester course.
    pub span: SemesterSpan,
    /// Elective group this course belongs to, if any.
    pub elective_group: Option<String>,
}

impl Course {
    /// Creates a course with the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            hours: ContactHours::default(),
            professor: String::new(),
            batch_professors: HashMap::new(),
            semester: 1,
            room_type: RoomType::Lecture,
            batches: Vec::new(),
            students_per_batch: HashMap::new(),
            span: SemesterSpan::Full,
            elective_group: None,
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly hour breakdown.
    pub fn with_hours(mut self, hours: ContactHours) -> Self {
        self.hours = hours;
        self
    }

    /// Sets the default professor.
    pub fn with_professor(mut self, professor: impl Into<String>) -> Self {
        self.professor = professor.into();
        self
    }

    /// Overrides the professor for one batch.
    pub fn with_batch_professor(
        mut self,
        batch: impl Into<String>,
        professor: impl Into<String>,
    ) -> Self {
        self.batch_professors.insert(batch.into(), professor.into());
        self
    }

    /// Sets the semester number.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    /// Sets the required room type.
    pub fn with_room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    /// Adds a batch with its student count.
    pub fn with_batch(mut self, batch: impl Into<String>, students: u32) -> Self {
        let batch = batch.into();
        self.students_per_batch.insert(batch.clone(), students);
        self.batches.push(batch);
        self
    }

    /// Sets the term span.
    pub fn with_span(mut self, span: SemesterSpan) -> Self {
        self.span = span;
        self
    }

    /// Places the course in an elective group.
    pub fn with_elective_group(mut self, group: impl Into<String>) -> Self {
        self.elective_group = Some(group.into());
        self
    }

    /// Professor teaching this course for the given batch.
    pub fn professor_for(&self, batch: &str) -> &str {
        self.batch_professors
            .get(batch)
            .map(String::as_str)
            .unwrap_or(&self.professor)
    }

    /// Enrolled students for the given batch (0 if unknown).
    pub fn students_for(&self, batch: &str) -> u32 {
        self.students_per_batch.get(batch).copied().unwrap_or(0)
    }
}
