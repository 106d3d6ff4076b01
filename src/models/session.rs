//! Session model and course expansion.
//!
//! A session is the smallest schedulable unit: one instance of a course's
//! weekly lecture/tutorial/practical requirement for one batch.
//! [`build_sessions`] expands every course into its sessions before search
//! begins; sessions are never mutated afterwards, only placed and unplaced.
//!
//! # Duration model
//! Lectures and tutorials occupy one period each. Practical hours are
//! grouped into lab blocks of `lab_periods` consecutive periods (default 2),
//! so a course with P=4 yields two 2-period lab sessions per batch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Course, RoomType, SemesterSpan, SessionKind};

/// How course hours map onto grid periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDurations {
    /// Periods per lecture/tutorial session.
    pub lecture_periods: usize,
    /// Consecutive periods per lab block.
    pub lab_periods: usize,
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            lecture_periods: 1,
            lab_periods: 2,
        }
    }
}

/// Errors detected while expanding courses into sessions.
///
/// All of these indicate malformed input; none of them is recoverable by
/// the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Practical hours don't divide into whole lab blocks.
    #[error("course '{course}': {hours} practical hours do not divide into {lab_periods}-period lab blocks")]
    UnevenPracticalHours {
        course: String,
        hours: u8,
        lab_periods: usize,
    },

    /// Lecture/tutorial hours don't divide into whole sessions.
    #[error("course '{course}': {hours} {kind} hours do not divide into {periods}-period sessions")]
    UnevenHours {
        course: String,
        kind: SessionKind,
        hours: u8,
        periods: usize,
    },

    /// A practical course declares a non-Lab room type.
    #[error("course '{course}' has practical hours but requires room type {room_type}, expected Lab")]
    PracticalNeedsLab { course: String, room_type: RoomType },

    /// A course serves no batches.
    #[error("course '{course}' lists no batches")]
    NoBatches { course: String },

    /// A course names no professor for one of its batches.
    #[error("course '{course}' has no professor for batch '{batch}'")]
    MissingProfessor { course: String, batch: String },

    /// Session durations are unusable.
    #[error("session durations must be nonzero (lecture={lecture_periods}, lab={lab_periods})")]
    ZeroDuration {
        lecture_periods: usize,
        lab_periods: usize,
    },
}

/// One schedulable unit derived from a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier, e.g. `CS301/CSE_2A/Lecture#2`.
    pub id: String,
    /// Parent course code.
    pub course_code: String,
    /// Parent course name (denormalized for reporting).
    pub course_name: String,
    /// Session kind.
    pub kind: SessionKind,
    /// Batches attending together.
    pub batches: Vec<String>,
    /// Professor teaching this session.
    pub professor: String,
    /// Total enrolled students across `batches`.
    pub students: u32,
    /// Duration in consecutive periods.
    pub periods: usize,
    /// Instance index within (course, batch, kind), zero-based.
    pub instance: u32,
    /// Semester number (from the course).
    pub semester: u8,
    /// Term span (from the course).
    pub span: SemesterSpan,
    /// Elective group (from the course).
    pub elective_group: Option<String>,
}

impl Session {
    /// Room type this session must be held in.
    #[inline]
    pub fn required_room_type(&self) -> RoomType {
        self.kind.required_room_type()
    }
}

/// Expands courses into concrete sessions.
///
/// One session per (course, batch, kind, instance): each batch gets its own
/// lecture/tutorial/lab series, with the course's per-batch professor
/// override applied. Fails on the first malformed course.
pub fn build_sessions(
    courses: &[Course],
    durations: &SessionDurations,
) -> Result<Vec<Session>, ModelError> {
    if durations.lecture_periods == 0 || durations.lab_periods == 0 {
        return Err(ModelError::ZeroDuration {
            lecture_periods: durations.lecture_periods,
            lab_periods: durations.lab_periods,
        });
    }

    let mut sessions = Vec::new();
    for course in courses {
        if course.hours.scheduled() > 0 && course.batches.is_empty() {
            return Err(ModelError::NoBatches {
                course: course.code.clone(),
            });
        }
        if course.hours.practical > 0 && course.room_type != RoomType::Lab {
            // Lecture-room requirement only constrains L/T sessions; a course
            // with practical hours must name a Lab.
            if course.hours.lecture == 0 && course.hours.tutorial == 0 {
                return Err(ModelError::PracticalNeedsLab {
                    course: course.code.clone(),
                    room_type: course.room_type,
                });
            }
        }

        for batch in &course.batches {
            let professor = course.professor_for(batch);
            if professor.is_empty() {
                return Err(ModelError::MissingProfessor {
                    course: course.code.clone(),
                    batch: batch.clone(),
                });
            }
            let students = course.students_for(batch);

            expand_kind(
                &mut sessions,
                course,
                batch,
                professor,
                students,
                SessionKind::Lecture,
                course.hours.lecture,
                durations.lecture_periods,
            )?;
            expand_kind(
                &mut sessions,
                course,
                batch,
                professor,
                students,
                SessionKind::Tutorial,
                course.hours.tutorial,
                durations.lecture_periods,
            )?;
            expand_kind(
                &mut sessions,
                course,
                batch,
                professor,
                students,
                SessionKind::Practical,
                course.hours.practical,
                durations.lab_periods,
            )?;
        }
    }
    Ok(sessions)
}

#[allow(clippy::too_many_arguments)]
fn expand_kind(
    sessions: &mut Vec<Session>,
    course: &Course,
    batch: &str,
    professor: &str,
    students: u32,
    kind: SessionKind,
    hours: u8,
    periods: usize,
) -> Result<(), ModelError> {
    if hours == 0 {
        return Ok(());
    }
    if usize::from(hours) % periods != 0 {
        return Err(match kind {
            SessionKind::Practical => ModelError::UnevenPracticalHours {
                course: course.code.clone(),
                hours,
                lab_periods: periods,
            },
            _ => ModelError::UnevenHours {
                course: course.code.clone(),
                kind,
                hours,
                periods,
            },
        });
    }

    let count = usize::from(hours) / periods;
    for instance in 0..count {
        sessions.push(Session {
            id: format!("{}/{}/{}#{}", course.code, batch, kind.label(), instance),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            kind,
            batches: vec![batch.to_string()],
            professor: professor.to_string(),
            students,
            periods,
            instance: instance as u32,
            semester: course.semester,
            span: course.span,
            elective_group: course.elective_group.clone(),
        });
    }
    Ok(())
}
