//! Timetable (solution) model.
//!
//! A timetable is the immutable result of one solve: session placements on
//! the weekly grid plus diagnostics — hard-constraint violations accepted
//! under relaxation, sessions left unplaced, the soft-constraint score, and
//! search statistics. Search-quality shortfalls are represented here as
//! data; they are never surfaced as errors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Day, SemesterSpan, SessionKind, TimeSlot};

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// Every session placed, no hard-constraint violations.
    Solved,
    /// Every session placed, but some only by relaxing hard constraints.
    PartiallySolved,
    /// Some sessions could not be placed at all; the input is structurally
    /// over-constrained.
    Infeasible,
}

/// One session fixed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Placed session ID.
    pub session_id: String,
    /// Course code (denormalized for reporting).
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Session kind.
    pub kind: SessionKind,
    /// Batches attending.
    pub batches: Vec<String>,
    /// Professor teaching.
    pub professor: String,
    /// Room code.
    pub room: String,
    /// Day of the placement.
    pub day: Day,
    /// First period occupied.
    pub start_period: usize,
    /// Number of consecutive periods occupied.
    pub periods: usize,
    /// Enrolled students across `batches`.
    pub students: u32,
    /// Term span of the parent course.
    pub span: SemesterSpan,
    /// Elective group of the parent course.
    pub elective_group: Option<String>,
    /// Whether this placement violates hard constraints (relaxation).
    pub relaxed: bool,
}

impl Placement {
    /// Slots this placement occupies, in period order.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        (self.start_period..self.start_period + self.periods)
            .map(|p| TimeSlot::new(self.day, p))
    }

    /// Whether the placement covers the given slot.
    pub fn covers(&self, slot: TimeSlot) -> bool {
        slot.day == self.day
            && slot.period >= self.start_period
            && slot.period < self.start_period + self.periods
    }
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Two sessions share a room slot.
    RoomClash,
    /// A professor teaches two sessions at once.
    ProfessorClash,
    /// A batch attends two non-elective sessions at once.
    BatchClash,
    /// Room seats fewer students than enrolled.
    CapacityExceeded,
    /// Professor placed beyond the daily teaching cap.
    DailyHoursExceeded,
    /// Professor placed in a slot their calendar blocks.
    ProfessorUnavailable,
    /// Room of the wrong type, or batch not admitted to the room.
    RoomUnsuitable,
}

/// A recorded hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Entity the violation concerns (session, room, professor, or batch).
    pub entity: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: u8,
}

impl Violation {
    /// Creates a room clash violation.
    pub fn room_clash(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::RoomClash,
            entity: entity.into(),
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates a professor clash violation.
    pub fn professor_clash(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::ProfessorClash,
            entity: entity.into(),
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates a batch clash violation.
    pub fn batch_clash(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::BatchClash,
            entity: entity.into(),
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates a capacity violation.
    pub fn capacity_exceeded(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::CapacityExceeded,
            entity: entity.into(),
            message: message.into(),
            severity: 80,
        }
    }

    /// Creates a daily-hours violation.
    pub fn daily_hours_exceeded(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::DailyHoursExceeded,
            entity: entity.into(),
            message: message.into(),
            severity: 60,
        }
    }

    /// Creates a professor-unavailable violation.
    pub fn professor_unavailable(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::ProfessorUnavailable,
            entity: entity.into(),
            message: message.into(),
            severity: 70,
        }
    }

    /// Creates a room-unsuitable violation.
    pub fn room_unsuitable(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::RoomUnsuitable,
            entity: entity.into(),
            message: message.into(),
            severity: 85,
        }
    }
}

/// A session the search could not place, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedSession {
    /// Session ID.
    pub session_id: String,
    /// Course code.
    pub course_code: String,
    /// Why no placement exists.
    pub reason: String,
}

/// Counters from one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search nodes expanded.
    pub nodes: u64,
    /// Chronological backtracks taken.
    pub backtracks: u64,
    /// Sessions placed via relaxation.
    pub relaxed: u64,
    /// Restart trials run.
    pub trials: u32,
}

/// A complete timetable: placements plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    /// Session placements.
    pub placements: Vec<Placement>,
    /// Hard-constraint violations accepted under relaxation.
    pub violations: Vec<Violation>,
    /// Sessions left unplaced.
    pub unplaced: Vec<UnplacedSession>,
    /// Soft-constraint score (lower is better).
    pub score: f64,
    /// Terminal state of the solve.
    pub outcome: SolveOutcome,
    /// Search statistics.
    pub stats: SearchStats,
}

impl Timetable {
    /// Whether the timetable is fully solved with no violations.
    pub fn is_valid(&self) -> bool {
        self.outcome == SolveOutcome::Solved && self.violations.is_empty()
    }

    /// Placements involving the given batch, in placement order.
    pub fn placements_for_batch(&self, batch: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.batches.iter().any(|b| b == batch))
            .collect()
    }

    /// Placements in the given room.
    pub fn placements_for_room(&self, room: &str) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.room == room).collect()
    }

    /// Placements taught by the given professor.
    pub fn placements_for_professor(&self, professor: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.professor == professor)
            .collect()
    }

    /// Finds the placement of a session.
    pub fn placement_for_session(&self, session_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.session_id == session_id)
    }

    /// Total placed periods per course code.
    pub fn placed_periods_by_course(&self) -> HashMap<String, usize> {
        let mut periods: HashMap<String, usize> = HashMap::new();
        for p in &self.placements {
            *periods.entry(p.course_code.clone()).or_insert(0) += p.periods;
        }
        periods
    }

    /// Number of placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_placement(session_id: &str, room: &str, day: Day, start: usize) -> Placement {
        Placement {
            session_id: session_id.into(),
            course_code: "CS301".into(),
            course_name: "Operating Systems".into(),
            kind: SessionKind::Lecture,
            batches: vec!["CSE_2A".into()],
            professor: "Prof. Rao".into(),
            room: room.into(),
            day,
            start_period: start,
            periods: 1,
            students: 55,
            span: SemesterSpan::Full,
            elective_group: None,
            relaxed: false,
        }
    }

    fn sample_timetable() -> Timetable {
        Timetable {
            placements: vec![
                sample_placement("CS301/CSE_2A/Lecture#0", "LH-1", Day::Mon, 0),
                sample_placement("CS301/CSE_2A/Lecture#1", "LH-1", Day::Tue, 2),
            ],
            violations: Vec::new(),
            unplaced: Vec::new(),
            score: 0.0,
            outcome: SolveOutcome::Solved,
            stats: SearchStats::default(),
        }
    }

    #[test]
    fn test_placement_slots() {
        let mut p = sample_placement("s", "LAB-1", Day::Wed, 2);
        p.periods = 2;
        let slots: Vec<TimeSlot> = p.slots().collect();
        assert_eq!(slots, vec![TimeSlot::new(Day::Wed, 2), TimeSlot::new(Day::Wed, 3)]);
        assert!(p.covers(TimeSlot::new(Day::Wed, 3)));
        assert!(!p.covers(TimeSlot::new(Day::Wed, 4)));
        assert!(!p.covers(TimeSlot::new(Day::Thu, 2)));
    }

    #[test]
    fn test_timetable_queries() {
        let tt = sample_timetable();
        assert_eq!(tt.placement_count(), 2);
        assert_eq!(tt.placements_for_batch("CSE_2A").len(), 2);
        assert!(tt.placements_for_batch("ECE_1A").is_empty());
        assert_eq!(tt.placements_for_room("LH-1").len(), 2);
        assert_eq!(tt.placements_for_professor("Prof. Rao").len(), 2);
        assert!(tt.placement_for_session("CS301/CSE_2A/Lecture#0").is_some());
        assert!(tt.placement_for_session("missing").is_none());
    }

    #[test]
    fn test_placed_periods_by_course() {
        let tt = sample_timetable();
        let periods = tt.placed_periods_by_course();
        assert_eq!(periods["CS301"], 2);
    }

    #[test]
    fn test_is_valid() {
        let mut tt = sample_timetable();
        assert!(tt.is_valid());

        tt.violations
            .push(Violation::room_clash("LH-1", "double booking"));
        assert!(!tt.is_valid());
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::professor_clash("Prof. Rao", "two sessions at Mon P1");
        assert_eq!(v.kind, ViolationKind::ProfessorClash);
        assert_eq!(v.severity, 95);

        let v = Violation::capacity_exceeded("LH-1", "62 students in a 60-seat room");
        assert_eq!(v.kind, ViolationKind::CapacityExceeded);
        assert!(v.severity < 95);

        let v = Violation::daily_hours_exceeded("Prof. Rao", "7th period of the day");
        assert_eq!(v.kind, ViolationKind::DailyHoursExceeded);
    }

    #[test]
    fn test_serde_round_trip() {
        let tt = sample_timetable();
        let json = serde_json::to_string(&tt).unwrap();
        let back: Timetable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.placement_count(), 2);
        assert_eq!(back.outcome, SolveOutcome::Solved);
    }
}
