//! Timetable reporting.
//!
//! Boundary glue between the engine and whatever renders the result: flat
//! export rows (one per placed session-period per batch) and a summary of
//! schedule quality. Consumes the [`Timetable`] interface only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{SolveOutcome, Timetable};
use crate::solver::SolveRequest;

/// One export row: a batch sitting one period of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    /// Weekday name.
    pub day: String,
    /// One-based period number.
    pub period: usize,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Session kind label.
    pub kind: String,
    /// Batch attending.
    pub batch: String,
    /// Room code.
    pub room: String,
    /// Professor teaching.
    pub professor: String,
}

/// Flattens a timetable into export rows.
///
/// One row per (placement, batch, period), ordered by day, period, course
/// code, batch — deterministic for a given timetable.
pub fn to_rows(timetable: &Timetable) -> Vec<TimetableRow> {
    let mut rows = Vec::new();
    for p in &timetable.placements {
        for slot in p.slots() {
            for batch in &p.batches {
                rows.push(TimetableRow {
                    day: slot.day.name().to_string(),
                    period: slot.period + 1,
                    course_code: p.course_code.clone(),
                    course_name: p.course_name.clone(),
                    kind: p.kind.label().to_string(),
                    batch: batch.clone(),
                    room: p.room.clone(),
                    professor: p.professor.clone(),
                });
            }
        }
    }
    rows.sort_by(|a, b| {
        day_order(&a.day)
            .cmp(&day_order(&b.day))
            .then(a.period.cmp(&b.period))
            .then(a.course_code.cmp(&b.course_code))
            .then(a.batch.cmp(&b.batch))
    });
    rows
}

/// Export rows for one batch.
pub fn batch_rows(timetable: &Timetable, batch: &str) -> Vec<TimetableRow> {
    to_rows(timetable)
        .into_iter()
        .filter(|r| r.batch == batch)
        .collect()
}

fn day_order(name: &str) -> usize {
    crate::models::Day::ALL
        .iter()
        .position(|d| d.name() == name)
        .unwrap_or(usize::MAX)
}

/// Quality summary of a finished timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Terminal state of the solve.
    pub outcome: SolveOutcome,
    /// Sessions placed / sessions required.
    pub placement_rate: f64,
    /// Placements accepted with hard-constraint violations.
    pub relaxed_count: usize,
    /// Sessions left unplaced.
    pub unplaced_count: usize,
    /// Recorded violations.
    pub violation_count: usize,
    /// Soft-constraint score (lower is better).
    pub score: f64,
    /// Occupied periods per room, over the teachable grid.
    pub room_utilization: HashMap<String, f64>,
}

impl ScheduleSummary {
    /// Computes the summary for a timetable against its request.
    pub fn calculate(timetable: &Timetable, request: &SolveRequest) -> Self {
        let total_sessions = timetable.placement_count() + timetable.unplaced.len();
        let placement_rate = if total_sessions == 0 {
            1.0
        } else {
            timetable.placement_count() as f64 / total_sessions as f64
        };

        // Utilization over the weekly teachable slots. Half-semester
        // sessions count half a cell each.
        let teachable = (request.grid.days * request.grid.teaching_periods()) as f64;
        let mut room_utilization = HashMap::new();
        if teachable > 0.0 {
            let mut busy: HashMap<&str, f64> = HashMap::new();
            for p in &timetable.placements {
                let weight = match p.span {
                    crate::models::SemesterSpan::Full => 1.0,
                    _ => 0.5,
                };
                *busy.entry(p.room.as_str()).or_insert(0.0) += p.periods as f64 * weight;
            }
            for room in &request.classrooms {
                let occupied = busy.get(room.code.as_str()).copied().unwrap_or(0.0);
                room_utilization.insert(room.code.clone(), occupied / teachable);
            }
        }

        Self {
            outcome: timetable.outcome,
            placement_rate,
            relaxed_count: timetable.placements.iter().filter(|p| p.relaxed).count(),
            unplaced_count: timetable.unplaced.len(),
            violation_count: timetable.violations.len(),
            score: timetable.score,
            room_utilization,
        }
    }
}
