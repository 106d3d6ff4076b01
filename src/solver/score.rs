//! Soft-constraint scoring.
//!
//! Soft constraints never block a placement; they rank otherwise-feasible
//! candidates and grade the finished timetable. Lower scores are better.
//!
//! # Penalties
//!
//! | Penalty | Counted as |
//! |---------|-----------|
//! | Spread | extra sessions of one (course, batch) on the same day |
//! | Gap | idle periods between a batch's first and last session per day |
//! | Preference | professor preferred-slot misses; labs outside preferred periods |
//!
//! The total score of a placement set equals the sum of incremental deltas
//! in any insertion order, so the search can rank candidates by delta and
//! still report a consistent final score.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Placement, Professor, Session, SessionKind, TimeSlot};

/// Weights for the soft-constraint penalties.
///
/// Defaults follow the priority weighting of a typical institute timetable:
/// clustering and idle gaps matter most, preferences matter less.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight per same-day repeat of one (course, batch).
    pub spread: f64,
    /// Weight per idle period inside a batch's day.
    pub gap: f64,
    /// Weight per preference miss.
    pub preference: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            spread: 0.3,
            gap: 0.3,
            preference: 0.2,
        }
    }
}

/// Incremental soft-penalty bookkeeping for one search.
///
/// Mirrors the placements held by the search so that the penalty delta of
/// a candidate is computable without rescanning the partial assignment.
/// `add` and `remove` are exact inverses.
#[derive(Debug, Clone, Default)]
pub(crate) struct SoftState {
    /// (course, batch, day) → sessions placed.
    course_batch_day: HashMap<(String, String, usize), u32>,
    /// (batch, day) → occupancy count per period. Counts (not a bitmask)
    /// so stacked elective sessions un-place exactly.
    batch_day_periods: HashMap<(String, usize), Vec<u16>>,
}

impl SoftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty added by placing `session` at (day, start..start+periods).
    pub fn delta(
        &self,
        session: &Session,
        start: TimeSlot,
        professor: &Professor,
        weights: &ScoreWeights,
        preferred_lab_periods: &[usize],
    ) -> f64 {
        let day = start.day.index();
        let mut penalty = 0.0;

        for batch in &session.batches {
            let repeats = self
                .course_batch_day
                .get(&(session.course_code.clone(), batch.clone(), day))
                .copied()
                .unwrap_or(0);
            if repeats > 0 {
                penalty += weights.spread * f64::from(repeats);
            }

            let mask = self.mask(batch, day);
            let added = span_mask(start.period, session.periods);
            penalty += weights.gap * (f64::from(gap_count(mask | added)) - f64::from(gap_count(mask)));
        }

        if !professor.preferred_slots.is_empty() {
            for offset in 0..session.periods {
                let slot = TimeSlot::new(start.day, start.period + offset);
                if !professor.preferred_slots.contains(&slot) {
                    penalty += weights.preference;
                }
            }
        }
        if session.kind == SessionKind::Practical
            && !preferred_lab_periods.is_empty()
            && !preferred_lab_periods.contains(&start.period)
        {
            penalty += weights.preference;
        }

        penalty
    }

    /// Records a placement.
    pub fn add(&mut self, session: &Session, start: TimeSlot) {
        let day = start.day.index();
        for batch in &session.batches {
            *self
                .course_batch_day
                .entry((session.course_code.clone(), batch.clone(), day))
                .or_insert(0) += 1;
            let counts = self
                .batch_day_periods
                .entry((batch.clone(), day))
                .or_insert_with(|| vec![0; 64]);
            for period in start.period..start.period + session.periods {
                counts[period] += 1;
            }
        }
    }

    /// Reverses an `add` with identical arguments.
    pub fn remove(&mut self, session: &Session, start: TimeSlot) {
        let day = start.day.index();
        for batch in &session.batches {
            let key = (session.course_code.clone(), batch.clone(), day);
            if let Some(count) = self.course_batch_day.get_mut(&key) {
                *count -= 1;
                if *count == 0 {
                    self.course_batch_day.remove(&key);
                }
            }
            if let Some(counts) = self.batch_day_periods.get_mut(&(batch.clone(), day)) {
                for period in start.period..start.period + session.periods {
                    debug_assert!(counts[period] > 0, "soft-state underflow");
                    counts[period] = counts[period].saturating_sub(1);
                }
            }
        }
    }

    /// Occupied-period bitmask for (batch, day).
    pub fn mask(&self, batch: &str, day: usize) -> u64 {
        match self.batch_day_periods.get(&(batch.to_string(), day)) {
            None => 0,
            Some(counts) => counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .fold(0u64, |mask, (i, _)| mask | (1u64 << i)),
        }
    }
}

/// Bitmask with `periods` bits set starting at `start`.
#[inline]
fn span_mask(start: usize, periods: usize) -> u64 {
    debug_assert!(start + periods <= 64);
    (((1u128 << periods) - 1) << start) as u64
}

/// Idle periods between the first and last set bit.
fn gap_count(mask: u64) -> u32 {
    if mask == 0 {
        return 0;
    }
    let first = mask.trailing_zeros();
    let last = 63 - mask.leading_zeros();
    (last - first + 1) - mask.count_ones()
}

/// Grades a finished placement set (lower is better).
///
/// Sums the three penalty families over all placements; agrees with the
/// accumulated deltas the search computed while building the assignment.
pub fn score_quality(
    placements: &[Placement],
    professors: &[Professor],
    weights: &ScoreWeights,
    preferred_lab_periods: &[usize],
) -> f64 {
    let prof_by_name: HashMap<&str, &Professor> =
        professors.iter().map(|p| (p.name.as_str(), p)).collect();

    // BTreeMaps keep the summation order stable, so equal timetables get
    // bit-identical scores across runs.
    let mut course_batch_day: BTreeMap<(&str, &str, usize), u32> = BTreeMap::new();
    let mut batch_day_mask: BTreeMap<(&str, usize), u64> = BTreeMap::new();
    let mut penalty = 0.0;

    for p in placements {
        for batch in &p.batches {
            *course_batch_day
                .entry((p.course_code.as_str(), batch.as_str(), p.day.index()))
                .or_insert(0) += 1;
            *batch_day_mask
                .entry((batch.as_str(), p.day.index()))
                .or_insert(0) |= span_mask(p.start_period, p.periods);
        }

        if let Some(prof) = prof_by_name.get(p.professor.as_str()) {
            if !prof.preferred_slots.is_empty() {
                for slot in p.slots() {
                    if !prof.preferred_slots.contains(&slot) {
                        penalty += weights.preference;
                    }
                }
            }
        }
        if p.kind == SessionKind::Practical
            && !preferred_lab_periods.is_empty()
            && !preferred_lab_periods.contains(&p.start_period)
        {
            penalty += weights.preference;
        }
    }

    for count in course_batch_day.values() {
        if *count > 1 {
            penalty += weights.spread * f64::from(count * (count - 1) / 2);
        }
    }
    for mask in batch_day_mask.values() {
        penalty += weights.gap * f64::from(gap_count(*mask));
    }

    penalty
}
