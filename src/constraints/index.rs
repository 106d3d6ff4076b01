//! Incremental conflict index.
//!
//! Busy-bookkeeping for rooms, professors, and batches, keyed by grid slot,
//! so feasibility checks cost O(periods) instead of rescanning the partial
//! assignment. `place` and `unplace` are exact inverses; the index must stay
//! consistent with the solver's live assignment at all times — divergence is
//! an engine bug, asserted in debug builds.
//!
//! # Term-half layers
//! Every busy table has one layer per term half. A full-semester session
//! occupies both layers; a half-semester session only its own. Sessions
//! whose layers don't intersect never conflict, which is how first-half and
//! second-half courses share the same weekly grid cells.

use std::collections::HashMap;

use crate::models::{Classroom, Professor, SemesterSpan, Session, SlotGrid, TimeSlot};

/// Number of term-half layers.
const LAYERS: usize = 2;

/// Layer indices a span occupies.
fn layers_of(span: SemesterSpan) -> &'static [usize] {
    match span {
        SemesterSpan::Full => &[0, 1],
        SemesterSpan::FirstHalf => &[0],
        SemesterSpan::SecondHalf => &[1],
    }
}

/// One occupant of a batch slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchOccupant {
    session_id: String,
    elective_group: Option<String>,
}

/// Slot-indexed occupancy tables for one solve.
#[derive(Debug, Clone)]
pub struct ConflictIndex {
    grid: SlotGrid,
    /// room code → per-layer, per-slot occupying session ids.
    room_busy: HashMap<String, [Vec<Vec<String>>; LAYERS]>,
    /// professor name → per-layer, per-slot occupying session ids.
    prof_busy: HashMap<String, [Vec<Vec<String>>; LAYERS]>,
    /// professor name → per-layer, per-day booked periods.
    prof_day_load: HashMap<String, [Vec<u8>; LAYERS]>,
    /// batch id → per-layer, per-slot occupants.
    batch_busy: HashMap<String, [Vec<Vec<BatchOccupant>>; LAYERS]>,
}

impl ConflictIndex {
    /// Creates an empty index over the given grid and resources.
    pub fn new(
        grid: &SlotGrid,
        rooms: &[Classroom],
        professors: &[Professor],
        batch_ids: &[String],
    ) -> Self {
        let slots = grid.slot_count();
        let days = grid.days;

        let mut index = Self {
            grid: grid.clone(),
            room_busy: HashMap::new(),
            prof_busy: HashMap::new(),
            prof_day_load: HashMap::new(),
            batch_busy: HashMap::new(),
        };
        for room in rooms {
            index.room_busy.insert(room.code.clone(), empty_layers(slots));
        }
        for prof in professors {
            index.prof_busy.insert(prof.name.clone(), empty_layers(slots));
            index
                .prof_day_load
                .insert(prof.name.clone(), [vec![0; days], vec![0; days]]);
        }
        for batch in batch_ids {
            index.batch_busy.insert(batch.clone(), empty_layers(slots));
        }
        index
    }

    /// Whether the room is free at the slot for any layer of `span`.
    pub fn room_free(&self, room: &str, slot: TimeSlot, span: SemesterSpan) -> bool {
        let idx = self.grid.slot_index(slot);
        match self.room_busy.get(room) {
            None => false,
            Some(layers) => layers_of(span).iter().all(|&l| layers[l][idx].is_empty()),
        }
    }

    /// Whether the professor is unbooked at the slot for any layer of `span`.
    pub fn professor_free(&self, professor: &str, slot: TimeSlot, span: SemesterSpan) -> bool {
        let idx = self.grid.slot_index(slot);
        match self.prof_busy.get(professor) {
            // Unknown professors carry no bookings; the availability
            // calendar check is separate.
            None => true,
            Some(layers) => layers_of(span).iter().all(|&l| layers[l][idx].is_empty()),
        }
    }

    /// Booked periods for the professor on a day, maximised over the
    /// layers of `span`.
    pub fn professor_day_load(&self, professor: &str, day_index: usize, span: SemesterSpan) -> u8 {
        match self.prof_day_load.get(professor) {
            None => 0,
            Some(layers) => layers_of(span)
                .iter()
                .map(|&l| layers[l][day_index])
                .max()
                .unwrap_or(0),
        }
    }

    /// Whether the batch can attend a session at the slot.
    ///
    /// Free slots always admit. An occupied slot admits only sessions of
    /// the same elective group as every current occupant.
    pub fn batch_free(
        &self,
        batch: &str,
        slot: TimeSlot,
        span: SemesterSpan,
        elective_group: Option<&str>,
    ) -> bool {
        let idx = self.grid.slot_index(slot);
        match self.batch_busy.get(batch) {
            None => true,
            Some(layers) => layers_of(span).iter().all(|&l| {
                layers[l][idx].iter().all(|occ| {
                    matches!((&occ.elective_group, elective_group),
                        (Some(g), Some(e)) if g == e)
                })
            }),
        }
    }

    /// Records a session at (day, start..start+periods) in the given room.
    ///
    /// The caller decides feasibility first; relaxed placements may stack
    /// on occupied cells, and the index keeps every occupant so `unplace`
    /// stays exact.
    pub fn place(&mut self, session: &Session, room: &str, start: TimeSlot) {
        for offset in 0..session.periods {
            let slot = TimeSlot::new(start.day, start.period + offset);
            let idx = self.grid.slot_index(slot);
            for &l in layers_of(session.span) {
                if let Some(layers) = self.room_busy.get_mut(room) {
                    layers[l][idx].push(session.id.clone());
                }
                if let Some(layers) = self.prof_busy.get_mut(&session.professor) {
                    layers[l][idx].push(session.id.clone());
                }
                for batch in &session.batches {
                    if let Some(layers) = self.batch_busy.get_mut(batch) {
                        layers[l][idx].push(BatchOccupant {
                            session_id: session.id.clone(),
                            elective_group: session.elective_group.clone(),
                        });
                    }
                }
            }
        }
        for &l in layers_of(session.span) {
            if let Some(layers) = self.prof_day_load.get_mut(&session.professor) {
                layers[l][start.day.index()] += session.periods as u8;
            }
        }
    }

    /// Reverses a `place` with identical arguments.
    pub fn unplace(&mut self, session: &Session, room: &str, start: TimeSlot) {
        for offset in 0..session.periods {
            let slot = TimeSlot::new(start.day, start.period + offset);
            let idx = self.grid.slot_index(slot);
            for &l in layers_of(session.span) {
                if let Some(layers) = self.room_busy.get_mut(room) {
                    let removed = remove_one(&mut layers[l][idx], &session.id);
                    debug_assert!(removed, "unplace of unknown room booking: {}", session.id);
                }
                if let Some(layers) = self.prof_busy.get_mut(&session.professor) {
                    let removed = remove_one(&mut layers[l][idx], &session.id);
                    debug_assert!(removed, "unplace of unknown professor booking: {}", session.id);
                }
                for batch in &session.batches {
                    if let Some(layers) = self.batch_busy.get_mut(batch) {
                        let cell = &mut layers[l][idx];
                        let pos = cell.iter().position(|o| o.session_id == session.id);
                        debug_assert!(pos.is_some(), "unplace of unknown batch booking: {}", session.id);
                        if let Some(pos) = pos {
                            cell.remove(pos);
                        }
                    }
                }
            }
        }
        for &l in layers_of(session.span) {
            if let Some(layers) = self.prof_day_load.get_mut(&session.professor) {
                let load = &mut layers[l][start.day.index()];
                debug_assert!(*load >= session.periods as u8, "day load underflow");
                *load = load.saturating_sub(session.periods as u8);
            }
        }
    }

    /// Whether every table in the index is empty.
    pub fn is_empty(&self) -> bool {
        self.room_busy
            .values()
            .chain(self.prof_busy.values())
            .all(|layers| layers.iter().all(|l| l.iter().all(Vec::is_empty)))
            && self
                .batch_busy
                .values()
                .all(|layers| layers.iter().all(|l| l.iter().all(Vec::is_empty)))
            && self
                .prof_day_load
                .values()
                .all(|layers| layers.iter().all(|l| l.iter().all(|&h| h == 0)))
    }
}

fn empty_layers<T: Clone>(slots: usize) -> [Vec<Vec<T>>; LAYERS] {
    [vec![Vec::new(); slots], vec![Vec::new(); slots]]
}

fn remove_one(cell: &mut Vec<String>, session_id: &str) -> bool {
    match cell.iter().position(|s| s == session_id) {
        Some(pos) => {
            cell.remove(pos);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SessionKind};

    fn make_session(id: &str, span: SemesterSpan, group: Option<&str>) -> Session {
        Session {
            id: id.into(),
            course_code: "CS301".into(),
            course_name: String::new(),
            kind: SessionKind::Lecture,
            batches: vec!["CSE_2A".into()],
            professor: "Prof. Rao".into(),
            students: 55,
            periods: 1,
            instance: 0,
            semester: 3,
            span,
            elective_group: group.map(Into::into),
        }
    }

    fn make_index() -> ConflictIndex {
        let grid = SlotGrid::new(5, 4);
        let rooms = vec![Classroom::lecture("LH-1", 60)];
        let profs = vec![Professor::new("Prof. Rao")];
        ConflictIndex::new(&grid, &rooms, &profs, &["CSE_2A".to_string()])
    }

    #[test]
    fn test_place_marks_all_resources() {
        let mut index = make_index();
        let session = make_session("s1", SemesterSpan::Full, None);
        let slot = TimeSlot::new(Day::Mon, 0);

        assert!(index.room_free("LH-1", slot, SemesterSpan::Full));
        index.place(&session, "LH-1", slot);

        assert!(!index.room_free("LH-1", slot, SemesterSpan::Full));
        assert!(!index.professor_free("Prof. Rao", slot, SemesterSpan::Full));
        assert!(!index.batch_free("CSE_2A", slot, SemesterSpan::Full, None));
        assert_eq!(index.professor_day_load("Prof. Rao", 0, SemesterSpan::Full), 1);
        // Other slots untouched
        assert!(index.room_free("LH-1", TimeSlot::new(Day::Mon, 1), SemesterSpan::Full));
    }

    #[test]
    fn test_unplace_is_exact_inverse() {
        let mut index = make_index();
        let session = make_session("s1", SemesterSpan::Full, None);
        let slot = TimeSlot::new(Day::Tue, 2);

        index.place(&session, "LH-1", slot);
        index.unplace(&session, "LH-1", slot);

        assert!(index.is_empty());
        assert!(index.room_free("LH-1", slot, SemesterSpan::Full));
        assert_eq!(index.professor_day_load("Prof. Rao", 1, SemesterSpan::Full), 0);
    }

    #[test]
    fn test_multi_period_place() {
        let mut index = make_index();
        let mut session = make_session("lab1", SemesterSpan::Full, None);
        session.periods = 2;
        let slot = TimeSlot::new(Day::Wed, 1);

        index.place(&session, "LH-1", slot);
        assert!(!index.room_free("LH-1", TimeSlot::new(Day::Wed, 1), SemesterSpan::Full));
        assert!(!index.room_free("LH-1", TimeSlot::new(Day::Wed, 2), SemesterSpan::Full));
        assert!(index.room_free("LH-1", TimeSlot::new(Day::Wed, 3), SemesterSpan::Full));
        assert_eq!(index.professor_day_load("Prof. Rao", 2, SemesterSpan::Full), 2);

        index.unplace(&session, "LH-1", slot);
        assert!(index.is_empty());
    }

    #[test]
    fn test_half_semester_layers_do_not_conflict() {
        let mut index = make_index();
        let first = make_session("s-first", SemesterSpan::FirstHalf, None);
        let slot = TimeSlot::new(Day::Mon, 0);

        index.place(&first, "LH-1", slot);
        // Opposite half sees the cell as free
        assert!(index.room_free("LH-1", slot, SemesterSpan::SecondHalf));
        assert!(index.professor_free("Prof. Rao", slot, SemesterSpan::SecondHalf));
        assert!(index.batch_free("CSE_2A", slot, SemesterSpan::SecondHalf, None));
        // Same half and full-span see it as busy
        assert!(!index.room_free("LH-1", slot, SemesterSpan::FirstHalf));
        assert!(!index.room_free("LH-1", slot, SemesterSpan::Full));
        assert_eq!(index.professor_day_load("Prof. Rao", 0, SemesterSpan::SecondHalf), 0);
        assert_eq!(index.professor_day_load("Prof. Rao", 0, SemesterSpan::FirstHalf), 1);
    }

    #[test]
    fn test_elective_group_stacking() {
        let mut index = make_index();
        let first = make_session("el-1", SemesterSpan::Full, Some("open-3"));
        let slot = TimeSlot::new(Day::Thu, 1);
        index.place(&first, "LH-1", slot);

        // Same group may co-occupy the batch slot
        assert!(index.batch_free("CSE_2A", slot, SemesterSpan::Full, Some("open-3")));
        // Different group or non-elective may not
        assert!(!index.batch_free("CSE_2A", slot, SemesterSpan::Full, Some("open-4")));
        assert!(!index.batch_free("CSE_2A", slot, SemesterSpan::Full, None));

        // Stack a second elective, then remove one; the other remains
        let second = make_session("el-2", SemesterSpan::Full, Some("open-3"));
        index.place(&second, "LH-1", slot);
        index.unplace(&first, "LH-1", slot);
        assert!(!index.batch_free("CSE_2A", slot, SemesterSpan::Full, None));
        index.unplace(&second, "LH-1", slot);
        assert!(index.is_empty());
    }

    #[test]
    fn test_non_elective_occupant_blocks_elective() {
        let mut index = make_index();
        let plain = make_session("s1", SemesterSpan::Full, None);
        let slot = TimeSlot::new(Day::Fri, 0);
        index.place(&plain, "LH-1", slot);
        assert!(!index.batch_free("CSE_2A", slot, SemesterSpan::Full, Some("open-3")));
    }

    #[test]
    fn test_unknown_room_is_never_free() {
        let index = make_index();
        assert!(!index.room_free("NO-SUCH", TimeSlot::new(Day::Mon, 0), SemesterSpan::Full));
    }

    #[test]
    fn test_relaxed_stacking_keeps_both_occupants() {
        let mut index = make_index();
        let a = make_session("a", SemesterSpan::Full, None);
        let b = make_session("b", SemesterSpan::Full, None);
        let slot = TimeSlot::new(Day::Mon, 3);

        index.place(&a, "LH-1", slot);
        index.place(&b, "LH-1", slot); // relaxed double-booking
        index.unplace(&a, "LH-1", slot);
        // b still booked
        assert!(!index.room_free("LH-1", slot, SemesterSpan::Full));
        index.unplace(&b, "LH-1", slot);
        assert!(index.is_empty());
    }
}
