//! Hard-constraint feasibility checks.
//!
//! [`is_feasible`] decides whether placing one session at one candidate
//! (room, start slot) violates any hard constraint, given the current
//! partial assignment held in the [`ConflictIndex`]. It is a pure predicate
//! chain; every rejection names the first violated constraint.
//!
//! [`audit`] is the offline counterpart: it re-derives every violation of a
//! finished set of placements from scratch, independent of the index, and
//! backs the engine's no-double-booking and idempotency guarantees.

mod index;

pub use index::ConflictIndex;

use std::collections::HashMap;

use crate::models::{
    Classroom, Placement, Professor, Session, SlotGrid, TimeSlot, Violation,
};

/// Why a candidate placement is infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    /// Span leaves the day or crosses a break period.
    BrokenContiguity,
    /// Room type doesn't match the session kind.
    WrongRoomType,
    /// Room seats fewer students than enrolled.
    OverCapacity,
    /// Room does not admit one of the session's batches.
    BatchNotAdmitted,
    /// Room already booked in the span.
    RoomBusy,
    /// Professor's calendar blocks a slot in the span.
    ProfessorUnavailable,
    /// Professor already booked in the span.
    ProfessorBusy,
    /// Placement would exceed the professor's daily cap.
    DailyHoursExceeded,
    /// A batch already attends another session in the span.
    BatchBusy,
}

impl ConflictReason {
    /// Short description for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            ConflictReason::BrokenContiguity => "span leaves the day or crosses a break",
            ConflictReason::WrongRoomType => "room type mismatch",
            ConflictReason::OverCapacity => "room capacity exceeded",
            ConflictReason::BatchNotAdmitted => "batch not admitted to room",
            ConflictReason::RoomBusy => "room already booked",
            ConflictReason::ProfessorUnavailable => "professor calendar blocked",
            ConflictReason::ProfessorBusy => "professor already booked",
            ConflictReason::DailyHoursExceeded => "professor daily hour cap reached",
            ConflictReason::BatchBusy => "batch already booked",
        }
    }
}

/// Outcome of a feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// Placement violates no hard constraint.
    Ok,
    /// Placement violates the named constraint.
    Violated(ConflictReason),
}

impl Feasibility {
    /// Whether the placement is feasible.
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, Feasibility::Ok)
    }
}

/// Checks every hard constraint for placing `session` at `start` in `room`
/// taught by `professor`, against the current partial assignment.
///
/// Returns the first violated constraint, checked in a fixed order:
/// contiguity, room suitability, room availability, professor, batches.
pub fn is_feasible(
    index: &ConflictIndex,
    grid: &SlotGrid,
    session: &Session,
    room: &Classroom,
    professor: &Professor,
    start: TimeSlot,
) -> Feasibility {
    let span_slots = match grid.span_within_day(start, session.periods) {
        Some(slots) => slots,
        None => return Feasibility::Violated(ConflictReason::BrokenContiguity),
    };

    if room.room_type != session.required_room_type() {
        return Feasibility::Violated(ConflictReason::WrongRoomType);
    }
    if !room.seats(session.students) {
        return Feasibility::Violated(ConflictReason::OverCapacity);
    }
    if !session.batches.iter().all(|b| room.admits(b)) {
        return Feasibility::Violated(ConflictReason::BatchNotAdmitted);
    }

    for &slot in &span_slots {
        if !index.room_free(&room.code, slot, session.span) {
            return Feasibility::Violated(ConflictReason::RoomBusy);
        }
    }

    for &slot in &span_slots {
        if !professor.is_free_at(slot) {
            return Feasibility::Violated(ConflictReason::ProfessorUnavailable);
        }
        if !index.professor_free(&professor.name, slot, session.span) {
            return Feasibility::Violated(ConflictReason::ProfessorBusy);
        }
    }
    let day_load = index.professor_day_load(&professor.name, start.day.index(), session.span);
    if day_load + session.periods as u8 > professor.max_hours_per_day {
        return Feasibility::Violated(ConflictReason::DailyHoursExceeded);
    }

    for batch in &session.batches {
        for &slot in &span_slots {
            if !index.batch_free(batch, slot, session.span, session.elective_group.as_deref()) {
                return Feasibility::Violated(ConflictReason::BatchBusy);
            }
        }
    }

    Feasibility::Ok
}

/// Collects every hard constraint a candidate placement would violate.
///
/// The relaxation pass uses this to rank least-bad candidates; unlike
/// [`is_feasible`] it does not stop at the first violation. A span that
/// leaves the day or crosses a break reports only `BrokenContiguity`,
/// since the remaining checks need concrete slots.
pub fn violated_constraints(
    index: &ConflictIndex,
    grid: &SlotGrid,
    session: &Session,
    room: &Classroom,
    professor: &Professor,
    start: TimeSlot,
) -> Vec<ConflictReason> {
    let span_slots = match grid.span_within_day(start, session.periods) {
        Some(slots) => slots,
        None => return vec![ConflictReason::BrokenContiguity],
    };
    let mut reasons = Vec::new();

    if room.room_type != session.required_room_type() {
        reasons.push(ConflictReason::WrongRoomType);
    }
    if !room.seats(session.students) {
        reasons.push(ConflictReason::OverCapacity);
    }
    if !session.batches.iter().all(|b| room.admits(b)) {
        reasons.push(ConflictReason::BatchNotAdmitted);
    }
    if span_slots
        .iter()
        .any(|&slot| !index.room_free(&room.code, slot, session.span))
    {
        reasons.push(ConflictReason::RoomBusy);
    }
    if span_slots.iter().any(|&slot| !professor.is_free_at(slot)) {
        reasons.push(ConflictReason::ProfessorUnavailable);
    }
    if span_slots
        .iter()
        .any(|&slot| !index.professor_free(&professor.name, slot, session.span))
    {
        reasons.push(ConflictReason::ProfessorBusy);
    }
    let day_load = index.professor_day_load(&professor.name, start.day.index(), session.span);
    if day_load + session.periods as u8 > professor.max_hours_per_day {
        reasons.push(ConflictReason::DailyHoursExceeded);
    }
    if session.batches.iter().any(|batch| {
        span_slots
            .iter()
            .any(|&slot| !index.batch_free(batch, slot, session.span, session.elective_group.as_deref()))
    }) {
        reasons.push(ConflictReason::BatchBusy);
    }

    reasons
}

/// Re-derives every hard-constraint violation of a finished placement set.
///
/// Works from the placements alone (no index), so it doubles as a
/// consistency check on the engine: a timetable reported `Solved` must
/// audit clean, and re-auditing the same placements is idempotent.
pub fn audit(
    placements: &[Placement],
    rooms: &[Classroom],
    professors: &[Professor],
    grid: &SlotGrid,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let room_by_code: HashMap<&str, &Classroom> =
        rooms.iter().map(|r| (r.code.as_str(), r)).collect();
    let prof_by_name: HashMap<&str, &Professor> =
        professors.iter().map(|p| (p.name.as_str(), p)).collect();

    // Per-placement checks: suitability, contiguity, calendar.
    for p in placements {
        let start = TimeSlot::new(p.day, p.start_period);
        if grid.span_within_day(start, p.periods).is_none() {
            violations.push(Violation::room_unsuitable(
                &p.session_id,
                format!("'{}' leaves the day or crosses a break at {}", p.session_id, start),
            ));
        }
        match room_by_code.get(p.room.as_str()) {
            None => violations.push(Violation::room_unsuitable(
                &p.room,
                format!("'{}' placed in unknown room '{}'", p.session_id, p.room),
            )),
            Some(room) => {
                if room.room_type != p.kind.required_room_type() {
                    violations.push(Violation::room_unsuitable(
                        &p.room,
                        format!(
                            "'{}' needs a {} room, '{}' is {}",
                            p.session_id,
                            p.kind.required_room_type(),
                            room.code,
                            room.room_type
                        ),
                    ));
                }
                if !room.seats(p.students) {
                    violations.push(Violation::capacity_exceeded(
                        &p.room,
                        format!(
                            "{} students in {}-seat room '{}' for '{}'",
                            p.students, room.capacity, room.code, p.session_id
                        ),
                    ));
                }
                for batch in &p.batches {
                    if !room.admits(batch) {
                        violations.push(Violation::room_unsuitable(
                            &p.room,
                            format!("room '{}' does not admit batch '{}'", room.code, batch),
                        ));
                    }
                }
            }
        }
        if let Some(prof) = prof_by_name.get(p.professor.as_str()) {
            for slot in p.slots() {
                if !prof.is_free_at(slot) {
                    violations.push(Violation::professor_unavailable(
                        &p.professor,
                        format!("'{}' placed at blocked slot {}", p.session_id, slot),
                    ));
                }
            }
        }
    }

    // Pairwise overlap checks.
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if !a.span.overlaps(b.span) || a.day != b.day || !ranges_overlap(a, b) {
                continue;
            }
            if a.room == b.room {
                violations.push(Violation::room_clash(
                    &a.room,
                    format!("'{}' and '{}' share room '{}'", a.session_id, b.session_id, a.room),
                ));
            }
            if a.professor == b.professor {
                violations.push(Violation::professor_clash(
                    &a.professor,
                    format!(
                        "'{}' teaches '{}' and '{}' at once",
                        a.professor, a.session_id, b.session_id
                    ),
                ));
            }
            let same_elective = match (&a.elective_group, &b.elective_group) {
                (Some(ga), Some(gb)) => ga == gb,
                _ => false,
            };
            if !same_elective {
                for batch in a.batches.iter().filter(|ba| b.batches.contains(ba)) {
                    violations.push(Violation::batch_clash(
                        batch,
                        format!(
                            "batch '{}' attends '{}' and '{}' at once",
                            batch, a.session_id, b.session_id
                        ),
                    ));
                }
            }
        }
    }

    // Daily-hour caps per professor, per day, per term half.
    let mut day_load: HashMap<(&str, usize, usize), usize> = HashMap::new();
    for p in placements {
        for layer in half_layers(p.span) {
            *day_load
                .entry((p.professor.as_str(), p.day.index(), *layer))
                .or_insert(0) += p.periods;
        }
    }
    let mut reported: Vec<(&str, usize)> = Vec::new();
    let mut keys: Vec<_> = day_load.keys().copied().collect();
    keys.sort_unstable();
    for (prof_name, day, layer) in keys {
        let load = day_load[&(prof_name, day, layer)];
        if let Some(prof) = prof_by_name.get(prof_name) {
            if load > usize::from(prof.max_hours_per_day) && !reported.contains(&(prof_name, day)) {
                reported.push((prof_name, day));
                violations.push(Violation::daily_hours_exceeded(
                    prof_name,
                    format!(
                        "'{}' booked {} periods on day {} (cap {})",
                        prof_name, load, day, prof.max_hours_per_day
                    ),
                ));
            }
        }
    }

    violations
}

fn ranges_overlap(a: &Placement, b: &Placement) -> bool {
    a.start_period < b.start_period + b.periods && b.start_period < a.start_period + a.periods
}

fn half_layers(span: crate::models::SemesterSpan) -> &'static [usize] {
    use crate::models::SemesterSpan::*;
    match span {
        Full => &[0, 1],
        FirstHalf => &[0],
        SecondHalf => &[1],
    }
}
