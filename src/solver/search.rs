//! Backtracking search over session placements.
//!
//! One trial = one complete search run with a private conflict index.
//! Sessions are ordered once by a static most-constrained-first priority;
//! candidates are enumerated deterministically (days, then periods, then
//! rooms by code), filtered through the hard-constraint checker, and ranked
//! by the soft-penalty delta they would introduce. Backtracking is
//! chronological over an explicit frame stack, so memory stays bounded and
//! budget checks run between frames, never inside recursion.
//!
//! When the node or time budget runs out, or the search space is exhausted,
//! the best prefix found so far is restored and the remaining sessions go
//! through a relaxation pass: each is placed at its least-violating
//! candidate and every violated constraint is recorded. Sessions with no
//! candidate at all stay unplaced and make the result `Infeasible`.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constraints::{is_feasible, violated_constraints, ConflictIndex, ConflictReason};
use crate::models::{
    Classroom, Day, Placement, Professor, SearchStats, Session, SlotGrid, SolveOutcome, TimeSlot,
    UnplacedSession, Violation,
};

use super::score::{score_quality, SoftState};
use super::SolverConfig;

/// A candidate placement: start slot plus room (index into the sorted
/// room list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    day: Day,
    start_period: usize,
    room: usize,
}

/// Result of one search trial.
#[derive(Debug, Clone)]
pub(crate) struct TrialResult {
    pub placements: Vec<Placement>,
    pub violations: Vec<Violation>,
    pub unplaced: Vec<UnplacedSession>,
    pub score: f64,
    pub outcome: SolveOutcome,
    pub stats: SearchStats,
}

impl TrialResult {
    /// Total-order key for picking the best trial: outcome first, then
    /// fewest unplaced, then lightest violations, then score.
    pub fn rank(&self) -> (u8, usize, u32, f64) {
        let outcome = match self.outcome {
            SolveOutcome::Solved => 0,
            SolveOutcome::PartiallySolved => 1,
            SolveOutcome::Infeasible => 2,
        };
        let severity: u32 = self.violations.iter().map(|v| u32::from(v.severity)).sum();
        (outcome, self.unplaced.len(), severity, self.score)
    }
}

/// Shared read-only inputs of one trial.
pub(crate) struct SearchInput<'a> {
    pub grid: &'a SlotGrid,
    pub sessions: &'a [Session],
    /// Rooms sorted ascending by code.
    pub rooms: &'a [Classroom],
    pub professors: &'a [Professor],
    pub batch_ids: &'a [String],
    pub config: &'a SolverConfig,
    pub deadline: Option<Instant>,
}

/// One stack entry: a session with its ranked candidates and the cursor of
/// the candidate currently placed (or about to be).
struct Frame {
    /// Position in the static session order.
    position: usize,
    /// Feasible candidates, best first.
    candidates: Vec<Candidate>,
    /// Index of the active candidate.
    cursor: usize,
}

/// Runs one search trial.
pub(crate) fn run_trial(input: &SearchInput<'_>, trial: u32) -> TrialResult {
    let profs: HashMap<&str, &Professor> = input
        .professors
        .iter()
        .map(|p| (p.name.as_str(), p))
        .collect();

    let mut rng = (trial > 0)
        .then(|| SmallRng::seed_from_u64(input.config.seed.wrapping_add(u64::from(trial))));

    let static_candidates = build_static_candidates(input, &profs);
    let mut order = session_order(input, &static_candidates, &mut rng);

    // A session with no statically valid candidate can never be placed
    // feasibly; it skips the search and goes straight to relaxation, so
    // it cannot drag placeable sessions down with it.
    let hopeless: Vec<usize> = order
        .iter()
        .copied()
        .filter(|&i| static_candidates[i].is_empty())
        .collect();
    order.retain(|&i| !static_candidates[i].is_empty());
    let searchable = order.len();
    order.extend(hopeless);

    let mut index = ConflictIndex::new(input.grid, input.rooms, input.professors, input.batch_ids);
    let mut soft = SoftState::new();
    let mut stats = SearchStats {
        trials: 1,
        ..SearchStats::default()
    };

    // Best prefix seen: candidates chosen for order[0..best.len()].
    let mut best_prefix: Vec<Candidate> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut complete = false;

    if searchable > 0 {
        frames.push(make_frame(input, &profs, &static_candidates, &order, 0, &index, &soft, &mut rng));
        stats.nodes += 1;
    } else {
        complete = true;
    }

    while !complete {
        if stats.nodes >= input.config.max_nodes || past_deadline(input.deadline) {
            trace!("trial {trial}: budget exhausted after {} nodes", stats.nodes);
            break;
        }

        let Some(top) = frames.last() else {
            break; // search space exhausted
        };
        let depth = frames.len() - 1;
        if top.cursor < top.candidates.len() {
            let cand = top.candidates[top.cursor];
            let session = &input.sessions[order[top.position]];
            index.place(session, &input.rooms[cand.room].code, start_of(cand));
            soft.add(session, start_of(cand));

            if depth + 1 > best_prefix.len() {
                best_prefix = frames.iter().map(|f| f.candidates[f.cursor]).collect();
            }
            if frames.len() == searchable {
                complete = true;
                break;
            }
            let next = frames.len();
            frames.push(make_frame(
                input, &profs, &static_candidates, &order, next, &index, &soft, &mut rng,
            ));
            stats.nodes += 1;
        } else {
            // Dead end: drop this frame, undo the parent's placement, and
            // move the parent to its next candidate.
            frames.pop();
            match frames.last_mut() {
                None => break,
                Some(parent) => {
                    let cand = parent.candidates[parent.cursor];
                    let session = &input.sessions[order[parent.position]];
                    index.unplace(session, &input.rooms[cand.room].code, start_of(cand));
                    soft.remove(session, start_of(cand));
                    parent.cursor += 1;
                    stats.backtracks += 1;
                }
            }
        }
    }

    let mut violations = Vec::new();
    let mut unplaced = Vec::new();
    let chosen: Vec<Candidate>;

    if complete {
        chosen = frames.iter().map(|f| f.candidates[f.cursor]).collect();
    } else {
        // Restore the deepest feasible prefix, then relax the rest.
        chosen = best_prefix;
        index = ConflictIndex::new(input.grid, input.rooms, input.professors, input.batch_ids);
        soft = SoftState::new();
        for (pos, cand) in chosen.iter().enumerate() {
            let session = &input.sessions[order[pos]];
            index.place(session, &input.rooms[cand.room].code, start_of(*cand));
            soft.add(session, start_of(*cand));
        }
    }

    let mut placements: Vec<Placement> = chosen
        .iter()
        .enumerate()
        .map(|(pos, cand)| make_placement(input, &input.sessions[order[pos]], *cand, false))
        .collect();

    for pos in chosen.len()..order.len() {
        let session = &input.sessions[order[pos]];
        if !input.config.relax {
            unplaced.push(UnplacedSession {
                session_id: session.id.clone(),
                course_code: session.course_code.clone(),
                reason: "search budget exhausted before placement".into(),
            });
            continue;
        }
        match relax_place(input, &profs, session, &mut index, &mut soft) {
            Some((cand, reasons)) => {
                let relaxed = !reasons.is_empty();
                if relaxed {
                    stats.relaxed += 1;
                    for reason in reasons {
                        violations.push(violation_for(reason, session, cand, input));
                    }
                }
                placements.push(make_placement(input, session, cand, relaxed));
            }
            None => unplaced.push(UnplacedSession {
                session_id: session.id.clone(),
                course_code: session.course_code.clone(),
                reason: "no candidate placement exists on the grid".into(),
            }),
        }
    }

    let outcome = if !unplaced.is_empty() {
        SolveOutcome::Infeasible
    } else if stats.relaxed > 0 {
        SolveOutcome::PartiallySolved
    } else {
        SolveOutcome::Solved
    };
    let score = score_quality(
        &placements,
        input.professors,
        &input.config.weights,
        &input.config.preferred_lab_periods,
    );
    debug!(
        "trial {trial}: {:?}, {} placed, {} relaxed, {} unplaced, score {score:.2}, {} nodes",
        outcome,
        placements.len(),
        stats.relaxed,
        unplaced.len(),
        stats.nodes
    );

    TrialResult {
        placements,
        violations,
        unplaced,
        score,
        outcome,
        stats,
    }
}

/// Statically feasible candidates per session: room suitability, span
/// validity, and the professor's calendar, ignoring other placements.
/// Enumeration order is days → periods → rooms by code.
fn build_static_candidates(
    input: &SearchInput<'_>,
    profs: &HashMap<&str, &Professor>,
) -> Vec<Vec<Candidate>> {
    input
        .sessions
        .iter()
        .map(|session| {
            let Some(prof) = profs.get(session.professor.as_str()) else {
                return Vec::new();
            };
            let mut candidates = Vec::new();
            for day in input.grid.days_iter() {
                'period: for period in 0..input.grid.periods_per_day {
                    let start = TimeSlot::new(day, period);
                    let Some(span) = input.grid.span_within_day(start, session.periods) else {
                        continue;
                    };
                    for &slot in &span {
                        if !prof.is_free_at(slot) {
                            continue 'period;
                        }
                    }
                    for (room_idx, room) in input.rooms.iter().enumerate() {
                        if room.room_type == session.required_room_type()
                            && room.seats(session.students)
                            && session.batches.iter().all(|b| room.admits(b))
                        {
                            candidates.push(Candidate {
                                day,
                                start_period: period,
                                room: room_idx,
                            });
                        }
                    }
                }
            }
            candidates
        })
        .collect()
}

/// Static most-constrained-first session order.
///
/// Key: fewest static candidates, then semester, then descending student
/// count, then course code, then session id. Restart trials (`rng` set)
/// shuffle first so equal keys land in a seed-dependent order.
fn session_order(
    input: &SearchInput<'_>,
    static_candidates: &[Vec<Candidate>],
    rng: &mut Option<SmallRng>,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..input.sessions.len()).collect();
    let shuffled = rng.is_some();
    if let Some(rng) = rng {
        order.shuffle(rng);
    }
    order.sort_by(|&a, &b| {
        let sa = &input.sessions[a];
        let sb = &input.sessions[b];
        let key = static_candidates[a]
            .len()
            .cmp(&static_candidates[b].len())
            .then(sa.semester.cmp(&sb.semester))
            .then(sb.students.cmp(&sa.students))
            .then(sa.course_code.cmp(&sb.course_code));
        if shuffled {
            // Leave equal keys in the shuffled order so restarts explore
            // different instance interleavings.
            key
        } else {
            key.then(sa.id.cmp(&sb.id))
        }
    });
    order
}

/// Builds the frame for the session at `position`: feasible candidates
/// ranked by soft-penalty delta, enumeration order breaking ties.
#[allow(clippy::too_many_arguments)]
fn make_frame(
    input: &SearchInput<'_>,
    profs: &HashMap<&str, &Professor>,
    static_candidates: &[Vec<Candidate>],
    order: &[usize],
    position: usize,
    index: &ConflictIndex,
    soft: &SoftState,
    rng: &mut Option<SmallRng>,
) -> Frame {
    let session = &input.sessions[order[position]];
    let mut ranked: Vec<(Candidate, f64)> = Vec::new();
    if let Some(prof) = profs.get(session.professor.as_str()) {
        for &cand in &static_candidates[order[position]] {
            let start = start_of(cand);
            if is_feasible(index, input.grid, session, &input.rooms[cand.room], prof, start).is_ok()
            {
                let delta = soft.delta(
                    session,
                    start,
                    prof,
                    &input.config.weights,
                    &input.config.preferred_lab_periods,
                );
                ranked.push((cand, delta));
            }
        }
    }
    if let Some(rng) = rng {
        ranked.shuffle(rng);
    }
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    Frame {
        position,
        candidates: ranked.into_iter().map(|(c, _)| c).collect(),
        cursor: 0,
    }
}

/// Places a session at its least-violating candidate.
///
/// The candidate universe keeps contiguity hard (spans must fit a day and
/// avoid breaks) but relaxes everything else, scored by summed violation
/// severity and broken by soft delta, then enumeration order. Returns the
/// chosen candidate and its violated constraints, or `None` when not even
/// a relaxed candidate exists.
fn relax_place(
    input: &SearchInput<'_>,
    profs: &HashMap<&str, &Professor>,
    session: &Session,
    index: &mut ConflictIndex,
    soft: &mut SoftState,
) -> Option<(Candidate, Vec<ConflictReason>)> {
    let prof = profs.get(session.professor.as_str())?;
    let mut best: Option<(u32, f64, Candidate, Vec<ConflictReason>)> = None;

    for day in input.grid.days_iter() {
        for period in 0..input.grid.periods_per_day {
            let start = TimeSlot::new(day, period);
            if input.grid.span_within_day(start, session.periods).is_none() {
                continue;
            }
            for (room_idx, room) in input.rooms.iter().enumerate() {
                let reasons = violated_constraints(index, input.grid, session, room, prof, start);
                let severity: u32 = reasons.iter().map(|r| u32::from(severity_of(*r))).sum();
                let delta = soft.delta(
                    session,
                    start,
                    prof,
                    &input.config.weights,
                    &input.config.preferred_lab_periods,
                );
                let better = match &best {
                    None => true,
                    Some((s, d, _, _)) => severity < *s || (severity == *s && delta < *d),
                };
                if better {
                    best = Some((
                        severity,
                        delta,
                        Candidate {
                            day,
                            start_period: period,
                            room: room_idx,
                        },
                        reasons,
                    ));
                }
            }
        }
    }

    let (_, _, cand, reasons) = best?;
    index.place(session, &input.rooms[cand.room].code, start_of(cand));
    soft.add(session, start_of(cand));
    Some((cand, reasons))
}

fn make_placement(
    input: &SearchInput<'_>,
    session: &Session,
    cand: Candidate,
    relaxed: bool,
) -> Placement {
    Placement {
        session_id: session.id.clone(),
        course_code: session.course_code.clone(),
        course_name: session.course_name.clone(),
        kind: session.kind,
        batches: session.batches.clone(),
        professor: session.professor.clone(),
        room: input.rooms[cand.room].code.clone(),
        day: cand.day,
        start_period: cand.start_period,
        periods: session.periods,
        students: session.students,
        span: session.span,
        elective_group: session.elective_group.clone(),
        relaxed,
    }
}

fn violation_for(
    reason: ConflictReason,
    session: &Session,
    cand: Candidate,
    input: &SearchInput<'_>,
) -> Violation {
    let room = &input.rooms[cand.room].code;
    let at = TimeSlot::new(cand.day, cand.start_period);
    let message = format!(
        "relaxed placement of '{}' in '{room}' at {at}: {}",
        session.id,
        reason.describe()
    );
    match reason {
        ConflictReason::RoomBusy => Violation::room_clash(room.clone(), message),
        ConflictReason::ProfessorBusy => Violation::professor_clash(session.professor.clone(), message),
        ConflictReason::BatchBusy => Violation::batch_clash(session.batches.join(","), message),
        ConflictReason::OverCapacity => Violation::capacity_exceeded(room.clone(), message),
        ConflictReason::DailyHoursExceeded => {
            Violation::daily_hours_exceeded(session.professor.clone(), message)
        }
        ConflictReason::ProfessorUnavailable => {
            Violation::professor_unavailable(session.professor.clone(), message)
        }
        ConflictReason::WrongRoomType
        | ConflictReason::BatchNotAdmitted
        | ConflictReason::BrokenContiguity => Violation::room_unsuitable(room.clone(), message),
    }
}

fn severity_of(reason: ConflictReason) -> u8 {
    match reason {
        ConflictReason::RoomBusy
        | ConflictReason::ProfessorBusy
        | ConflictReason::BatchBusy => 95,
        ConflictReason::WrongRoomType
        | ConflictReason::BatchNotAdmitted
        | ConflictReason::BrokenContiguity => 85,
        ConflictReason::OverCapacity => 80,
        ConflictReason::ProfessorUnavailable => 70,
        ConflictReason::DailyHoursExceeded => 60,
    }
}

#[inline]
fn start_of(cand: Candidate) -> TimeSlot {
    TimeSlot::new(cand.day, cand.start_period)
}

fn past_deadline(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
