//! Timetabling domain models.
//!
//! Core data types for representing a weekly timetabling problem and its
//! solution: courses with LTPSC hour breakdowns, the sessions they expand
//! into, classrooms, professors, batches, the slot grid, and the finished
//! timetable. All inputs are immutable once constructed; the solver only
//! reads them and owns the mutable search state itself.

mod batch;
mod classroom;
mod course;
mod grid;
mod professor;
mod session;
mod timetable;

pub use batch::{Batch, ElectiveGroup};
pub use classroom::Classroom;
pub use course::{ContactHours, Course, RoomType, SemesterSpan, SessionKind};
pub use grid::{Day, SlotGrid, TimeSlot};
pub use professor::{Availability, Professor, DEFAULT_MAX_HOURS_PER_DAY};
pub use session::{build_sessions, ModelError, Session, SessionDurations};
pub use timetable::{
    Placement, SearchStats, SolveOutcome, Timetable, UnplacedSession, Violation, ViolationKind,
};
