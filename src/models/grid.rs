//! The weekly slot grid.
//!
//! A timetable lives on a fixed Cartesian grid of days × periods. Every
//! placement refers to a `TimeSlot` on this grid; multi-period sessions
//! occupy a contiguous run of periods within one day.
//!
//! # Break periods
//! The grid may mark periods (e.g. a lunch period) as breaks. No session
//! may start in, end in, or span across a break period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A weekday. The grid uses the first `days` entries in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// All six weekdays in grid order.
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    /// Zero-based index within the week (Mon = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at the given index, if within `Mon..=Sat`.
    pub fn from_index(index: usize) -> Option<Day> {
        Day::ALL.get(index).copied()
    }

    /// Full weekday name.
    pub fn name(self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
            Day::Sat => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cell of the grid: (day, period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Weekday.
    pub day: Day,
    /// Zero-based period within the day.
    pub period: usize,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(day: Day, period: usize) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P{}", self.day.name(), self.period + 1)
    }
}

/// The fixed days × periods grid for one run.
///
/// Slot enumeration order is deterministic: days Mon→Sat, periods
/// ascending. The default grid matches a common teaching week:
/// 5 days × 10 periods with a lunch break at period 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    /// Number of teaching days (1..=6, starting Monday).
    pub days: usize,
    /// Periods per day.
    pub periods_per_day: usize,
    /// Period indices no session may occupy or span across.
    pub breaks: Vec<usize>,
}

impl SlotGrid {
    /// Creates a grid with no break periods.
    pub fn new(days: usize, periods_per_day: usize) -> Self {
        Self {
            days: days.min(Day::ALL.len()),
            periods_per_day,
            breaks: Vec::new(),
        }
    }

    /// Marks a period as a break.
    pub fn with_break(mut self, period: usize) -> Self {
        if !self.breaks.contains(&period) {
            self.breaks.push(period);
            self.breaks.sort_unstable();
        }
        self
    }

    /// Total number of slots, breaks included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.days * self.periods_per_day
    }

    /// Dense index of a slot within `0..slot_count()`.
    #[inline]
    pub fn slot_index(&self, slot: TimeSlot) -> usize {
        slot.day.index() * self.periods_per_day + slot.period
    }

    /// Whether the slot lies on the grid.
    pub fn contains(&self, slot: TimeSlot) -> bool {
        slot.day.index() < self.days && slot.period < self.periods_per_day
    }

    /// Whether a period is a break period.
    #[inline]
    pub fn is_break(&self, period: usize) -> bool {
        self.breaks.contains(&period)
    }

    /// Teaching days in order.
    pub fn days_iter(&self) -> impl Iterator<Item = Day> + '_ {
        Day::ALL.iter().copied().take(self.days)
    }

    /// All slots in deterministic order (days Mon→Sat, periods ascending).
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.days_iter().flat_map(move |day| {
            (0..self.periods_per_day).map(move |period| TimeSlot::new(day, period))
        })
    }

    /// Teachable (non-break) periods available on one day.
    pub fn teaching_periods(&self) -> usize {
        (0..self.periods_per_day)
            .filter(|p| !self.is_break(*p))
            .count()
    }

    /// Contiguous run of `len` periods starting at `start`, or `None` if
    /// the run leaves the grid or touches a break period.
    pub fn span_within_day(&self, start: TimeSlot, len: usize) -> Option<Vec<TimeSlot>> {
        if len == 0 || !self.contains(start) {
            return None;
        }
        let end = start.period + len;
        if end > self.periods_per_day {
            return None;
        }
        if (start.period..end).any(|p| self.is_break(p)) {
            return None;
        }
        Some((start.period..end).map(|p| TimeSlot::new(start.day, p)).collect())
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::new(5, 10).with_break(5)
    }
}
