//! Professor model and availability.
//!
//! Availability combines positive free windows with blocked slots on the
//! weekly grid. An absent or empty availability means always free; blocked
//! slots override free windows. Professors also carry a per-day teaching
//! hour cap, enforced incrementally by the conflict index.

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// Default cap on teaching periods per day.
pub const DEFAULT_MAX_HOURS_PER_DAY: u8 = 6;

/// Weekly availability on the slot grid.
///
/// A slot is free iff it is in at least one free window (or no windows are
/// declared) and not blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Slots declared free. Empty = every slot free.
    pub free_slots: Vec<TimeSlot>,
    /// Slots declared busy (override free slots).
    pub blocked_slots: Vec<TimeSlot>,
}

impl Availability {
    /// Availability with no restrictions.
    pub fn always_free() -> Self {
        Self::default()
    }

    /// Declares a free slot.
    pub fn with_free(mut self, slot: TimeSlot) -> Self {
        self.free_slots.push(slot);
        self
    }

    /// Declares a blocked slot.
    pub fn with_blocked(mut self, slot: TimeSlot) -> Self {
        self.blocked_slots.push(slot);
        self
    }

    /// Whether the professor is free at the given slot.
    pub fn is_free(&self, slot: TimeSlot) -> bool {
        if self.blocked_slots.contains(&slot) {
            return false;
        }
        self.free_slots.is_empty() || self.free_slots.contains(&slot)
    }
}

/// A professor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professor {
    /// Unique name.
    pub name: String,
    /// Course codes this professor may teach.
    pub courses: Vec<String>,
    /// Maximum teaching periods per day.
    pub max_hours_per_day: u8,
    /// Weekly availability. `None` = always free.
    pub availability: Option<Availability>,
    /// Slots this professor prefers to teach in (soft constraint).
    pub preferred_slots: Vec<TimeSlot>,
}

impl Professor {
    /// Creates a professor with the default daily cap and open calendar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            courses: Vec::new(),
            max_hours_per_day: DEFAULT_MAX_HOURS_PER_DAY,
            availability: None,
            preferred_slots: Vec::new(),
        }
    }

    /// Adds a course the professor may teach.
    pub fn with_course(mut self, code: impl Into<String>) -> Self {
        self.courses.push(code.into());
        self
    }

    /// Sets the daily teaching cap.
    pub fn with_max_hours_per_day(mut self, hours: u8) -> Self {
        self.max_hours_per_day = hours;
        self
    }

    /// Sets the availability calendar.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    /// Adds a preferred slot.
    pub fn with_preferred_slot(mut self, slot: TimeSlot) -> Self {
        self.preferred_slots.push(slot);
        self
    }

    /// Whether the professor may teach the given course.
    pub fn teaches(&self, course_code: &str) -> bool {
        self.courses.iter().any(|c| c == course_code)
    }

    /// Whether the professor is free at the given slot.
    pub fn is_free_at(&self, slot: TimeSlot) -> bool {
        match &self.availability {
            None => true,
            Some(a) => a.is_free(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    #[test]
    fn test_professor_defaults() {
        let prof = Professor::new("Prof. Rao");
        assert_eq!(prof.max_hours_per_day, DEFAULT_MAX_HOURS_PER_DAY);
        assert!(prof.is_free_at(TimeSlot::new(Day::Mon, 0)));
        assert!(prof.is_free_at(TimeSlot::new(Day::Sat, 9)));
    }

    #[test]
    fn test_blocked_overrides_free() {
        let avail = Availability::always_free()
            .with_free(TimeSlot::new(Day::Mon, 0))
            .with_free(TimeSlot::new(Day::Mon, 1))
            .with_blocked(TimeSlot::new(Day::Mon, 1));
        let prof = Professor::new("Prof. Iyer").with_availability(avail);

        assert!(prof.is_free_at(TimeSlot::new(Day::Mon, 0)));
        assert!(!prof.is_free_at(TimeSlot::new(Day::Mon, 1)));
        // Free windows declared → everything else is busy
        assert!(!prof.is_free_at(TimeSlot::new(Day::Tue, 0)));
    }

    #[test]
    fn test_blocked_only_calendar() {
        let avail = Availability::always_free().with_blocked(TimeSlot::new(Day::Wed, 3));
        let prof = Professor::new("Prof. Das").with_availability(avail);

        assert!(!prof.is_free_at(TimeSlot::new(Day::Wed, 3)));
        assert!(prof.is_free_at(TimeSlot::new(Day::Wed, 4)));
    }

    #[test]
    fn test_teaches() {
        let prof = Professor::new("Prof. Sen")
            .with_course("CS301")
            .with_course("CS310");
        assert!(prof.teaches("CS301"));
        assert!(!prof.teaches("MA101"));
    }
}
