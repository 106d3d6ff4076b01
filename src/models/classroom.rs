//! Classroom model.

use serde::{Deserialize, Serialize};

use super::RoomType;

/// A classroom or laboratory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique room code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Room category.
    pub room_type: RoomType,
    /// Seats available.
    pub capacity: u32,
    /// Batches allowed to use this room. Empty = unrestricted.
    pub allowed_batches: Vec<String>,
}

impl Classroom {
    /// Creates a room with the given code and type.
    pub fn new(code: impl Into<String>, room_type: RoomType, capacity: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            room_type,
            capacity,
            allowed_batches: Vec::new(),
        }
    }

    /// Creates a lecture room.
    pub fn lecture(code: impl Into<String>, capacity: u32) -> Self {
        Self::new(code, RoomType::Lecture, capacity)
    }

    /// Creates a lab.
    pub fn lab(code: impl Into<String>, capacity: u32) -> Self {
        Self::new(code, RoomType::Lab, capacity)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restricts the room to a batch.
    pub fn with_allowed_batch(mut self, batch: impl Into<String>) -> Self {
        self.allowed_batches.push(batch.into());
        self
    }

    /// Whether the room admits the given batch.
    pub fn admits(&self, batch: &str) -> bool {
        self.allowed_batches.is_empty() || self.allowed_batches.iter().any(|b| b == batch)
    }

    /// Whether the room seats the given headcount.
    #[inline]
    pub fn seats(&self, students: u32) -> bool {
        self.capacity >= students
    }
}
