//! Weekly timetable scheduling engine.
//!
//! Assigns course sessions (lectures, tutorials, practicals) to time slots,
//! classrooms, and professors for multiple student batches over a week,
//! producing a conflict-free timetable or a best-effort one with explicit
//! diagnostics. Input parsing and output rendering live outside this crate;
//! the engine works on typed domain objects and returns a typed solution.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `Session`, `Classroom`,
//!   `Professor`, `Batch`, `SlotGrid`, `Timetable`
//! - **`validation`**: Input integrity checks (duplicate codes, dangling
//!   references, qualification)
//! - **`constraints`**: Hard-constraint predicates, the incremental
//!   conflict index, and the placement auditor
//! - **`solver`**: Most-constrained-first backtracking search with
//!   relaxation and seeded restart trials
//! - **`report`**: Export rows and quality summary
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated
//!   Timetabling"
//! - Russell & Norvig (2021), "AIMA", Ch. 6: Constraint Satisfaction

pub mod constraints;
pub mod models;
pub mod report;
pub mod solver;
pub mod validation;
