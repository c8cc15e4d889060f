//! Domain model for goal tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every goal is identified by a stable, list-unique `GoalId`.

pub mod goal;
