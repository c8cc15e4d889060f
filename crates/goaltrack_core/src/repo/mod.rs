//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate serialization and storage details from the goal list manager.
//!
//! # Invariants
//! - Repository reads must validate the goal list before returning it.

pub mod goal_repo;
