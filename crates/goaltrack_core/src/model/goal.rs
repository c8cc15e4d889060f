//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical goal record shared by storage and UI projections.
//! - Provide identity generation and record-level validation.
//!
//! # Invariants
//! - `id` is non-empty and unique within one goal list.
//! - `text` contains at least one non-whitespace character.
//! - Display order is insertion order; edits never move a goal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a goal.
///
/// Kept as an opaque string so identifiers written by earlier app builds
/// load unchanged.
pub type GoalId = String;

/// Validation failures for goal records and goal lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyId,
    BlankText(GoalId),
    DuplicateId(GoalId),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "goal id must not be empty"),
            Self::BlankText(id) => write!(f, "goal `{id}` has blank text"),
            Self::DuplicateId(id) => write!(f, "duplicate goal id `{id}`"),
        }
    }
}

impl Error for GoalValidationError {}

/// One user-entered goal.
///
/// Serialized with exactly the fields `id`, `text`, `completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Goal {
    /// Creates an incomplete goal with a freshly generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(generate_goal_id(), text)
    }

    /// Creates an incomplete goal with a caller-provided id.
    pub fn with_id(id: impl Into<GoalId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.id.trim().is_empty() {
            return Err(GoalValidationError::EmptyId);
        }
        if is_blank(&self.text) {
            return Err(GoalValidationError::BlankText(self.id.clone()));
        }
        Ok(())
    }
}

/// Validates every record plus id uniqueness across the list.
pub fn validate_goal_list(goals: &[Goal]) -> Result<(), GoalValidationError> {
    let mut seen = HashSet::with_capacity(goals.len());
    for goal in goals {
        goal.validate()?;
        if !seen.insert(goal.id.as_str()) {
            return Err(GoalValidationError::DuplicateId(goal.id.clone()));
        }
    }
    Ok(())
}

/// Generates an id that does not collide with any id in `existing`.
pub fn generate_unique_goal_id(existing: &[Goal]) -> GoalId {
    loop {
        let candidate = generate_goal_id();
        if existing.iter().all(|goal| goal.id != candidate) {
            return candidate;
        }
    }
}

/// Returns whether `text` has no visible content.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn generate_goal_id() -> GoalId {
    Uuid::new_v4().to_string()
}
