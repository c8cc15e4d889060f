//! Goal list repository contracts and key-value implementation.
//!
//! # Responsibility
//! - Load and save the whole goal list as one serialized unit.
//! - Keep the JSON wire shape inside the core persistence boundary.
//!
//! # Invariants
//! - Writes always serialize the complete list; there is no partial update.
//! - Reads reject structurally invalid lists instead of masking them.

use crate::model::goal::{validate_goal_list, Goal, GoalValidationError};
use crate::store::kv::{KeyValueStore, StoreError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized goal list.
pub const DEFAULT_GOALS_KEY: &str = "goals";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for goal list load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    Serialization(serde_json::Error),
    InvalidData(GoalValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "{err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted goal data: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::InvalidData(value)
    }
}

/// Repository interface for whole-list goal persistence.
pub trait GoalRepository {
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load_goals(&self) -> RepoResult<Option<Vec<Goal>>>;
    fn save_goals(&self, goals: &[Goal]) -> RepoResult<()>;
}

/// Goal repository storing a JSON array under one key-value entry.
pub struct KvGoalRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvGoalRepository<S> {
    /// Creates a repository using [`DEFAULT_GOALS_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_GOALS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> GoalRepository for KvGoalRepository<S> {
    fn load_goals(&self) -> RepoResult<Option<Vec<Goal>>> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            debug!("event=goals_read module=repo status=empty key={}", self.key);
            return Ok(None);
        };

        let goals = decode_goals(&raw).inspect_err(|err| {
            error!(
                "event=goals_read module=repo status=error key={} payload_bytes={} error={err}",
                self.key,
                raw.len()
            );
        })?;
        debug!(
            "event=goals_read module=repo status=ok key={} goal_count={}",
            self.key,
            goals.len()
        );
        Ok(Some(goals))
    }

    fn save_goals(&self, goals: &[Goal]) -> RepoResult<()> {
        let payload = encode_goals(goals)?;
        self.store.set_item(&self.key, &payload)?;
        debug!(
            "event=goals_write module=repo status=ok key={} goal_count={} payload_bytes={}",
            self.key,
            goals.len(),
            payload.len()
        );
        Ok(())
    }
}

/// Serializes a goal list into its persisted JSON form.
pub fn encode_goals(goals: &[Goal]) -> RepoResult<String> {
    Ok(serde_json::to_string(goals)?)
}

/// Parses and validates a persisted JSON goal list.
pub fn decode_goals(raw: &str) -> RepoResult<Vec<Goal>> {
    let goals: Vec<Goal> = serde_json::from_str(raw)?;
    validate_goal_list(&goals)?;
    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_goals, encode_goals, GoalRepository, KvGoalRepository, RepoError,
        DEFAULT_GOALS_KEY,
    };
    use crate::model::goal::{Goal, GoalValidationError};
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn custom_key_isolates_lists() {
        let store = MemoryKeyValueStore::new();
        let default_repo = KvGoalRepository::new(&store);
        let other_repo = KvGoalRepository::with_key(&store, "goals_archive");
        assert_eq!(default_repo.key(), DEFAULT_GOALS_KEY);

        other_repo.save_goals(&[Goal::with_id("a", "old")]).unwrap();
        assert_eq!(default_repo.load_goals().unwrap(), None);
        assert!(store.get_item("goals_archive").unwrap().is_some());
    }

    #[test]
    fn decode_defaults_missing_completed_flag() {
        let goals = decode_goals(r#"[{"id":"a","text":"read"}]"#).unwrap();
        assert_eq!(goals, vec![Goal::with_id("a", "read")]);
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[{"id":"a","text":"x","completed":false},{"id":"a","text":"y","completed":true}]"#;
        match decode_goals(raw).unwrap_err() {
            RepoError::InvalidData(GoalValidationError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_preserves_order_and_field_names() {
        let mut second = Goal::with_id("2", "second");
        second.completed = true;
        let json = encode_goals(&[Goal::with_id("1", "first"), second]).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1","text":"first","completed":false},{"id":"2","text":"second","completed":true}]"#
        );
    }
}
