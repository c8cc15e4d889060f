//! Core domain logic for GoalTrack.
//! This crate is the single source of truth for goal list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{validate_goal_list, Goal, GoalId, GoalValidationError};
pub use repo::goal_repo::{
    decode_goals, encode_goals, GoalRepository, KvGoalRepository, RepoError, RepoResult,
    DEFAULT_GOALS_KEY,
};
pub use service::goal_list::{
    GoalItemView, GoalListManager, GoalListView, LoadOutcome, SubmitMode, SubmitOutcome,
    GOAL_LIST_TITLE,
};
pub use service::notice::{DeletePrompt, NoticeKind, UserNotice};
pub use store::kv::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
