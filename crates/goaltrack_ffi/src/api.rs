//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the goal list screen operations to Dart via FRB.
//! - Own the single process-wide goal list session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call runs under the session lock, so mutations and their writes
//!   happen in call order.
//! - Storage open failure degrades to an in-memory session plus a
//!   load-failure notice; the UI keeps working.

use goaltrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DeletePrompt, GoalListManager, GoalListView, KeyValueStore, KvGoalRepository, LoadOutcome,
    MemoryKeyValueStore, NoticeKind, SqliteKeyValueStore, SubmitMode, SubmitOutcome, UserNotice,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const GOALS_DB_FILE_NAME: &str = "goaltrack.sqlite3";
const GOALS_DB_PATH_ENV: &str = "GOALTRACK_DB_PATH";

type BoxedStore = Box<dyn KeyValueStore + Send>;
type SessionManager = GoalListManager<KvGoalRepository<BoxedStore>>;

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

struct Session {
    manager: SessionManager,
    pending_delete: Option<DeletePrompt>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rendered goal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Whether this row is currently loaded into the input for editing.
    pub editing: bool,
}

/// Screen snapshot returned by list-level calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListResponse {
    pub ok: bool,
    pub title: String,
    pub items: Vec<GoalItem>,
    pub input: String,
    /// `add` or `update`; drives the submit button icon.
    pub submit_mode: String,
    /// Notices waiting for `goals_take_notices`.
    pub pending_notices: u32,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl GoalListResponse {
    fn from_view(view: GoalListView, pending_notices: usize, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            title: view.title.to_string(),
            items: view
                .items
                .into_iter()
                .map(|item| GoalItem {
                    id: item.id,
                    text: item.text,
                    completed: item.completed,
                    editing: item.editing,
                })
                .collect(),
            input: view.input,
            submit_mode: submit_mode_label(view.submit_mode).to_string(),
            pending_notices: count_u32(pending_notices),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            title: String::new(),
            items: Vec::new(),
            input: String::new(),
            submit_mode: submit_mode_label(SubmitMode::Add).to_string(),
            pending_notices: 0,
            message: message.into(),
        }
    }
}

/// Result envelope for single-goal commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActionResponse {
    /// Whether the command was applied. Dismissing a pending delete counts
    /// as applied even though the list is unchanged.
    pub ok: bool,
    /// Goal affected by the command.
    pub goal_id: Option<String>,
    /// Notices waiting for `goals_take_notices`, e.g. after a failed save.
    pub pending_notices: u32,
    pub message: String,
}

impl GoalActionResponse {
    fn changed(session: &Session, message: impl Into<String>, goal_id: String) -> Self {
        Self {
            ok: true,
            goal_id: Some(goal_id),
            pending_notices: count_u32(session.manager.pending_notices().len()),
            message: message.into(),
        }
    }

    fn unchanged(session: &Session, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            pending_notices: count_u32(session.manager.pending_notices().len()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            pending_notices: 0,
            message: message.into(),
        }
    }
}

/// Confirmation dialog content for a pending delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePromptResponse {
    pub ok: bool,
    pub goal_id: Option<String>,
    pub title: String,
    pub message: String,
}

/// Blocking alert the UI must show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    /// `load_failed` or `save_failed`.
    pub kind: String,
    pub title: String,
    pub message: String,
}

/// Loads persisted goals, replacing the current session state.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures become notices and an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_load() -> GoalListResponse {
    with_list_response(|session| {
        session.pending_delete = None;
        match session.manager.load() {
            LoadOutcome::Restored(count) => format!("Loaded {count} goal(s)."),
            LoadOutcome::Empty => "No saved goals.".to_string(),
            LoadOutcome::Failed => "Saved goals could not be loaded.".to_string(),
        }
    })
}

/// Returns the current screen snapshot without side effects.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_view() -> GoalListResponse {
    with_list_response(|_| "ok".to_string())
}

/// Replaces the input text (text field change handler).
#[flutter_rust_bridge::frb(sync)]
pub fn goal_set_input(text: String) -> GoalListResponse {
    with_list_response(|session| {
        session.manager.set_input(text);
        "ok".to_string()
    })
}

/// Adds the input as a goal, or applies it to the goal under edit.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_submit() -> GoalActionResponse {
    with_action(|session| match session.manager.submit() {
        SubmitOutcome::Ignored => GoalActionResponse::unchanged(session, "Input is empty."),
        SubmitOutcome::Added(id) => GoalActionResponse::changed(session, "Goal added.", id),
        SubmitOutcome::Updated(id) => GoalActionResponse::changed(session, "Goal updated.", id),
        SubmitOutcome::EditTargetMissing(_) => {
            GoalActionResponse::unchanged(session, "Goal no longer exists.")
        }
    })
}

/// Adds a goal directly from `text`, bypassing the input field.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(text: String) -> GoalActionResponse {
    with_action(|session| match session.manager.add(text) {
        Some(id) => GoalActionResponse::changed(session, "Goal added.", id),
        None => GoalActionResponse::unchanged(session, "Goal text is empty."),
    })
}

/// Replaces the text of goal `goal_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_update(goal_id: String, text: String) -> GoalActionResponse {
    with_action(|session| {
        if session.manager.update(&goal_id, text) {
            GoalActionResponse::changed(session, "Goal updated.", goal_id)
        } else {
            GoalActionResponse::unchanged(session, "Goal not found or text is empty.")
        }
    })
}

/// Flips the completion flag of goal `goal_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_toggle(goal_id: String) -> GoalActionResponse {
    with_action(|session| {
        if session.manager.toggle(&goal_id) {
            GoalActionResponse::changed(session, "Goal toggled.", goal_id)
        } else {
            GoalActionResponse::unchanged(session, "Goal not found.")
        }
    })
}

/// Loads goal `goal_id` into the input and enters editing mode.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_start_edit(goal_id: String) -> GoalListResponse {
    with_list_response(|session| {
        if session.manager.start_edit(&goal_id) {
            "Editing goal.".to_string()
        } else {
            "Goal not found.".to_string()
        }
    })
}

/// Leaves editing mode and clears the input.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_cancel_edit() -> GoalListResponse {
    with_list_response(|session| {
        session.manager.cancel_edit();
        "Edit cancelled.".to_string()
    })
}

/// Opens a delete confirmation for `goal_id`.
///
/// A new request for an existing goal replaces any earlier unanswered one;
/// a request for an unknown goal leaves the pending prompt untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_request_delete(goal_id: String) -> DeletePromptResponse {
    let result = with_session(|session| {
        let Some(prompt) = session.manager.request_delete(&goal_id) else {
            return DeletePromptResponse {
                ok: false,
                goal_id: None,
                title: String::new(),
                message: "Goal not found.".to_string(),
            };
        };
        let response = DeletePromptResponse {
            ok: true,
            goal_id: Some(prompt.goal_id().to_string()),
            title: prompt.title().to_string(),
            message: prompt.message().to_string(),
        };
        session.pending_delete = Some(prompt);
        response
    });
    result.unwrap_or_else(|err| DeletePromptResponse {
        ok: false,
        goal_id: None,
        title: String::new(),
        message: format!("goal_request_delete failed: {err}"),
    })
}

/// Confirms the pending delete for `goal_id`.
///
/// Fails when no prompt for this goal is pending.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_confirm_delete(goal_id: String) -> GoalActionResponse {
    with_action(|session| {
        let prompt = match session.pending_delete.take() {
            Some(prompt) if prompt.goal_id() == goal_id => prompt,
            other => {
                session.pending_delete = other;
                return GoalActionResponse::unchanged(
                    session,
                    "No pending delete confirmation for this goal.",
                );
            }
        };
        if session.manager.confirm_delete(prompt) {
            GoalActionResponse::changed(session, "Goal deleted.", goal_id)
        } else {
            GoalActionResponse::unchanged(session, "Goal not found.")
        }
    })
}

/// Dismisses the pending delete confirmation, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_cancel_delete() -> GoalActionResponse {
    with_action(|session| match session.pending_delete.take() {
        Some(prompt) => {
            GoalActionResponse::changed(session, "Delete cancelled.", prompt.goal_id().to_string())
        }
        None => GoalActionResponse::unchanged(session, "No pending delete confirmation."),
    })
}

/// Drains queued notices, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_take_notices() -> Vec<NoticeItem> {
    with_session(|session| {
        session
            .manager
            .take_notices()
            .into_iter()
            .map(to_notice_item)
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|err| {
        vec![NoticeItem {
            kind: notice_kind_label(NoticeKind::LoadFailed).to_string(),
            title: "Error Loading Goals".to_string(),
            message: err,
        }]
    })
}

fn with_list_response(f: impl FnOnce(&mut Session) -> String) -> GoalListResponse {
    with_session(|session| {
        let message = f(session);
        GoalListResponse::from_view(
            session.manager.view(),
            session.manager.pending_notices().len(),
            message,
        )
    })
    .unwrap_or_else(|err| GoalListResponse::failure(format!("goal session failed: {err}")))
}

fn with_action(f: impl FnOnce(&mut Session) -> GoalActionResponse) -> GoalActionResponse {
    with_session(f)
        .unwrap_or_else(|err| GoalActionResponse::failure(format!("goal session failed: {err}")))
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let lock = SESSION.get_or_init(|| Mutex::new(None));
    let mut guard = lock
        .lock()
        .map_err(|_| "goal session lock poisoned".to_string())?;
    let session = guard.get_or_insert_with(open_session);
    Ok(f(session))
}

fn open_session() -> Session {
    let db_path = resolve_goals_db_path();
    let (store, open_error): (BoxedStore, Option<UserNotice>) =
        match SqliteKeyValueStore::open(&db_path) {
            Ok(store) => (Box::new(store), None),
            Err(err) => {
                warn!(
                    "event=session_open module=ffi status=degraded error_code=store_open_failed error={err}"
                );
                (
                    Box::new(MemoryKeyValueStore::new()),
                    Some(UserNotice::from_error(NoticeKind::LoadFailed, &err)),
                )
            }
        };

    let mut manager = GoalListManager::new(KvGoalRepository::new(store));
    manager.load();
    if let Some(notice) = open_error {
        manager.push_notice(notice);
    }
    Session {
        manager,
        pending_delete: None,
    }
}

fn resolve_goals_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(GOALS_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(GOALS_DB_FILE_NAME)
}

fn to_notice_item(notice: UserNotice) -> NoticeItem {
    NoticeItem {
        kind: notice_kind_label(notice.kind).to_string(),
        title: notice.title,
        message: notice.message,
    }
}

fn notice_kind_label(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::LoadFailed => "load_failed",
        NoticeKind::SaveFailed => "save_failed",
    }
}

fn submit_mode_label(mode: SubmitMode) -> &'static str {
    match mode {
        SubmitMode::Add => "add",
        SubmitMode::Update => "update",
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, goal_add, goal_cancel_delete, goal_cancel_edit, goal_confirm_delete,
        goal_request_delete, goal_start_edit, goal_toggle, goal_update, goals_view, init_logging,
        ping, GOALS_DB_PATH_ENV,
    };
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static SESSION_TEST_LOCK: Mutex<()> = Mutex::new(());
    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Serializes tests that share the process-wide session and points the
    /// session at a per-run database before its first use.
    fn session_guard() -> MutexGuard<'static, ()> {
        let guard = SESSION_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        TEST_DB_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("create temp dir");
            std::env::set_var(GOALS_DB_PATH_ENV, dir.path().join("goals.sqlite3"));
            dir
        });
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn goal_add_rejects_blank_text() {
        let _guard = session_guard();
        let response = goal_add("   ".to_string());
        assert!(!response.ok);
        assert!(response.goal_id.is_none());
    }

    #[test]
    fn goal_add_then_toggle_shows_in_view() {
        let _guard = session_guard();
        let text = unique_token("ffi-add");
        let created = goal_add(text.clone());
        assert!(created.ok, "{}", created.message);
        let goal_id = created.goal_id.expect("add should return goal_id");

        assert!(goal_toggle(goal_id.clone()).ok);
        let view = goals_view();
        let item = view
            .items
            .iter()
            .find(|item| item.id == goal_id)
            .expect("added goal should be listed");
        assert_eq!(item.text, text);
        assert!(item.completed);
    }

    #[test]
    fn goal_update_preserves_id() {
        let _guard = session_guard();
        let goal_id = goal_add(unique_token("ffi-update"))
            .goal_id
            .expect("add should return goal_id");
        let edited = unique_token("ffi-edited");

        let response = goal_update(goal_id.clone(), edited.clone());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.goal_id.as_deref(), Some(goal_id.as_str()));
        assert!(goals_view()
            .items
            .iter()
            .any(|item| item.id == goal_id && item.text == edited));
    }

    #[test]
    fn goal_start_edit_unknown_id_reports_not_found() {
        let _guard = session_guard();
        let view = goal_start_edit(unique_token("missing"));
        assert!(view.ok);
        assert_eq!(view.message, "Goal not found.");
        goal_cancel_edit();
    }

    #[test]
    fn delete_requires_matching_confirmation() {
        let _guard = session_guard();
        let goal_id = goal_add(unique_token("ffi-delete"))
            .goal_id
            .expect("add should return goal_id");

        assert!(!goal_confirm_delete(goal_id.clone()).ok);

        let prompt = goal_request_delete(goal_id.clone());
        assert!(prompt.ok);
        assert_eq!(prompt.title, "Delete Goal");

        let confirmed = goal_confirm_delete(goal_id.clone());
        assert!(confirmed.ok, "{}", confirmed.message);
        assert!(!goals_view().items.iter().any(|item| item.id == goal_id));
    }

    #[test]
    fn request_for_unknown_goal_keeps_pending_prompt() {
        let _guard = session_guard();
        let goal_id = goal_add(unique_token("ffi-keep-prompt"))
            .goal_id
            .expect("add should return goal_id");

        assert!(goal_request_delete(goal_id.clone()).ok);
        let unknown = goal_request_delete(unique_token("missing"));
        assert!(!unknown.ok);
        assert!(unknown.goal_id.is_none());

        let confirmed = goal_confirm_delete(goal_id.clone());
        assert!(confirmed.ok, "{}", confirmed.message);
        assert!(!goals_view().items.iter().any(|item| item.id == goal_id));
    }

    #[test]
    fn cancel_delete_dismisses_prompt_without_removing_goal() {
        let _guard = session_guard();
        let goal_id = goal_add(unique_token("ffi-cancel"))
            .goal_id
            .expect("add should return goal_id");

        assert!(goal_request_delete(goal_id.clone()).ok);
        let cancelled = goal_cancel_delete();
        assert!(cancelled.ok);
        assert_eq!(cancelled.goal_id.as_deref(), Some(goal_id.as_str()));
        assert!(!goal_cancel_delete().ok);

        assert!(!goal_confirm_delete(goal_id.clone()).ok);
        assert!(goals_view().items.iter().any(|item| item.id == goal_id));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
