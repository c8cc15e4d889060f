//! Goal list use-case service.
//!
//! # Responsibility
//! - Own the in-memory goal list, the input text and the editing state.
//! - Persist the complete list after every mutation.
//! - Turn persistence failures into user notices instead of errors.
//!
//! # Invariants
//! - In-memory state is the source of truth for the session; a failed write
//!   never rolls a mutation back and is never retried.
//! - Goal ids stay unique; new ids are checked against the current list.
//! - Mutations keep list order: edits and toggles replace in place,
//!   additions append.
//! - Unknown ids and blank text are no-ops and trigger no write.

use crate::model::goal::{generate_unique_goal_id, is_blank, Goal, GoalId};
use crate::repo::goal_repo::GoalRepository;
use crate::service::notice::{DeletePrompt, NoticeKind, UserNotice};
use log::{info, warn};

/// Title rendered above the goal list.
pub const GOAL_LIST_TITLE: &str = "List of Goals";

/// Result of [`GoalListManager::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A persisted list was found and restored.
    Restored(usize),
    /// Nothing was persisted yet.
    Empty,
    /// Reading or decoding failed; a notice was queued and the list is empty.
    Failed,
}

/// What pressing the submit button does in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Add,
    Update,
}

/// Result of [`GoalListManager::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing changed.
    Ignored,
    Added(GoalId),
    Updated(GoalId),
    /// The goal under edit no longer exists; editing mode was left anyway.
    EditTargetMissing(GoalId),
}

/// Read-only projection of one goal for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItemView {
    pub id: GoalId,
    pub text: String,
    pub completed: bool,
    pub editing: bool,
}

/// Read-only projection of the whole screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListView {
    pub title: &'static str,
    pub items: Vec<GoalItemView>,
    pub input: String,
    pub submit_mode: SubmitMode,
}

/// Goal list state plus the repository it persists into.
pub struct GoalListManager<R: GoalRepository> {
    repo: R,
    goals: Vec<Goal>,
    input: String,
    editing: Option<GoalId>,
    notices: Vec<UserNotice>,
}

impl<R: GoalRepository> GoalListManager<R> {
    /// Creates a manager with an empty list. Call [`Self::load`] at startup.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            goals: Vec::new(),
            input: String::new(),
            editing: None,
            notices: Vec::new(),
        }
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// Absent data yields an empty list. Unreadable data yields an empty list
    /// plus a load-failure notice. Editing mode and input are reset.
    pub fn load(&mut self) -> LoadOutcome {
        self.editing = None;
        self.input.clear();
        match self.repo.load_goals() {
            Ok(Some(goals)) => {
                let count = goals.len();
                self.goals = goals;
                info!("event=goals_load module=goal_list status=ok goal_count={count}");
                LoadOutcome::Restored(count)
            }
            Ok(None) => {
                self.goals.clear();
                info!("event=goals_load module=goal_list status=ok goal_count=0 source=empty");
                LoadOutcome::Empty
            }
            Err(err) => {
                self.goals.clear();
                warn!("event=goals_load module=goal_list status=error error={err}");
                self.notices
                    .push(UserNotice::from_error(NoticeKind::LoadFailed, &err));
                LoadOutcome::Failed
            }
        }
    }

    /// Appends a new incomplete goal and persists.
    ///
    /// Returns `None` without changes when `text` is blank.
    pub fn add(&mut self, text: impl Into<String>) -> Option<GoalId> {
        let text = text.into();
        if is_blank(&text) {
            return None;
        }

        let id = generate_unique_goal_id(&self.goals);
        self.goals.push(Goal::with_id(id.clone(), text));
        info!(
            "event=goal_add module=goal_list status=ok goal_count={}",
            self.goals.len()
        );
        self.persist();
        Some(id)
    }

    /// Replaces the text of goal `id` and persists.
    ///
    /// Returns `false` without changes when `id` is unknown or `text` is blank.
    pub fn update(&mut self, id: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        if is_blank(&text) {
            return false;
        }
        let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == id) else {
            return false;
        };

        goal.text = text;
        info!("event=goal_update module=goal_list status=ok");
        self.persist();
        true
    }

    /// Flips the completion flag of goal `id` and persists.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(goal) = self.goals.iter_mut().find(|goal| goal.id == id) else {
            return false;
        };

        goal.completed = !goal.completed;
        info!(
            "event=goal_toggle module=goal_list status=ok completed={}",
            goal.completed
        );
        self.persist();
        true
    }

    /// Asks for confirmation before deleting goal `id`.
    ///
    /// Returns `None` for unknown ids.
    pub fn request_delete(&self, id: &str) -> Option<DeletePrompt> {
        self.find(id).map(|goal| DeletePrompt::new(goal.id.clone()))
    }

    /// Deletes the goal named by a confirmed prompt and persists.
    ///
    /// Returns `false` when the goal disappeared after the prompt was issued.
    pub fn confirm_delete(&mut self, prompt: DeletePrompt) -> bool {
        let id = prompt.into_goal_id();
        let Some(position) = self.goals.iter().position(|goal| goal.id == id) else {
            return false;
        };

        self.goals.remove(position);
        if self.editing.as_deref() == Some(id.as_str()) {
            self.editing = None;
            self.input.clear();
        }
        info!(
            "event=goal_delete module=goal_list status=ok goal_count={}",
            self.goals.len()
        );
        self.persist();
        true
    }

    /// Writes the complete current list.
    ///
    /// On failure queues a save-failure notice and keeps in-memory state.
    pub fn persist(&mut self) -> bool {
        match self.repo.save_goals(&self.goals) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=goals_save module=goal_list status=error goal_count={} error={err}",
                    self.goals.len()
                );
                self.notices
                    .push(UserNotice::from_error(NoticeKind::SaveFailed, &err));
                false
            }
        }
    }

    /// Replaces the current input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Enters editing mode for goal `id`, copying its text into the input.
    pub fn start_edit(&mut self, id: &str) -> bool {
        let Some((goal_id, text)) = self.find(id).map(|goal| (goal.id.clone(), goal.text.clone()))
        else {
            return false;
        };

        self.input = text;
        self.editing = Some(goal_id);
        true
    }

    /// Leaves editing mode and clears the input.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.input.clear();
    }

    /// Adds the input as a new goal, or applies it to the goal under edit.
    ///
    /// Blank input changes nothing. Otherwise the input is cleared and
    /// editing mode is left.
    pub fn submit(&mut self) -> SubmitOutcome {
        if is_blank(&self.input) {
            return SubmitOutcome::Ignored;
        }

        let text = std::mem::take(&mut self.input);
        match self.editing.take() {
            Some(id) => {
                if self.update(&id, text) {
                    SubmitOutcome::Updated(id)
                } else {
                    SubmitOutcome::EditTargetMissing(id)
                }
            }
            None => match self.add(text) {
                Some(id) => SubmitOutcome::Added(id),
                None => SubmitOutcome::Ignored,
            },
        }
    }

    /// Queues a notice raised outside the manager, such as a storage open
    /// failure detected by the host.
    pub fn push_notice(&mut self, notice: UserNotice) {
        self.notices.push(notice);
    }

    /// Drains notices queued since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<UserNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn pending_notices(&self) -> &[UserNotice] {
        &self.notices
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn find(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn editing_goal_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn submit_mode(&self) -> SubmitMode {
        if self.editing.is_some() {
            SubmitMode::Update
        } else {
            SubmitMode::Add
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Builds the rendering snapshot.
    pub fn view(&self) -> GoalListView {
        let editing = self.editing.as_deref();
        GoalListView {
            title: GOAL_LIST_TITLE,
            items: self
                .goals
                .iter()
                .map(|goal| GoalItemView {
                    id: goal.id.clone(),
                    text: goal.text.clone(),
                    completed: goal.completed,
                    editing: editing == Some(goal.id.as_str()),
                })
                .collect(),
            input: self.input.clone(),
            submit_mode: self.submit_mode(),
        }
    }
}
