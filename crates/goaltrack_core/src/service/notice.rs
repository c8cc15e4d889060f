//! User-facing notices and delete confirmation prompts.
//!
//! # Responsibility
//! - Describe blocking messages the UI must show after persistence failures.
//! - Model delete confirmation as a token only the manager can mint.

use crate::model::goal::GoalId;

pub const LOAD_FAILED_TITLE: &str = "Error Loading Goals";
pub const SAVE_FAILED_TITLE: &str = "Error Saving Goals";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
pub const DELETE_PROMPT_TITLE: &str = "Delete Goal";
pub const DELETE_PROMPT_MESSAGE: &str = "Are you sure you want to delete this goal?";

/// Which persistence step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    LoadFailed,
    SaveFailed,
}

/// Blocking notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl UserNotice {
    /// Builds a notice from an error, substituting [`UNKNOWN_ERROR_MESSAGE`]
    /// when the error renders as empty text.
    pub fn from_error(kind: NoticeKind, err: &dyn std::error::Error) -> Self {
        let rendered = err.to_string();
        let message = if rendered.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            rendered
        };
        let title = match kind {
            NoticeKind::LoadFailed => LOAD_FAILED_TITLE,
            NoticeKind::SaveFailed => SAVE_FAILED_TITLE,
        };
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Confirmation request for deleting one goal.
///
/// Obtained from `GoalListManager::request_delete`; passing it to
/// `GoalListManager::confirm_delete` performs the delete, dropping it cancels.
#[derive(Debug, PartialEq, Eq)]
pub struct DeletePrompt {
    goal_id: GoalId,
}

impl DeletePrompt {
    pub(crate) fn new(goal_id: GoalId) -> Self {
        Self { goal_id }
    }

    pub fn goal_id(&self) -> &str {
        &self.goal_id
    }

    pub fn title(&self) -> &'static str {
        DELETE_PROMPT_TITLE
    }

    pub fn message(&self) -> &'static str {
        DELETE_PROMPT_MESSAGE
    }

    pub(crate) fn into_goal_id(self) -> GoalId {
        self.goal_id
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeKind, UserNotice, SAVE_FAILED_TITLE, UNKNOWN_ERROR_MESSAGE};
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct SilentError;

    impl Display for SilentError {
        fn fmt(&self, _f: &mut Formatter<'_>) -> std::fmt::Result {
            Ok(())
        }
    }

    impl std::error::Error for SilentError {}

    #[test]
    fn empty_error_message_falls_back_to_generic_text() {
        let notice = UserNotice::from_error(NoticeKind::SaveFailed, &SilentError);
        assert_eq!(notice.title, SAVE_FAILED_TITLE);
        assert_eq!(notice.message, UNKNOWN_ERROR_MESSAGE);
    }
}
