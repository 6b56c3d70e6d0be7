//! Assembly of the ordered edit history into a next-edit-prediction conversation.
//!
//! The chronologically last eligible entry becomes the assistant's answer;
//! everything before it is shown to the model in the user turn, optionally
//! preceded by a snapshot of the file that was open at capture time.

use serde::Serialize;
use tracing::debug;

use crate::diff::render_hunks;
use crate::helpers::render_file_snapshot;
use crate::history::{LogData, OrderedEntry};
use crate::system_prompt;

/// Header placed above the open-file snapshot.
pub const FILE_CONTENT_HEADER: &str = "現在開かれているファイルの内容:\n";

/// Sentence introducing the edit history in the user turn.
pub const EDIT_HISTORY_HEADER: &str = "以下が、直近でユーザーがエディタ上で行った変更です。\n\n";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One training example: system, user and assistant turns in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub messages: Vec<ConversationMessage>,
}

/// Build the user turn from the optional file snapshot and the prior edits.
pub fn user_content(history: &[OrderedEntry<'_>], log: &LogData) -> String {
    let mut content = String::new();

    if let Some(file_content) = &log.file_content {
        content.push_str(FILE_CONTENT_HEADER);
        content.push_str(&render_file_snapshot(file_content));
        content.push_str("\n\n");
    }

    content.push_str(EDIT_HISTORY_HEADER);

    for (i, entry) in history.iter().enumerate() {
        debug!(
            position = i + 1,
            file = entry.file_name,
            timestamp = %entry.timestamp,
            "user edit history entry"
        );
        content.push_str(&format!("<edit file=\"{}\">\n", entry.file_name));
        content.push_str(&render_hunks(entry.hunks, entry.line_numbers));
        content.push_str("\n</edit>\n");
    }

    content
}

/// Build the assistant turn: the target entry's hunks, without wrapping tags.
///
/// Every hunk restarts from its own declared start, translated through the
/// entry's `lineNumbers`.
pub fn assistant_content(target: &OrderedEntry<'_>) -> String {
    debug!(
        file = target.file_name,
        timestamp = %target.timestamp,
        "assistant target entry"
    );
    render_hunks(target.hunks, target.line_numbers)
}

/// Turn the timestamp-ordered entries of one log into conversations.
///
/// Produces exactly one conversation whose target is the last entry, or
/// none when there are no entries.
pub fn build_conversations(entries: &[OrderedEntry<'_>], log: &LogData) -> Vec<Conversation> {
    let Some((target, history)) = entries.split_last() else {
        return Vec::new();
    };

    vec![Conversation {
        messages: vec![
            ConversationMessage::system(system_prompt(target.file_name)),
            ConversationMessage::user(user_content(history, log)),
            ConversationMessage::assistant(assistant_content(target)),
        ],
    }]
}
