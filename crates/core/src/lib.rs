//! Core logic for turning editor edit logs into next-edit-prediction data.
//!
//! An edit log recorded by the editor extension holds per-file diff hunks
//! with timestamps. This crate orders those edits on one timeline, renders
//! them as line-numbered diffs and assembles a ChatML-style conversation
//! (system, user, assistant) in which the assistant predicts the last edit.

mod conversation;
mod diff;
mod error;
mod helpers;
mod history;
pub mod output;
pub mod pipeline;

pub use conversation::{
    assistant_content, build_conversations, user_content, Conversation, ConversationMessage, Role,
    EDIT_HISTORY_HEADER, FILE_CONTENT_HEADER,
};
pub use diff::{render_hunk, render_hunks, OpKind, RenderCursor};
pub use error::{DatasetError, Result};
pub use helpers::{
    escape_double_quotes, format_diff_line, render_file_snapshot, split_lines, strip_line_ending,
};
pub use history::{
    group_by_file, load_log_file, order_entries, parse_log, FileHistory, Hunk, LineNumbers, LineOp,
    LogData, LogEntry, OrderedEntry, Timestamp,
};
pub use output::{format_json, format_readable, format_toml, OutputFormat};
pub use pipeline::{
    discover_log_files, process_input, process_log_file, write_output, PipelineConfig,
};

/// System prompt template; `{0}` marks the currently open file.
const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("prompts/next_edit_system.txt");

/// Generate the system prompt for a conversation targeting `file_name`.
pub fn system_prompt(file_name: &str) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{0}", file_name)
}
