//! Serializers for finished conversations: JSON, a readable transcript and
//! a TOML-like markup.

use std::path::Path;

use crate::conversation::{Conversation, Role};
use crate::error::Result;
use crate::helpers::escape_double_quotes;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Readable,
    Toml,
}

impl OutputFormat {
    /// File written when no explicit output path is given.
    pub fn default_file_name(self) -> &'static Path {
        Path::new(match self {
            OutputFormat::Json => "output.json",
            OutputFormat::Readable => "output.txt",
            OutputFormat::Toml => "output.toml",
        })
    }

    /// Human-facing name used in the run summary.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Readable => "可読性の高いテキスト形式",
            OutputFormat::Toml => "TOML",
        }
    }

    pub fn render(self, conversations: &[Conversation]) -> Result<String> {
        match self {
            OutputFormat::Json => format_json(conversations),
            OutputFormat::Readable => Ok(format_readable(conversations)),
            OutputFormat::Toml => Ok(format_toml(conversations)),
        }
    }
}

impl Role {
    /// Label shown in the readable transcript.
    pub fn label(self) -> &'static str {
        match self {
            Role::System => "システム",
            Role::User => "ユーザー",
            Role::Assistant => "アシスタント",
        }
    }

    /// Name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Pretty-printed JSON array of `{"messages": [...]}` records.
pub fn format_json(conversations: &[Conversation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(conversations)?)
}

/// Transcript meant for eyeballing generated examples.
pub fn format_readable(conversations: &[Conversation]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (i, conversation) in conversations.iter().enumerate() {
        lines.push(format!("=== 会話 {} ===\n", i + 1));
        for message in &conversation.messages {
            let label = format!("[{}]", message.role.label());
            if message.role == Role::System {
                lines.push(label);
            } else {
                lines.push(format!("\n{}", label));
            }
            lines.push(message.content.clone());
        }
        lines.push(format!("\n{}\n", "=".repeat(50)));
    }

    lines.join("\n")
}

/// TOML-like document with one `[[conversations]]` table per conversation.
///
/// Multi-line content is written verbatim inside `"""` delimiters; only
/// single-line content gets its double quotes escaped.
pub fn format_toml(conversations: &[Conversation]) -> String {
    let mut out = String::new();

    for (i, conversation) in conversations.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str("[[conversations]]\n\n");

        for message in &conversation.messages {
            out.push_str("[[conversations.messages]]\n");
            out.push_str(&format!("role = \"{}\"\n", message.role.as_str()));
            if message.content.contains('\n') {
                out.push_str("content = \"\"\"\n");
                out.push_str(&message.content);
                out.push_str("\"\"\"\n");
            } else {
                out.push_str(&format!("content = \"{}\"\n", escape_double_quotes(&message.content)));
            }
            out.push('\n');
        }
    }

    out
}
