//! Rendering of recorded diff hunks into line-numbered diff text.
//!
//! Each emitted line is `<marker><line:4>: <text>` where the marker is `-`
//! (deleted, old-file numbering), `+` (inserted, new-file numbering) or a
//! space (context, old-file numbering). No `@@` headers are written; the
//! absolute line numbers alone anchor the change. A switch between a delete
//! run and an insert run is separated by one blank line.

use crate::helpers::{format_diff_line, strip_line_ending};
use crate::history::{Hunk, LineNumbers, LineOp};

/// Kind of the last operation that produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Delete,
    Insert,
    Context,
}

/// Running state while walking the lines of one hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCursor {
    pub old_line: i64,
    pub new_line: i64,
    pub prev: Option<OpKind>,
}

impl RenderCursor {
    /// Cursor positioned at the first line of `hunk`, translated to absolute
    /// file positions when `line_numbers` is given.
    pub fn start(hunk: &Hunk, line_numbers: Option<&LineNumbers>) -> Self {
        let (old_line, new_line) = match line_numbers {
            Some(ln) => (ln.translate(hunk.old_start), ln.translate(hunk.new_start)),
            None => (hunk.old_start, hunk.new_start),
        };
        Self {
            old_line,
            new_line,
            prev: None,
        }
    }

    /// Render one operation, returning its text (if any) and the next cursor.
    ///
    /// Unknown operations emit nothing and leave the cursor untouched.
    pub fn step(self, op: &LineOp) -> (Option<String>, Self) {
        match op {
            LineOp::Delete { text } => {
                let mut out = String::new();
                if self.prev == Some(OpKind::Insert) {
                    out.push('\n');
                }
                out.push_str(&format_diff_line('-', self.old_line, strip_line_ending(text)));
                let next = Self {
                    old_line: self.old_line + 1,
                    prev: Some(OpKind::Delete),
                    ..self
                };
                (Some(out), next)
            }
            LineOp::Insert { text } => {
                let mut out = String::new();
                if self.prev == Some(OpKind::Delete) {
                    out.push('\n');
                }
                out.push_str(&format_diff_line('+', self.new_line, strip_line_ending(text)));
                let next = Self {
                    new_line: self.new_line + 1,
                    prev: Some(OpKind::Insert),
                    ..self
                };
                (Some(out), next)
            }
            LineOp::Context { text } => {
                let out = format_diff_line(' ', self.old_line, strip_line_ending(text));
                let next = Self {
                    old_line: self.old_line + 1,
                    new_line: self.new_line + 1,
                    prev: Some(OpKind::Context),
                };
                (Some(out), next)
            }
            LineOp::Other => (None, self),
        }
    }
}

/// Render a single hunk, returning the text and the cursor after its last line.
pub fn render_hunk(hunk: &Hunk, line_numbers: Option<&LineNumbers>) -> (String, RenderCursor) {
    hunk.lines.iter().fold(
        (String::new(), RenderCursor::start(hunk, line_numbers)),
        |(mut out, cursor), op| {
            let (emitted, next) = cursor.step(op);
            if let Some(text) = emitted {
                out.push_str(&text);
            }
            (out, next)
        },
    )
}

/// Render hunks in the given order and concatenate the result.
///
/// Every hunk starts from its own declared position; nothing carries over
/// between hunks.
pub fn render_hunks(hunks: &[Hunk], line_numbers: Option<&LineNumbers>) -> String {
    hunks
        .iter()
        .map(|hunk| render_hunk(hunk, line_numbers).0)
        .collect()
}
