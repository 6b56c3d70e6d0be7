//! Helper functions for text processing and serialization.

/// Width of the right-aligned line number column.
pub const LINE_NUMBER_WIDTH: usize = 4;

/// Remove any trailing `\r` / `\n` characters from recorded line text.
pub fn strip_line_ending(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

/// Format one diff line: marker, padded line number, `: `, text, newline.
///
/// Numbers wider than the column simply widen the field.
pub fn format_diff_line(marker: char, line: i64, text: &str) -> String {
    format!("{}{:>width$}: {}\n", marker, line, text, width = LINE_NUMBER_WIDTH)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines on every line boundary the recorder's files may use.
///
/// Besides `\n` and `\r\n` this breaks on lone `\r`, vertical tab, form
/// feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators. `\r\n` counts as one break, and a trailing break
/// does not produce an empty last line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = content.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&content[start..idx]);
        let mut end = idx + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            end += 1;
        }
        start = end;
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }

    lines
}

/// Render a whole file as context lines numbered from 1.
///
/// Lines are joined with `\n` and there is no trailing newline, so an empty
/// file renders as an empty string.
pub fn render_file_snapshot(content: &str) -> String {
    split_lines(content)
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let mut rendered = format_diff_line(' ', idx as i64 + 1, line);
            rendered.pop();
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape double quotes for a single-line basic string in the markup output.
pub fn escape_double_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}
