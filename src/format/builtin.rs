//! Tree-sitter backed formatter that needs no Go toolchain.

use super::Formatter;
use crate::error::{GenError, Result};
use crate::parser::go;

/// Validates generated text and normalizes its layout.
///
/// Indentation is recomputed from bracket depth using tabs, trailing
/// whitespace is trimmed, runs of blank lines collapse to one, and blank
/// lines at the start or end of a block are dropped. Block comments and raw
/// strings spanning several lines are copied unchanged. Imports are left as
/// rendered.
#[derive(Debug, Clone, Default)]
pub struct BuiltinFormatter;

impl BuiltinFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for BuiltinFormatter {
    fn name(&self) -> &str {
        "builtin"
    }

    fn format(&self, unit: &str, source: &str) -> Result<String> {
        go::check_syntax(source).map_err(|message| GenError::Format {
            name: unit.to_string(),
            message,
        })?;
        Ok(reindent(source))
    }
}

/// Lexer state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Code,
    BlockComment,
    RawString,
}

/// Bracket counts for the code portion of one line.
#[derive(Debug, Default)]
struct LineShape {
    opens: usize,
    closes: usize,
    /// Closing brackets before any other code on the line.
    leading_closes: usize,
}

/// Re-indent Go source by bracket depth.
pub fn reindent(source: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut state = LineState::Code;

    for raw in source.lines() {
        if state != LineState::Code {
            let kept = if state == LineState::RawString {
                raw.to_string()
            } else {
                raw.trim_end().to_string()
            };
            let (shape, next) = scan_line(raw, state);
            depth = (depth + shape.opens).saturating_sub(shape.closes);
            state = next;
            lines.push(kept);
            continue;
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            let after_open = lines.last().map_or(true, |l| l.is_empty() || l.ends_with('{'));
            if !after_open {
                lines.push(String::new());
            }
            continue;
        }

        let (shape, next) = scan_line(trimmed, LineState::Code);
        if trimmed.starts_with('}') && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let mut indent = depth.saturating_sub(shape.leading_closes);
        if trimmed.starts_with("case ") || trimmed.starts_with("default:") {
            indent = indent.saturating_sub(1);
        }
        lines.push(format!("{}{}", "\t".repeat(indent), trimmed));

        depth = (depth + shape.opens).saturating_sub(shape.closes);
        state = next;
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Count brackets in the code portion of `line`, starting in `state`.
fn scan_line(line: &str, mut state: LineState) -> (LineShape, LineState) {
    let mut shape = LineShape::default();
    let mut seen_code = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            LineState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = LineState::Code;
                }
            }
            LineState::RawString => {
                if c == '`' {
                    state = LineState::Code;
                }
            }
            LineState::Code => match c {
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LineState::BlockComment;
                }
                '"' | '\'' => {
                    seen_code = true;
                    skip_quoted(&mut chars, c);
                }
                '`' => {
                    seen_code = true;
                    state = LineState::RawString;
                }
                '{' | '(' | '[' => {
                    seen_code = true;
                    shape.opens += 1;
                }
                '}' | ')' | ']' => {
                    if !seen_code {
                        shape.leading_closes += 1;
                    }
                    shape.closes += 1;
                }
                c if c.is_whitespace() => {}
                _ => seen_code = true,
            },
        }
    }
    (shape, state)
}

fn skip_quoted<I: Iterator<Item = char>>(chars: &mut I, quote: char) {
    let mut escaped = false;
    for c in chars.by_ref() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            break;
        }
    }
}
