//! Rendering config values back to source text.
//!
//! Output style: two-space indentation, single-quoted strings, unquoted keys
//! where legal, one member per line with trailing commas, and short arrays
//! of scalars on a single line. Verbatim text is emitted exactly as captured,
//! so rendering the re-extracted output gives the same text again.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::ExtractedConfig;
use crate::value::{ConfigValue, Entry, Object};

/// Longest inline array before it is split over several lines.
const INLINE_ARRAY_WIDTH: usize = 72;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid identifier regex")
});

static INDEX_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0|[1-9][0-9]*)$").expect("Invalid index key regex"));

/// Indentation and line ending used while rendering.
#[derive(Debug, Clone, Copy)]
struct Layout<'s> {
    base: &'s str,
    newline: &'s str,
}

impl Layout<'_> {
    fn pad(&self, depth: usize) -> String {
        format!("{}{}", self.base, "  ".repeat(depth))
    }
}

/// Render an object literal whose first line starts at column `base_indent`.
pub fn render_object(object: &Object, base_indent: &str) -> String {
    render_object_with(object, base_indent, "\n")
}

/// Render an object literal with an explicit line ending.
pub fn render_object_with(object: &Object, base_indent: &str, newline: &str) -> String {
    let layout = Layout {
        base: base_indent,
        newline,
    };
    let mut out = String::new();
    write_object(&mut out, object, layout, 0);
    out
}

/// Replace the extracted object in `source` with `object`.
///
/// Everything outside the object literal (imports, comments, the export
/// statement, type annotations) is kept byte-for-byte. The rendered object
/// follows the file's line endings.
pub fn splice_config(source: &str, extracted: &ExtractedConfig, object: &Object) -> String {
    let span = &extracted.span;
    let base_indent = line_indent(source, span.start);
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(source.len() + 256);
    out.push_str(&source[..span.start]);
    out.push_str(&render_object_with(object, base_indent, newline));
    out.push_str(&source[span.end..]);
    out
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
    let line = &source[line_start..offset];
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn write_object(out: &mut String, object: &Object, layout: Layout<'_>, depth: usize) {
    if object.is_empty() {
        out.push_str("{}");
        return;
    }

    out.push('{');
    out.push_str(layout.newline);
    let inner = layout.pad(depth + 1);
    for entry in object.entries() {
        out.push_str(&inner);
        match entry {
            Entry::Property { key, value } => {
                out.push_str(&render_key(key));
                out.push_str(": ");
                write_value(out, value, layout, depth + 1);
            }
            Entry::Verbatim(source) => out.push_str(source),
        }
        out.push(',');
        out.push_str(layout.newline);
    }
    out.push_str(&layout.pad(depth));
    out.push('}');
}

fn write_value(out: &mut String, value: &ConfigValue, layout: Layout<'_>, depth: usize) {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConfigValue::Number(raw) => out.push_str(raw),
        ConfigValue::String(s) => out.push_str(&quote_string(s)),
        ConfigValue::Verbatim(source) => out.push_str(source),
        ConfigValue::Object(object) => write_object(out, object, layout, depth),
        ConfigValue::Array(items) => write_array(out, items, layout, depth),
    }
}

fn write_array(out: &mut String, items: &[ConfigValue], layout: Layout<'_>, depth: usize) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }

    if let Some(inline) = inline_array(items) {
        out.push_str(&inline);
        return;
    }

    // Every element, holes included, is followed by a comma, so holes keep
    // their slot.
    out.push('[');
    out.push_str(layout.newline);
    let inner = layout.pad(depth + 1);
    for item in items {
        out.push_str(&inner);
        write_value(out, item, layout, depth + 1);
        out.push(',');
        out.push_str(layout.newline);
    }
    out.push_str(&layout.pad(depth));
    out.push(']');
}

/// An array hole (`[1, , 2]`), captured as empty verbatim text.
fn is_hole(value: &ConfigValue) -> bool {
    matches!(value, ConfigValue::Verbatim(source) if source.is_empty())
}

/// Single-line form of an array of scalars, if it is short enough.
fn inline_array(items: &[ConfigValue]) -> Option<String> {
    let flat = Layout {
        base: "",
        newline: "",
    };

    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let part = match item {
            ConfigValue::Object(_) | ConfigValue::Array(_) => return None,
            ConfigValue::Verbatim(source) if source.contains('\n') => return None,
            scalar => {
                let mut s = String::new();
                write_value(&mut s, scalar, flat, 0);
                s
            }
        };
        parts.push(part);
    }

    // A trailing hole needs its own comma or the array loses a slot.
    let trailing = if items.last().is_some_and(is_hole) { "," } else { "" };
    let inline = format!("[{}{}]", parts.join(", "), trailing);
    (inline.len() <= INLINE_ARRAY_WIDTH).then_some(inline)
}

/// Render an object key, quoting only when required.
pub fn render_key(key: &str) -> String {
    if IDENTIFIER_RE.is_match(key) || INDEX_KEY_RE.is_match(key) {
        key.to_string()
    } else {
        quote_string(key)
    }
}

/// Render a single-quoted string literal.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
