//! Value-encoding rules shared by the text directives

use std::path::Path;

use anyhow::{Context, Result};

/// Prefix that turns a text directive into an append
pub const APPEND_PREFIX: &str = "+ ";

/// Markdown hard line break (two trailing spaces)
pub const MARKDOWN_LINE_BREAK: &str = "  \n";

/// Token the renderer draws as a horizontal rule
pub const HORIZONTAL_RULE: &str = "****";

/// Translate the inline escapes writers use to get around the one-line protocol
///
/// `\n` (literal backslash-n) becomes a newline, `<br>` a Markdown line break
/// and `<hr>` a horizontal rule.
pub fn translate_escapes(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("<br>", MARKDOWN_LINE_BREAK)
        .replace("<hr>", HORIZONTAL_RULE)
}

/// Append `addition` to `existing` as a new Markdown line
pub fn append_line(existing: &str, addition: &str) -> String {
    format!("{}{}{}", existing, MARKDOWN_LINE_BREAK, addition)
}

/// True when the value names a Markdown file rather than literal text
pub fn is_markdown_path(value: &str) -> bool {
    value.to_lowercase().ends_with(".md")
}

/// Read a Markdown file referenced by a directive
pub fn load_markdown(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read markdown file: {}", path.display()))
}

/// Parse a directive number, rejecting NaN and infinities
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient boolean: anything starting with y, t or a non-zero digit is true
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim_start().chars().next(),
        Some('y' | 'Y' | 't' | 'T' | '1'..='9')
    )
}
