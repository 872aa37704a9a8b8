//! Splits raw command-file content into directive lines

/// Split a read chunk into trimmed, non-empty command lines
///
/// A single read can carry several directives, and writers on other
/// platforms may terminate lines with `\r\n`.
pub fn split_commands(chunk: &str) -> impl Iterator<Item = &str> {
    chunk
        .split(|c: char| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Dispatch key of a line: the first space-delimited token, lower-cased
pub fn dispatch_key(line: &str) -> String {
    line.split(' ').next().unwrap_or_default().to_lowercase()
}

/// Value of a line after its key token and the single separating space
pub fn strip_key(line: &str) -> &str {
    match line.find(' ') {
        Some(idx) => &line[idx + 1..],
        None => "",
    }
}
