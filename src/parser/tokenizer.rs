//! Line and whitespace splitting over raw request bytes.

/// Split off the first line of `input`.
///
/// Returns the line without its terminator (`\n` or `\r\n`) and the bytes
/// that follow it, or `None` when `input` holds no `\n` yet.
pub fn split_line(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = input.iter().position(|&b| b == b'\n')?;
    let rest = &input[end + 1..];
    let line = &input[..end];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Some((line, rest))
}

/// Split a line on runs of ASCII whitespace, dropping empty tokens.
pub fn split_tokens(line: &str) -> Vec<&str> {
    line.split_ascii_whitespace().collect()
}

/// Whether `input` already contains a complete first line.
pub fn has_line_terminator(input: &[u8]) -> bool {
    input.contains(&b'\n')
}
