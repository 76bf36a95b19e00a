//! File extension to content type mapping.

/// Content type used when no known suffix matches.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".json", "application/json"),
    (".map", "application/json"),
    (".ico", "image/x-icon"),
    (".txt", "text/plain"),
    (".xml", "application/xml"),
    (".svg", "image/svg+xml"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".wasm", "application/wasm"),
    (".gz", "application/gzip"),
    (".tar.gz", "application/x-gtar"),
];

/// Pick a content type for a file name or path.
///
/// Only the last path component is considered. Among the known suffixes it
/// ends with, the longest wins; suffixes are compared byte for byte, so
/// `INDEX.HTML` is `text/plain`. Never fails.
pub fn content_type_for(name: &str) -> &'static str {
    let file_name = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);

    CONTENT_TYPES
        .iter()
        .filter(|(suffix, _)| file_name.ends_with(*suffix))
        .max_by_key(|(suffix, _)| suffix.len())
        .map_or(DEFAULT_CONTENT_TYPE, |(_, content_type)| *content_type)
}
