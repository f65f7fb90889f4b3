//! Content type lookup.

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Suffix table, checked in order. Matching is case-sensitive.
const SUFFIXES: &[(&str, &str)] = &[
    (".htm", "text/html"),
    (".html", "text/html"),
    (".jpg", "image/jpg"),
    (".jpeg", "image/jpg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".css", "text/css"),
];

/// Returns the content type for a file name based on its suffix.
///
/// ```
/// # use fileserve::http::mime::content_type;
/// assert_eq!(content_type("./index.html"), "text/html");
/// assert_eq!(content_type("./photo.JPG"), "application/octet-stream");
/// ```
pub fn content_type(file_name: &str) -> &'static str {
    SUFFIXES
        .iter()
        .find(|(suffix, _)| file_name.ends_with(suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
