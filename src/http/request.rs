/// A request as far as the server cares about it.
///
/// The method is read off the wire but not kept; every request is treated as
/// a retrieval of `target_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The request target as sent by the client (e.g. "/index.html").
    pub target_path: String,
}

impl ParsedRequest {
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
        }
    }
}
