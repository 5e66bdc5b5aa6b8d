use crate::text::{char_len, char_slice};
use crate::trigger::Occurrence;

/// Characters of surrounding document kept on each side of the matched
/// token when building a resolution request.
pub const WINDOW_RADIUS: usize = 500;

/// The bounded slice of document sent to the gateway: up to `radius`
/// characters before the occurrence, the matched text itself, and up to
/// `radius` characters after it, clipped to the document bounds.
///
/// The window always contains at least the matched token, so the gateway's
/// empty-context rejection can never fire for a request built here.
pub fn context_window(text: &str, occurrence: &Occurrence, radius: usize) -> String {
    let start = occurrence.position.saturating_sub(radius);
    let end = std::cmp::min(occurrence.end() + radius, char_len(text));

    char_slice(text, start, end).to_string()
}
