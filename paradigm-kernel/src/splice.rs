use crate::text::{byte_offset, char_len, char_slice};
use crate::trigger::Occurrence;

/// Replace the occurrence's span with `answer`, keyed to the position
/// recorded at detection time.
///
/// The splice is applied only if the document still contains the recorded
/// matched text at that exact span. Any edit that moved or altered the span
/// while the resolution was in flight makes the recorded offset
/// meaningless, so the splice is rejected (`None`) and the document is left
/// untouched. Rejection rather than best-effort replacement is what keeps
/// concurrent resolutions from corrupting each other's output.
pub fn apply_splice(text: &str, occurrence: &Occurrence, answer: &str) -> Option<String> {
    if char_slice(text, occurrence.position, occurrence.end()) != occurrence.matched {
        return None;
    }

    let from = byte_offset(text, occurrence.position);
    let to = byte_offset(text, occurrence.end());

    let mut out = String::with_capacity(text.len() - (to - from) + answer.len());
    out.push_str(&text[..from]);
    out.push_str(answer);
    out.push_str(&text[to..]);
    Some(out)
}

/// Where the caret lands after a splice.
///
/// A caret at or before the spliced span is untouched; one at or after the
/// span's end shifts by the length delta; one strictly inside the span is
/// placed immediately after the inserted answer. The result is clamped into
/// the new document.
pub fn caret_after_splice(
    caret: usize,
    position: usize,
    matched_len: usize,
    answer_len: usize,
    new_len: usize,
) -> usize {
    let moved = if caret <= position {
        caret
    } else if caret >= position + matched_len {
        // shift, saturating rather than wrapping when the answer is shorter
        (caret + answer_len).saturating_sub(matched_len)
    } else {
        position + answer_len
    };

    std::cmp::min(moved, new_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::scan;

    #[test]
    fn test_splice_replaces_at_recorded_offset() {
        let text = "Sony was founded in @paradigm.";
        let occ = scan(text)[0].clone();
        assert_eq!(
            apply_splice(text, &occ, "1946").as_deref(),
            Some("Sony was founded in 1946.")
        );
    }

    #[test]
    fn test_splice_rejected_when_span_was_edited() {
        let text = "Sony was founded in @paradigm.";
        let occ = scan(text)[0].clone();

        // user deleted a character inside the token while in flight
        let edited = "Sony was founded in @pardigm.";
        assert_eq!(apply_splice(edited, &occ, "1946"), None);
    }

    #[test]
    fn test_splice_rejected_when_text_shifted_before_offset() {
        let text = "in @paradigm.";
        let occ = scan(text)[0].clone();

        let edited = format!("typed more {}", text);
        assert_eq!(apply_splice(&edited, &occ, "1946"), None);
    }

    #[test]
    fn test_splice_tolerates_edits_after_the_span() {
        let text = "in @paradigm.";
        let occ = scan(text)[0].clone();

        let edited = "in @paradigm. trailing notes";
        assert_eq!(
            apply_splice(edited, &occ, "1946").as_deref(),
            Some("in 1946. trailing notes")
        );
    }

    #[test]
    fn test_splice_is_idempotence_guard() {
        let text = "when? @paradigm!";
        let occ = scan(text)[0].clone();

        let once = apply_splice(text, &occ, "1946").unwrap();
        // a duplicate resolution for the same original span finds the token
        // gone and must no-op
        assert_eq!(apply_splice(&once, &occ, "1946"), None);
    }

    #[test]
    fn test_splice_with_multibyte_prefix() {
        let text = "héllo @paradigm!";
        let occ = scan(text)[0].clone();
        assert_eq!(
            apply_splice(text, &occ, "1946").as_deref(),
            Some("héllo 1946!")
        );
    }

    #[test]
    fn test_caret_before_span_is_unchanged() {
        assert_eq!(caret_after_splice(3, 10, 9, 4, 100), 3);
        assert_eq!(caret_after_splice(10, 10, 9, 4, 100), 10);
    }

    #[test]
    fn test_caret_after_span_shifts_by_delta() {
        // answer shorter than token: delta -5
        assert_eq!(caret_after_splice(25, 10, 9, 4, 100), 20);
        // exactly at span end counts as after
        assert_eq!(caret_after_splice(19, 10, 9, 4, 100), 14);
        // answer longer than token
        assert_eq!(caret_after_splice(25, 10, 9, 12, 100), 28);
    }

    #[test]
    fn test_caret_inside_span_lands_after_answer() {
        for caret in 11..19 {
            assert_eq!(caret_after_splice(caret, 10, 9, 4, 100), 14);
        }
    }

    #[test]
    fn test_caret_is_clamped_to_new_document() {
        assert_eq!(caret_after_splice(30, 10, 9, 4, 12), 12);
    }

    #[test]
    fn test_caret_end_to_end_with_splice() {
        let text = "Sony was founded in @paradigm.";
        let occ = scan(text)[0].clone();
        let new_text = apply_splice(text, &occ, "1946").unwrap();
        let new_len = char_len(&new_text);

        // caret was sitting at the very end of the document (after ".")
        let caret = caret_after_splice(30, occ.position, occ.matched_len(), 4, new_len);
        assert_eq!(caret, 25);
        assert_eq!(new_len, 25);
    }
}
