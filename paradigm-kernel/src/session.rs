/// Component-lifetime status flags, held in one place with a transition
/// function per event instead of ambient mutable fields.
///
/// `in_flight` is a count rather than a bool so overlapping resolutions
/// keep `is_processing` accurate: it only drops once no resolution remains
/// outstanding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    in_flight: usize,
    is_typing: bool,
    last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any keystroke: typing indicator on, previous error dismissed.
    pub fn keystroke(&mut self) {
        self.is_typing = true;
        self.last_error = None;
    }

    /// The debounced quiet period elapsed with no further keystrokes.
    pub fn quiet_elapsed(&mut self) {
        self.is_typing = false;
    }

    pub fn resolution_started(&mut self) {
        self.in_flight += 1;
        self.last_error = None;
    }

    pub fn resolution_succeeded(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = None;
    }

    pub fn resolution_failed(&mut self, message: impl Into<String>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = Some(message.into());
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_tracks_outstanding_count() {
        let mut state = SessionState::new();
        assert!(!state.is_processing());

        state.resolution_started();
        state.resolution_started();
        assert!(state.is_processing());

        state.resolution_succeeded();
        assert!(state.is_processing());

        state.resolution_failed("quota exceeded");
        assert!(!state.is_processing());
    }

    #[test]
    fn test_keystroke_clears_error_and_sets_typing() {
        let mut state = SessionState::new();
        state.resolution_started();
        state.resolution_failed("Too many requests");
        assert_eq!(state.last_error(), Some("Too many requests"));

        state.keystroke();
        assert!(state.is_typing());
        assert_eq!(state.last_error(), None);

        state.quiet_elapsed();
        assert!(!state.is_typing());
    }

    #[test]
    fn test_success_clears_stale_error() {
        let mut state = SessionState::new();
        state.resolution_started();
        state.resolution_failed("boom");
        state.resolution_started();
        state.resolution_succeeded();
        assert_eq!(state.last_error(), None);
    }
}
