use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use paradigm_kernel::splice::{apply_splice, caret_after_splice};
use paradigm_kernel::text::char_len;
use paradigm_kernel::window::context_window;
use paradigm_kernel::{Occurrence, SessionState, newly_complete, scan};

use crate::gateway::{Gateway, GatewayError};

/// Everything a resolution carries back from its suspension point. The
/// occurrence and caret are the snapshot captured when the resolution
/// started; the outcome is the gateway's answer or failure.
#[derive(Debug)]
pub struct Resolution {
    pub id: Uuid,
    pub occurrence: Occurrence,
    pub caret: Option<usize>,
    pub outcome: Result<String, GatewayError>,
}

/// Result of folding a finished resolution back into the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// Whether the answer actually landed in the document.
    pub spliced: bool,
    /// Where the caret belongs afterward, when one was captured and the
    /// splice landed.
    pub caret: Option<usize>,
}

/// Owns the document text and orchestrates trigger resolution.
///
/// The editing surface is a projection of this state: it reports every
/// content mutation through [`on_text_changed`](Self::on_text_changed),
/// spawns the futures returned by [`begin`](Self::begin), and folds each
/// finished [`Resolution`] back in through [`apply`](Self::apply). All
/// methods here are synchronous and run to completion in one event-loop
/// turn; the only suspension point lives inside the future `begin` hands
/// out, at the gateway call.
pub struct TriggerEngine {
    text: String,
    occurrences: Vec<Occurrence>,
    session: SessionState,
    // positions with a resolution currently in flight, keyed by resolution id
    in_flight: Vec<(Uuid, usize)>,
    gateway: Arc<dyn Gateway>,
    window_radius: usize,
}

impl TriggerEngine {
    pub fn new(gateway: Arc<dyn Gateway>, window_radius: usize) -> Self {
        Self {
            text: String::new(),
            occurrences: Vec::new(),
            session: SessionState::new(),
            in_flight: Vec::new(),
            gateway,
            window_radius,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// The editing surface changed: adopt the new text, re-scan from
    /// scratch, and hand back the occurrences that just became complete and
    /// are not already being resolved at that position. The caller decides
    /// how to schedule them.
    pub fn on_text_changed(&mut self, raw: &str) -> Vec<Occurrence> {
        self.session.keystroke();

        let current = scan(raw);
        let fresh: Vec<Occurrence> = newly_complete(&self.occurrences, &current)
            .into_iter()
            .filter(|occ| !self.in_flight.iter().any(|(_, p)| *p == occ.position))
            .collect();

        self.text = raw.to_string();
        self.occurrences = current;
        fresh
    }

    /// Debounced keystroke quiet period elapsed.
    pub fn quiet_elapsed(&mut self) {
        self.session.quiet_elapsed();
    }

    /// First complete occurrence with no resolution in flight, for the
    /// manual-resolution shortcut (covers a trigger that was already
    /// complete before any change event fired).
    pub fn manual_candidate(&self) -> Option<Occurrence> {
        self.occurrences
            .iter()
            .filter(|occ| occ.is_complete())
            .find(|occ| !self.in_flight.iter().any(|(_, p)| *p == occ.position))
            .cloned()
    }

    /// Snapshot phase of a resolution: record the occurrence's position and
    /// the caret as they are right now, extract the bounded context window,
    /// and return the awaitable remainder. The returned future owns its
    /// snapshot, so concurrent resolutions share no mutable state.
    pub fn begin(
        &mut self,
        occurrence: Occurrence,
        caret: Option<usize>,
    ) -> impl Future<Output = Resolution> + Send + 'static {
        let id = Uuid::new_v4();
        self.session.resolution_started();
        self.in_flight.push((id, occurrence.position));

        let window = context_window(&self.text, &occurrence, self.window_radius);
        let pending = self.gateway.complete(window);

        async move {
            let outcome = pending.await;
            Resolution {
                id,
                occurrence,
                caret,
                outcome,
            }
        }
    }

    /// Apply phase: splice the answer in at the recorded offset, or record
    /// the failure. Runs synchronously immediately after the resolution
    /// future completes, so the caret lands in the same event-loop turn as
    /// the text mutation.
    ///
    /// A successful answer still no-ops when the recorded span no longer
    /// holds the matched token (the document changed underneath the
    /// request); the document is left byte-identical in every non-splice
    /// path.
    pub fn apply(&mut self, resolution: Resolution) -> Applied {
        self.in_flight.retain(|(id, _)| *id != resolution.id);

        let answer = match resolution.outcome {
            Ok(answer) => answer,
            Err(err) => {
                self.session.resolution_failed(err.to_string());
                return Applied {
                    spliced: false,
                    caret: None,
                };
            }
        };

        let occurrence = &resolution.occurrence;
        match apply_splice(&self.text, occurrence, &answer) {
            Some(new_text) => {
                let new_len = char_len(&new_text);
                let caret = resolution.caret.map(|c| {
                    caret_after_splice(
                        c,
                        occurrence.position,
                        occurrence.matched_len(),
                        char_len(&answer),
                        new_len,
                    )
                });

                self.text = new_text;
                self.occurrences = scan(&self.text);
                self.session.resolution_succeeded();

                Applied {
                    spliced: true,
                    caret,
                }
            }
            None => {
                self.session.resolution_failed(
                    "document changed before the answer arrived; text left as-is",
                );
                Applied {
                    spliced: false,
                    caret: None,
                }
            }
        }
    }
}
