// Session recording — an optional read-only observer of the pipeline.
//
// When a recorder is attached, the orchestrator hands it a copy of every
// keystroke, token batch, phoneme event batch, and queue state, stamped
// with the tick's session time. The recorder never feeds anything back:
// attaching or detaching one cannot alter pipeline behavior or timing.
//
// `SessionRecorder` is the provided implementation: it accumulates
// everything into serializable logs an external collaborator can export
// (JSON today; whatever the storage layer wants tomorrow).

use crate::output::QueueState;
use lyrebird_text::{Keystroke, Token};
use lyrebird_voice::PhonemeEvent;
use serde::{Deserialize, Serialize};

/// Observer of everything that moves through the pipeline.
pub trait Recorder {
    fn on_keystroke(&mut self, keystroke: &Keystroke, now_ms: u64);
    fn on_tokens(&mut self, tokens: &[Token], now_ms: u64);
    fn on_events(&mut self, events: &[PhonemeEvent], now_ms: u64);
    fn on_queue_state(&mut self, state: &QueueState, now_ms: u64);
}

/// A log entry pairing a session timestamp with a recorded artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub at_ms: u64,
    pub item: T,
}

/// Accumulating recorder for later export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecorder {
    pub keystrokes: Vec<Stamped<Keystroke>>,
    pub tokens: Vec<Stamped<Token>>,
    pub events: Vec<Stamped<PhonemeEvent>>,
    pub queue_states: Vec<Stamped<QueueState>>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the whole session log to JSON for an external exporter.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Recorder for SessionRecorder {
    fn on_keystroke(&mut self, keystroke: &Keystroke, now_ms: u64) {
        self.keystrokes.push(Stamped {
            at_ms: now_ms,
            item: *keystroke,
        });
    }

    fn on_tokens(&mut self, tokens: &[Token], now_ms: u64) {
        self.tokens.extend(tokens.iter().map(|t| Stamped {
            at_ms: now_ms,
            item: t.clone(),
        }));
    }

    fn on_events(&mut self, events: &[PhonemeEvent], now_ms: u64) {
        self.events.extend(events.iter().map(|e| Stamped {
            at_ms: now_ms,
            item: e.clone(),
        }));
    }

    fn on_queue_state(&mut self, state: &QueueState, now_ms: u64) {
        self.queue_states.push(Stamped {
            at_ms: now_ms,
            item: state.clone(),
        });
    }
}

// A shared handle also records: callers that want to inspect the log while
// the pipeline still owns the recorder can attach an `Rc<RefCell<...>>`.
impl<R: Recorder> Recorder for std::rc::Rc<std::cell::RefCell<R>> {
    fn on_keystroke(&mut self, keystroke: &Keystroke, now_ms: u64) {
        self.borrow_mut().on_keystroke(keystroke, now_ms);
    }

    fn on_tokens(&mut self, tokens: &[Token], now_ms: u64) {
        self.borrow_mut().on_tokens(tokens, now_ms);
    }

    fn on_events(&mut self, events: &[PhonemeEvent], now_ms: u64) {
        self.borrow_mut().on_events(events, now_ms);
    }

    fn on_queue_state(&mut self, state: &QueueState, now_ms: u64) {
        self.borrow_mut().on_queue_state(state, now_ms);
    }
}
