// Test-only session harness for end-to-end pipeline tests.
//
// Wraps a real `Performance` (from `lyrebird_engine`) with captured PCM and
// an attached `SessionRecorder` to provide a convenient API for exercising
// the full path: feed → tokenize → map → queue → synthesize → score.
//
// The only test-specific code here is the capture plumbing (an `Rc`-shared
// PCM vector and recorder). Everything else uses the same code paths as a
// real session.
//
// See also: `tests/full_pipeline.rs` for the scenarios.

use std::cell::RefCell;
use std::rc::Rc;

use lyrebird_engine::config::EngineConfig;
use lyrebird_engine::performance::{Modifiers, Performance, Snapshot};
use lyrebird_engine::recording::SessionRecorder;

/// Reference tick length: the ~30 Hz external clock.
pub const TICK_MS: u64 = 33;

/// A test session wrapping a real `Performance` with capture hooks.
pub struct TestSession {
    pub perf: Performance,
    pcm: Rc<RefCell<Vec<i16>>>,
    recorder: Rc<RefCell<SessionRecorder>>,
}

impl TestSession {
    /// Build a session from a config, wiring the PCM sink and recorder.
    pub fn new(config: EngineConfig) -> Self {
        let mut perf = Performance::new(config).expect("TestSession config should be valid");

        let pcm: Rc<RefCell<Vec<i16>>> = Rc::new(RefCell::new(Vec::new()));
        let pcm_handle = Rc::clone(&pcm);
        perf.set_sink(Box::new(move |buffer| {
            pcm_handle.borrow_mut().extend_from_slice(buffer);
        }));

        let recorder = Rc::new(RefCell::new(SessionRecorder::new()));
        perf.attach_recorder(Box::new(Rc::clone(&recorder)));

        TestSession {
            perf,
            pcm,
            recorder,
        }
    }

    /// Feed a full line, inferring shift from case.
    pub fn type_line(&mut self, text: &str) {
        for character in text.chars() {
            self.perf.feed(
                character,
                Modifiers {
                    shift: character.is_uppercase(),
                    ..Modifiers::default()
                },
            );
        }
    }

    /// Tick a fixed number of times, collecting snapshots.
    pub fn run_ticks(&mut self, n: usize) -> Vec<Snapshot> {
        (0..n).map(|_| self.perf.tick(TICK_MS)).collect()
    }

    /// Tick until both queues are empty, collecting snapshots.
    pub fn drain(&mut self) -> Vec<Snapshot> {
        let mut snapshots = Vec::new();
        while self.perf.input_len() > 0 || self.perf.output_len() > 0 {
            snapshots.push(self.perf.tick(TICK_MS));
        }
        snapshots
    }

    /// All PCM rendered so far.
    pub fn pcm(&self) -> Vec<i16> {
        self.pcm.borrow().clone()
    }

    /// A copy of the session recording so far.
    pub fn recording(&self) -> SessionRecorder {
        self.recorder.borrow().clone()
    }
}
