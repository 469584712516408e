// lyrebird_engine — the session engine, pure Rust, headless.
//
// This crate contains everything that makes typing into a performance: the
// bounded queues on both ends of the latency model, the difficulty system,
// the score tracker, the optional session recorder, and the tick-driven
// orchestrator that wires the text and voice crates together. No audio
// device, no UI, no network — external collaborators consume the engine
// through `Performance`'s narrow surface (`feed`, `tick`, `load_expected`,
// the PCM sink, the recorder).
//
// Module overview:
// - `queue.rs`:       `BoundedQueue<T>` — ring buffer over a fixed arena,
//                     drop-oldest overflow, shared by both pipeline queues.
// - `input.rs`:       `InputQueue` — buffered keystrokes (push/peek/consume).
// - `output.rs`:      `OutputQueue` — phoneme events with zone classification
//                     and windowed fill/drain rates.
// - `scoring.rs`:     `ScoreTracker`, `Grade`, `GradeScale`, `TickRates`.
// - `difficulty.rs`:  `Difficulty` — data-driven presets (easy..expert).
// - `config.rs`:      `EngineConfig` + fatal construction-time validation.
// - `recording.rs`:   `Recorder` observer trait + `SessionRecorder`.
// - `performance.rs`: `Performance` — the tick orchestrator and session
//                     surface, plus `Snapshot` and `Modifiers`.
//
// **Critical constraint: determinism.** The engine is single-threaded and
// tick-driven; the only time source is the accumulated `elapsed_ms` the
// caller supplies, and the only randomness is the synthesizer's seeded
// breathiness noise. Two sessions fed identical inputs produce identical
// snapshots and PCM, which the integration tests verify byte-for-byte.

pub mod config;
pub mod difficulty;
pub mod input;
pub mod output;
pub mod performance;
pub mod queue;
pub mod recording;
pub mod scoring;

// Re-export key types at crate root for convenience.
pub use config::{ConfigError, EngineConfig};
pub use difficulty::Difficulty;
pub use output::{QueueState, Zone};
pub use performance::{Modifiers, PcmSink, Performance, Snapshot};
pub use recording::{Recorder, SessionRecorder};
pub use scoring::{Grade, GradeScale, ScoreTracker, TickRates};
