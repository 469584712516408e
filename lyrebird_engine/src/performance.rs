// The performance orchestrator — one pipeline cycle per external tick.
//
// `Performance` owns the whole pipeline for one session: input queue,
// tokenizer, mapper backend, output queue, synthesizer backend, and score
// tracker. `feed()` pushes keystrokes in; `tick()` advances everything one
// synchronous pass and returns a snapshot. Between ticks all state is
// quiescent — there is no internal thread, no blocking call, and no partial
// work carried across ticks. Cancellation is "stop calling tick".
//
// Each tick runs the stages in fixed order:
//   1. consume a bounded chunk from the input queue
//   2. tokenize it
//   3. map tokens to phoneme events (batch offset = session clock)
//   4. push events to the output queue
//   5. pop at most one event and synthesize it, handing PCM to the sink
//   6. observe queue state + token accuracy into the tracker, snapshot
//
// Sessions are isolated by ownership: one `Performance` per concurrent
// session, sharing nothing. The session clock is the sum of `elapsed_ms`
// arguments — the engine never reads a wall clock, so two sessions fed the
// same inputs produce identical output streams.
//
// Recoverable conditions (overflow, unmappable words, unavailable backends)
// are absorbed into counters and fallbacks; no tick ever fails.

use crate::config::{ConfigError, EngineConfig};
use crate::input::InputQueue;
use crate::output::{OutputQueue, Zone};
use crate::recording::Recorder;
use crate::scoring::{Grade, ScoreTracker};
use lyrebird_text::{Keystroke, Token, tokenize};
use lyrebird_voice::{
    LexiconMapper, MapperBackend, OscillatorSynth, PhonemeEvent, SynthBackend, VoiceProfile,
    default_lexicon,
};
use serde::{Deserialize, Serialize};

/// Modifier key state accompanying a fed character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Composite pipeline state returned by every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Input queue fill ratio in [0, 1].
    pub input_level: f32,
    /// Output queue fill ratio in [0, 1].
    pub output_level: f32,
    /// Output queue zone after this tick's work.
    pub output_zone: Zone,
    /// The event synthesized this tick, if any.
    pub last_phoneme: Option<PhonemeEvent>,
    /// Current score, clamped at zero.
    pub score: i64,
    /// Letter grade for the current score.
    pub grade: Grade,
}

/// PCM sink callback: receives each rendered buffer.
pub type PcmSink = Box<dyn FnMut(&[i16])>;

/// One performance session's pipeline.
pub struct Performance {
    config: EngineConfig,
    clock_ms: u64,
    input: InputQueue,
    output: OutputQueue,
    mapper: Box<dyn MapperBackend>,
    synth: Box<dyn SynthBackend>,
    tracker: ScoreTracker,
    expected: Vec<Token>,
    expected_idx: usize,
    last_phoneme: Option<PhonemeEvent>,
    sink: Option<PcmSink>,
    recorder: Option<Box<dyn Recorder>>,
    backend_faults: u64,
}

impl Performance {
    /// Build a session with the default voice and the always-available
    /// backends. Fails only on misconfiguration, before any tick runs.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_voice(config, VoiceProfile::default())
    }

    /// Build a session with a specific voice profile.
    pub fn with_voice(config: EngineConfig, profile: VoiceProfile) -> Result<Self, ConfigError> {
        config.validate()?;
        let mapper = LexiconMapper::new(default_lexicon(), profile.clone(), config.base_duration_ms);
        let synth = OscillatorSynth::with_profile(config.sample_rate, &profile, config.noise_seed);
        Self::assemble(config, Box::new(mapper), Box::new(synth))
    }

    /// Build a session with injected backends (tests, substitutes for the
    /// placeholder variants).
    pub fn with_backends(
        config: EngineConfig,
        mapper: Box<dyn MapperBackend>,
        synth: Box<dyn SynthBackend>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::assemble(config, mapper, synth)
    }

    fn assemble(
        config: EngineConfig,
        mapper: Box<dyn MapperBackend>,
        synth: Box<dyn SynthBackend>,
    ) -> Result<Self, ConfigError> {
        let difficulty = &config.difficulty;
        let input = InputQueue::new(difficulty.input_capacity);
        let output = OutputQueue::new(
            difficulty.output_capacity,
            difficulty.zone_low,
            difficulty.zone_high,
            config.rate_window_ms,
        );
        let tracker = ScoreTracker::new(
            difficulty.tick_rates,
            difficulty.token_bonus_multiplier,
            difficulty.grade_scale.clone(),
        );
        Ok(Performance {
            config,
            clock_ms: 0,
            input,
            output,
            mapper,
            synth,
            tracker,
            expected: Vec::new(),
            expected_idx: 0,
            last_phoneme: None,
            sink: None,
            recorder: None,
            backend_faults: 0,
        })
    }

    /// Enqueue one keystroke. Never fails; past capacity the oldest
    /// keystroke is dropped and the overflow counter increments.
    pub fn feed(&mut self, character: char, modifiers: Modifiers) {
        let keystroke = Keystroke {
            character,
            shift: modifiers.shift,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            timestamp_ms: self.clock_ms,
        };
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_keystroke(&keystroke, self.clock_ms);
        }
        self.input.push(keystroke);
    }

    /// Convenience: feed an entire string, inferring shift from case.
    pub fn feed_text(&mut self, text: &str) {
        for character in text.chars() {
            self.feed(
                character,
                Modifiers {
                    shift: character.is_uppercase(),
                    ..Modifiers::default()
                },
            );
        }
    }

    /// Supply the expected token sequence for accuracy scoring. Absent
    /// entirely for free typing. Resets the comparison cursor.
    pub fn load_expected(&mut self, tokens: Vec<Token>) {
        self.expected = tokens;
        self.expected_idx = 0;
    }

    /// Attach the PCM sink that receives each rendered buffer.
    pub fn set_sink(&mut self, sink: PcmSink) {
        self.sink = Some(sink);
    }

    /// Attach a recording observer. Replaces any previous one.
    pub fn attach_recorder(&mut self, recorder: Box<dyn Recorder>) {
        self.recorder = Some(recorder);
    }

    /// Detach and return the current recorder, if any.
    pub fn detach_recorder(&mut self) -> Option<Box<dyn Recorder>> {
        self.recorder.take()
    }

    /// Advance the pipeline one cycle. A single synchronous pass; never
    /// fails — the snapshot reflects best-effort processing of whatever
    /// was typed.
    pub fn tick(&mut self, elapsed_ms: u64) -> Snapshot {
        self.clock_ms += elapsed_ms;
        let now = self.clock_ms;

        // 1-2. Consume a bounded chunk and tokenize it.
        let chunk = self.input.consume(self.config.chunk_size);
        let tokens = tokenize(&chunk);

        if !tokens.is_empty() {
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.on_tokens(&tokens, now);
            }
            // Accuracy comparison against the loaded song, in order.
            for token in &tokens {
                if self.expected_idx < self.expected.len() {
                    self.tracker.on_token(token, &self.expected[self.expected_idx]);
                    self.expected_idx += 1;
                }
            }
        }

        // 3. Map tokens to phoneme events at the session clock offset.
        let events = if tokens.is_empty() {
            Vec::new()
        } else {
            match self.mapper.map(&tokens, now) {
                Ok(events) => events,
                Err(_) => {
                    // An unavailable backend absorbs into a counter; the
                    // tick carries on with no new events.
                    self.backend_faults += 1;
                    Vec::new()
                }
            }
        };

        // 4. Push to the output queue.
        if !events.is_empty() {
            if let Some(recorder) = self.recorder.as_mut() {
                recorder.on_events(&events, now);
            }
            self.output.push_batch(events, now);
        }

        // 5. Pop at most one event and synthesize it.
        self.last_phoneme = self.output.pop(now);
        if let Some(event) = self.last_phoneme.clone() {
            match self.synth.render(&event) {
                Ok(buffer) => {
                    if let Some(sink) = self.sink.as_mut() {
                        sink(&buffer);
                    }
                }
                Err(_) => self.backend_faults += 1,
            }
        }

        // 6. Observe and snapshot.
        let state = self.output.state(now);
        self.tracker.on_tick(&state);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_queue_state(&state, now);
        }

        Snapshot {
            input_level: self.input.level(),
            output_level: state.level,
            output_zone: state.zone,
            last_phoneme: self.last_phoneme.clone(),
            score: self.tracker.score(),
            grade: self.tracker.grade(),
        }
    }

    /// Session time in milliseconds: the sum of all `elapsed_ms` so far.
    pub fn session_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn score(&self) -> i64 {
        self.tracker.score()
    }

    pub fn grade(&self) -> Grade {
        self.tracker.grade()
    }

    /// Full-match token accuracy so far.
    pub fn accuracy(&self) -> f32 {
        self.tracker.accuracy()
    }

    /// Keystrokes lost to input overflow.
    pub fn input_overflow(&self) -> u64 {
        self.input.overflow_count()
    }

    /// Events lost to output overflow.
    pub fn output_overflow(&self) -> u64 {
        self.output.overflow_count()
    }

    /// Backend calls that reported themselves unavailable.
    pub fn backend_faults(&self) -> u64 {
        self.backend_faults
    }

    /// Pending keystrokes not yet consumed.
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Events queued for synthesis.
    pub fn output_len(&self) -> usize {
        self.output.len()
    }
}
