// Performance scoring — buffer-zone accrual plus token accuracy bonuses.
//
// The tracker is a read-only observer of the pipeline: each tick it sees the
// output queue's state and accrues points by zone; each typed token it sees
// the expected token (when a song is loaded) and awards component-wise
// accuracy bonuses. All rates and thresholds come from the difficulty
// preset — the tracker hardcodes nothing.
//
// Points can go negative internally under sustained starvation; `score()`
// clamps at zero so the displayed score never does.

use crate::output::{QueueState, Zone};
use lyrebird_text::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Minimum accumulated points for each grade. Anything below `d` is an F.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeScale {
    pub s: i64,
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
}

impl Default for GradeScale {
    fn default() -> Self {
        GradeScale {
            s: 9000,
            a: 7000,
            b: 5000,
            c: 3000,
            d: 1000,
        }
    }
}

impl GradeScale {
    /// Apply the threshold table to a point total.
    pub fn grade(&self, points: i64) -> Grade {
        if points >= self.s {
            Grade::S
        } else if points >= self.a {
            Grade::A
        } else if points >= self.b {
            Grade::B
        } else if points >= self.c {
            Grade::C
        } else if points >= self.d {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// Points per tick for each zone, from the difficulty preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRates {
    pub optimal: i64,
    pub under: i64,
    pub over: i64,
}

/// Per-component token bonuses, scaled by the difficulty multiplier.
const EMPHASIS_BONUS: i64 = 50;
const SUSTAIN_BONUS: i64 = 30;
const HARMONY_BONUS: i64 = 20;

/// Tracks performance quality during a session.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    rates: TickRates,
    bonus_multiplier: f32,
    scale: GradeScale,
    points: i64,
    ticks: u64,
    token_matches: u64,
    token_total: u64,
}

impl ScoreTracker {
    pub fn new(rates: TickRates, bonus_multiplier: f32, scale: GradeScale) -> Self {
        ScoreTracker {
            rates,
            bonus_multiplier,
            scale,
            points: 0,
            ticks: 0,
            token_matches: 0,
            token_total: 0,
        }
    }

    /// Called once per tick with the output queue's state.
    pub fn on_tick(&mut self, state: &QueueState) {
        self.ticks += 1;
        self.points += match state.zone {
            Zone::Optimal => self.rates.optimal,
            Zone::Under => self.rates.under,
            Zone::Over => self.rates.over,
        };
    }

    /// Compare a typed token against the expected song token. Each matching
    /// prosody component earns its share of the bonus; a full match also
    /// counts toward accuracy.
    pub fn on_token(&mut self, actual: &Token, expected: &Token) {
        self.token_total += 1;
        let mut bonus = 0;
        let mut matches = 0;

        if actual.emphasis == expected.emphasis {
            matches += 1;
            bonus += EMPHASIS_BONUS;
        }
        if actual.sustain == expected.sustain {
            matches += 1;
            bonus += SUSTAIN_BONUS;
        }
        if actual.harmony == expected.harmony {
            matches += 1;
            bonus += HARMONY_BONUS;
        }

        if matches == 3 {
            self.token_matches += 1;
        }
        self.points += (bonus as f32 * self.bonus_multiplier).round() as i64;
    }

    /// Current score, clamped at zero.
    pub fn score(&self) -> i64 {
        self.points.max(0)
    }

    /// Letter grade for the current score.
    pub fn grade(&self) -> Grade {
        self.scale.grade(self.score())
    }

    /// Full-match ratio over compared tokens; 1.0 before any comparison.
    pub fn accuracy(&self) -> f32 {
        if self.token_total == 0 {
            return 1.0;
        }
        self.token_matches as f32 / self.token_total as f32
    }

    /// Ticks observed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reset all accumulators to a fresh session.
    pub fn reset(&mut self) {
        self.points = 0;
        self.ticks = 0;
        self.token_matches = 0;
        self.token_total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: TickRates = TickRates {
        optimal: 10,
        under: -5,
        over: -3,
    };

    fn tracker() -> ScoreTracker {
        ScoreTracker::new(RATES, 1.0, GradeScale::default())
    }

    fn state(zone: Zone) -> QueueState {
        QueueState {
            level: 0.5,
            zone,
            fill_rate: 0.0,
            drain_rate: 0.0,
        }
    }

    #[test]
    fn optimal_ticks_accrue_monotonically() {
        let mut t = tracker();
        let mut last = t.score();
        for _ in 0..50 {
            t.on_tick(&state(Zone::Optimal));
            assert!(t.score() >= last, "score must not decrease in optimal zone");
            last = t.score();
        }
        assert_eq!(t.score(), 500);
    }

    #[test]
    fn under_and_over_penalize() {
        let mut t = tracker();
        for _ in 0..10 {
            t.on_tick(&state(Zone::Optimal));
        }
        t.on_tick(&state(Zone::Under));
        assert_eq!(t.score(), 95);
        t.on_tick(&state(Zone::Over));
        assert_eq!(t.score(), 92);
    }

    #[test]
    fn score_clamps_at_zero() {
        let mut t = tracker();
        for _ in 0..20 {
            t.on_tick(&state(Zone::Under));
        }
        assert_eq!(t.score(), 0);
        // Recovery starts from the real (negative) total.
        t.on_tick(&state(Zone::Optimal));
        assert_eq!(t.score(), 0, "one good tick cannot outweigh 20 bad ones");
    }

    #[test]
    fn full_token_match_earns_full_bonus() {
        let mut t = tracker();
        let token = Token::plain("sun");
        t.on_token(&token, &token.clone());
        assert_eq!(t.score(), 100);
        assert_eq!(t.accuracy(), 1.0);
    }

    #[test]
    fn partial_match_earns_partial_bonus() {
        let mut t = tracker();
        let mut actual = Token::plain("sun");
        actual.sustain = true; // expected has no sustain
        let expected = Token::plain("sun");
        t.on_token(&actual, &expected);
        // Emphasis (50) + harmony (20) match; sustain (30) does not.
        assert_eq!(t.score(), 70);
        assert_eq!(t.accuracy(), 0.0, "partial matches don't count as accurate");
    }

    #[test]
    fn bonus_multiplier_scales_token_points() {
        let mut t = ScoreTracker::new(RATES, 2.0, GradeScale::default());
        let token = Token::plain("sun");
        t.on_token(&token, &token.clone());
        assert_eq!(t.score(), 200);
    }

    #[test]
    fn grade_thresholds_apply() {
        let scale = GradeScale::default();
        assert_eq!(scale.grade(9000), Grade::S);
        assert_eq!(scale.grade(8999), Grade::A);
        assert_eq!(scale.grade(5000), Grade::B);
        assert_eq!(scale.grade(3000), Grade::C);
        assert_eq!(scale.grade(1000), Grade::D);
        assert_eq!(scale.grade(999), Grade::F);
        assert_eq!(scale.grade(0), Grade::F);
    }

    #[test]
    fn grade_ordering() {
        assert!(Grade::S < Grade::A, "derive(Ord) sorts best grade first");
        assert!(Grade::A < Grade::F);
    }

    #[test]
    fn reset_clears_accumulators() {
        let mut t = tracker();
        t.on_tick(&state(Zone::Optimal));
        let token = Token::plain("x");
        t.on_token(&token, &token.clone());
        t.reset();
        assert_eq!(t.score(), 0);
        assert_eq!(t.ticks(), 0);
        assert_eq!(t.accuracy(), 1.0);
    }
}
