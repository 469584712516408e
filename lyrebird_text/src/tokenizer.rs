// Sheet Text tokenizer — converts raw buffered keystrokes into prosody tokens.
//
// Sheet Text is the markup notation embedded in what the player types:
// - ALL-CAPS words        -> loud (runs of two or more promote to shout)
// - _underscore_ wrapping -> soft
// - trailing `...`        -> sustain, duration x2
// - [bracket] wrapping    -> harmony (also: any character typed with ctrl)
//
// Parsing is two passes. Pass 1 segments keystrokes into words on whitespace
// and resolves per-word markers locally. Pass 2 promotes maximal runs of two
// or more consecutive loud tokens to shout — shout detection needs lookahead
// across word boundaries that pass 1 cannot see.
//
// Malformed markup is never an error: an unterminated bracket or underscore
// span falls through the marker checks and comes out as plain text.

use crate::types::{Emphasis, Keystroke, Token};

/// Tokenize a batch of keystrokes into Sheet Text tokens.
///
/// Deterministic: the output depends only on the keystroke slice. Whitespace
/// characters separate words and never appear in token text.
pub fn tokenize(keys: &[Keystroke]) -> Vec<Token> {
    let mut tokens = Vec::new();

    for word in split_words(keys) {
        scan_word(&word, &mut tokens);
    }

    promote_shout(&mut tokens);
    tokens
}

/// Pass 1 segmentation: group keystrokes into words on whitespace boundaries.
fn split_words(keys: &[Keystroke]) -> Vec<Vec<Keystroke>> {
    let mut words = Vec::new();
    let mut current = Vec::new();

    for ks in keys {
        if ks.character.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else {
            current.push(*ks);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Pass 1 per-word marker resolution. Appends the word's token to `tokens`.
///
/// Marker checks run in fixed order: ellipsis (which may leave an empty
/// word), then harmony brackets, then soft underscores, then the loud
/// candidacy rule. A word can carry sustain and harmony and an emphasis
/// simultaneously (`[HOLD]...`).
fn scan_word(word: &[Keystroke], tokens: &mut Vec<Token>) {
    let mut text: String = word.iter().map(|ks| ks.character).collect();

    // Trailing ellipsis: sustain the preceding word at double duration.
    let mut sustain = false;
    let mut duration_modifier = 1.0f32;
    if text.ends_with("...") {
        sustain = true;
        duration_modifier = 2.0;
        text.truncate(text.len() - 3);
        if text.is_empty() {
            // A standalone "..." sustains whatever is already sounding.
            tokens.push(Token {
                text: "...".into(),
                emphasis: Emphasis::None,
                sustain: true,
                harmony: false,
                duration_modifier: 2.0,
            });
            return;
        }
    }

    // Harmony: [bracket] wrapping, or ctrl held on any keystroke.
    let mut harmony = false;
    if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
        harmony = true;
        text = text[1..text.len() - 1].to_string();
    } else if word.iter().any(|ks| ks.ctrl) {
        harmony = true;
    }

    // Soft: _underscore_ wrapping. Checked after harmony so "[_x_]" softens
    // the harmonized word rather than leaking delimiters into the text.
    let emphasis = if text.len() > 2 && text.starts_with('_') && text.ends_with('_') {
        text = text[1..text.len() - 1].to_string();
        Emphasis::Soft
    } else {
        loud_candidate(&text, word)
    };

    tokens.push(Token {
        text,
        emphasis,
        sustain,
        harmony,
        // Clamped at this producing boundary; never re-clamped downstream.
        duration_modifier: duration_modifier.max(0.0),
    });
}

/// The loud candidacy rule: every alphabetic character uppercase, and either
/// the shift flag was actually held somewhere in the word or the word has
/// more than one letter. The second arm catches all-caps words arriving
/// without modifier flags (song files, pasted text); the length guard keeps
/// an ordinary bare "I" from registering as loud.
fn loud_candidate(text: &str, word: &[Keystroke]) -> Emphasis {
    let alpha: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if alpha.is_empty() {
        return Emphasis::None;
    }
    let all_upper = alpha.iter().all(|c| c.is_uppercase());
    let any_shift = word.iter().any(|ks| ks.shift);
    if all_upper && (any_shift || alpha.len() > 1) {
        Emphasis::Loud
    } else {
        Emphasis::None
    }
}

/// Pass 2 promotion: any maximal run of two or more consecutive loud tokens
/// becomes shout. Isolated loud tokens stay loud.
fn promote_shout(tokens: &mut [Token]) {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].emphasis != Emphasis::Loud {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < tokens.len() && tokens[i].emphasis == Emphasis::Loud {
            i += 1;
        }
        if i - run_start >= 2 {
            for token in &mut tokens[run_start..i] {
                token.emphasis = Emphasis::Shout;
            }
        }
    }
}

/// Convenience: tokenize a plain string, inferring shift from uppercase.
pub fn tokenize_str(text: &str) -> Vec<Token> {
    let keys: Vec<Keystroke> = text.chars().map(Keystroke::from_char).collect();
    tokenize(&keys)
}
