// Phoneme lexicon — the fixed word-to-phoneme-sequence table.
//
// The lexicon is immutable data injected at mapper construction, not a
// module-level global: parallel sessions can run with different tables, and
// tests can supply tiny fixtures. Entries are keyed by lowercase word in a
// `BTreeMap` for deterministic iteration.
//
// A default ~50-word ARPAbet-style table is embedded at compile time from
// `data/phoneme_lexicon.json` via `include_str!`, following the same
// JSON-string-in/typed-struct-out pattern used by `lyrebird_text::Song`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level JSON structure for the lexicon file.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    words: BTreeMap<String, Vec<String>>,
}

/// A loaded word→phoneme table with lookup methods.
#[derive(Debug, Clone)]
pub struct PhonemeLexicon {
    words: BTreeMap<String, Vec<String>>,
}

impl PhonemeLexicon {
    /// Parse a lexicon from a JSON string. Keys are lowercased on load so
    /// lookups can normalize the query the same way.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let words = file
            .words
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(PhonemeLexicon { words })
    }

    /// Look up the phoneme sequence for a word, case-insensitively.
    /// Returns `None` for words outside the table — callers decide the
    /// fallback (the mapper spells letter-by-letter).
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.words.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Load the default lexicon embedded at compile time.
///
/// Panics only if the embedded JSON is malformed, which would be a build
/// defect rather than a runtime condition.
pub fn default_lexicon() -> PhonemeLexicon {
    let json = include_str!("../data/phoneme_lexicon.json");
    PhonemeLexicon::from_json(json).expect("embedded phoneme_lexicon.json is malformed")
}
