// Song data model — expected token sequences with display metadata.
//
// A song is the authored side of a performance: the Sheet Text the player is
// meant to type and the token sequence the tracker compares against. Songs
// are plain JSON files (one per song) loaded through serde, following the
// same JSON-in/typed-struct-out pattern as the voice crate's lexicon.
//
// The engine treats songs as read-only: it never mutates a loaded song, and
// a performance can run entirely without one (free typing).

use crate::types::Token;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A playable song: expected Sheet Text tokens plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    /// Display title.
    pub title: String,
    /// Intended tempo, beats per minute.
    pub bpm: u16,
    /// Name of the difficulty preset this song was authored for.
    pub difficulty: String,
    /// The raw Sheet Text the player is shown.
    pub sheet_text: String,
    /// The expected token sequence, in order.
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Identifier derived from the file name; empty for in-memory songs.
    #[serde(default)]
    pub song_id: String,
}

impl Song {
    /// Parse a song from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Load a song from a JSON file. The `song_id` becomes the file stem.
pub fn load_song(path: &Path) -> std::io::Result<Song> {
    let json = std::fs::read_to_string(path)?;
    let mut song = Song::from_json(&json).map_err(std::io::Error::other)?;
    song.song_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(song)
}

/// Load every `*.json` song in a directory, sorted by file name.
///
/// A missing directory yields an empty list rather than an error — the
/// song browser treats "no songs installed" as a normal state.
pub fn list_songs(dir: &Path) -> Vec<Song> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths.iter().filter_map(|p| load_song(p).ok()).collect()
}
