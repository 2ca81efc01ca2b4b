use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::{RefrainError, Result};
use crate::reference::{Transcript, TranscriptRecord};

static SONGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/songs");

/// A catalog entry: a refrain the player can pick.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub key: String,
    pub title: String,
    pub transcript: Transcript,
}

#[derive(Deserialize)]
struct SongRecord {
    key: String,
    title: Option<String>,
    #[serde(flatten)]
    transcript: TranscriptRecord,
}

impl From<SongRecord> for Song {
    fn from(record: SongRecord) -> Self {
        let title = record.title.unwrap_or_else(|| record.key.clone());
        Song {
            key: record.key,
            title,
            transcript: record.transcript.into(),
        }
    }
}

fn parse_song(entry: &str, contents: &str) -> Result<Song> {
    let record: SongRecord = serde_json::from_str(contents)
        .map_err(|e| RefrainError::invalid_catalog(entry, e.to_string()))?;
    Ok(record.into())
}

/// Songs keyed by their identifier, loaded and normalized up front.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: BTreeMap<String, Song>,
}

impl Catalog {
    /// The refrains shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Catalog::default();

        for file in SONGS_DIR.files() {
            let entry = file.path().display().to_string();
            let contents = file
                .contents_utf8()
                .ok_or_else(|| RefrainError::invalid_catalog(&entry, "not valid UTF-8"))?;
            catalog.insert(parse_song(&entry, contents)?);
        }

        log::debug!("loaded {} built-in songs", catalog.len());
        Ok(catalog)
    }

    /// Load every `*.json` song file in `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut catalog = Catalog::default();
        let entries =
            fs::read_dir(dir.as_ref()).map_err(|e| RefrainError::io("reading catalog dir", e))?;

        for entry in entries {
            let path = entry
                .map_err(|e| RefrainError::io("reading catalog dir", e))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let contents =
                fs::read_to_string(&path).map_err(|e| RefrainError::io("reading song file", e))?;
            catalog.insert(parse_song(&path.display().to_string(), &contents)?);
        }

        log::info!(
            "loaded {} songs from {}",
            catalog.len(),
            dir.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn insert(&mut self, song: Song) {
        self.songs.insert(song.key.clone(), song);
    }

    pub fn get(&self, key: &str) -> Result<&Song> {
        self.songs
            .get(key)
            .ok_or_else(|| RefrainError::UnknownSong(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.songs.keys().map(String::as_str)
    }

    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.songs.values()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();

        assert!(catalog.len() >= 10);
        assert!(catalog.keys().any(|k| k == "hotel-california"));
        assert!(catalog.keys().any(|k| k == "shake-it-off"));
    }

    #[test]
    fn test_hotel_california_is_timed_and_normalized() {
        let catalog = Catalog::builtin().unwrap();
        let song = catalog.get("hotel-california").unwrap();

        assert_eq!(song.title, "Hotel California");
        assert_matches!(&song.transcript.reference, Reference::Timed(timed) => {
            let first = &timed.words()[0];
            assert_eq!(first.text(), "welcome");
            assert_eq!(first.start_time, 1.12);
            assert_eq!(timed.words()[4].text(), "california");
        });
    }

    #[test]
    fn test_text_only_songs_are_plain() {
        let catalog = Catalog::builtin().unwrap();
        let song = catalog.get("flowers").unwrap();

        assert_matches!(song.transcript.reference, Reference::Plain(_));
        assert_eq!(song.transcript.duration_secs, 15);
    }

    #[test]
    fn test_portuguese_songs_carry_language() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.get("o-sol").unwrap().transcript.language, "pt-BR");
    }

    #[test]
    fn test_unknown_song() {
        let catalog = Catalog::builtin().unwrap();
        assert_matches!(catalog.get("nope"), Err(RefrainError::UnknownSong(key)) if key == "nope");
    }

    #[test]
    fn test_load_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("anthem.json"),
            r#"{"key": "anthem", "text": "Oh say can you see", "time": 10}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::load_dir(dir.path()).unwrap();
        let song = catalog.get("anthem").unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(song.title, "anthem");
        assert_eq!(song.transcript.duration_secs, 10);
    }

    #[test]
    fn test_load_dir_rejects_broken_entries() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), r#"{"title": "no key"}"#).unwrap();

        assert_matches!(
            Catalog::load_dir(dir.path()),
            Err(RefrainError::InvalidCatalog { .. })
        );
    }
}
