use std::fmt;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{RefrainError, Result};

/// Which game a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    Singing,
    Dictation,
}

/// Opaque handle returned when a result is recorded, used to claim it later
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreId(String);

impl ScoreId {
    fn generate() -> Self {
        let value: u64 = rand::thread_rng().gen();
        ScoreId(format!("{value:016x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScoreId {
    fn from(value: &str) -> Self {
        ScoreId(value.to_string())
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named result on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u8,
    pub song_key: Option<String>,
    pub recorded_at: DateTime<Local>,
}

/// SQLite-backed store of game results
#[derive(Debug)]
pub struct Leaderboard {
    conn: Connection,
}

impl Leaderboard {
    /// Open (or create) the board at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RefrainError::io("creating leaderboard directory", e))?;
        }
        let conn = Connection::open(path.as_ref())?;
        log::info!("opened leaderboard at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS scores (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                mode TEXT NOT NULL,
                song_key TEXT,
                points INTEGER NOT NULL,
                name TEXT,
                recorded_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_mode_points ON scores(mode, points)",
            [],
        )?;

        Ok(Leaderboard { conn })
    }

    /// Store a result without a name yet
    pub fn record(&self, mode: GameMode, song_key: Option<&str>, points: u8) -> Result<ScoreId> {
        let id = ScoreId::generate();
        self.conn.execute(
            r#"
            INSERT INTO scores (id, mode, song_key, points, name, recorded_at)
            VALUES (?1, ?2, ?3, ?4, NULL, ?5)
            "#,
            params![
                id.as_str(),
                mode.to_string(),
                song_key,
                points,
                Local::now().to_rfc3339(),
            ],
        )?;
        log::info!("recorded {mode} result {points} as {id}");
        Ok(id)
    }

    /// Attach a player name to a pending result; false if the id is unknown
    /// or the result already carries a name
    pub fn claim(&self, id: &ScoreId, name: &str) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE scores SET name = ?1 WHERE id = ?2 AND name IS NULL",
            params![name.trim(), id.as_str()],
        )?;
        Ok(updated > 0)
    }

    /// Points stored under `id`, named or not
    pub fn points(&self, id: &ScoreId) -> Result<Option<u8>> {
        let points = self
            .conn
            .query_row(
                "SELECT points FROM scores WHERE id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(points)
    }

    /// Best named results, highest first, ties going to the earlier result
    pub fn top(&self, mode: GameMode, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, points, song_key, recorded_at
            FROM scores
            WHERE mode = ?1 AND name IS NOT NULL AND name != ''
            ORDER BY points DESC, seq ASC
            LIMIT ?2
            "#,
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entry_iter = stmt.query_map(params![mode.to_string(), limit], |row| {
            let recorded_at: String = row.get(3)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        3,
                        "recorded_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(LeaderboardEntry {
                name: row.get(0)?,
                points: row.get(1)?,
                song_key: row.get(2)?,
                recorded_at,
            })
        })?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Write the board for `mode` as CSV with a header row
    pub fn export_csv<W: Write>(&self, mode: GameMode, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in self.top(mode, usize::MAX)? {
            csv_writer.serialize(&entry)?;
        }
        csv_writer
            .flush()
            .map_err(|e| RefrainError::io("writing leaderboard CSV", e))?;
        Ok(())
    }

    /// Clear all results (for testing or reset purposes)
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM scores", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Leaderboard {
        Leaderboard::open_in_memory().unwrap()
    }

    #[test]
    fn test_record_and_claim() {
        let board = board();
        let id = board
            .record(GameMode::Singing, Some("hey-jude"), 87)
            .unwrap();

        assert_eq!(board.points(&id).unwrap(), Some(87));
        assert!(board.top(GameMode::Singing, 10).unwrap().is_empty());

        assert!(board.claim(&id, "  Ana ").unwrap());
        let top = board.top(GameMode::Singing, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Ana");
        assert_eq!(top[0].points, 87);
        assert_eq!(top[0].song_key.as_deref(), Some("hey-jude"));
    }

    #[test]
    fn test_claimed_result_keeps_its_name() {
        let board = board();
        let id = board.record(GameMode::Singing, None, 64).unwrap();

        assert!(board.claim(&id, "Ana").unwrap());
        assert!(!board.claim(&id, "Mallory").unwrap());

        let top = board.top(GameMode::Singing, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Ana");
    }

    #[test]
    fn test_claim_unknown_id() {
        let board = board();
        assert!(!board.claim(&ScoreId::from("deadbeef"), "Bo").unwrap());
        assert_eq!(board.points(&ScoreId::from("deadbeef")).unwrap(), None);
    }

    #[test]
    fn test_top_orders_by_points_then_age() {
        let board = board();
        for (name, points) in [("low", 40), ("first-high", 90), ("mid", 70), ("second-high", 90)] {
            let id = board.record(GameMode::Singing, None, points).unwrap();
            board.claim(&id, name).unwrap();
        }

        let names: Vec<String> = board
            .top(GameMode::Singing, 3)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["first-high", "second-high", "mid"]);
    }

    #[test]
    fn test_modes_are_separate() {
        let board = board();
        let sing = board.record(GameMode::Singing, Some("o-sol"), 60).unwrap();
        let dict = board.record(GameMode::Dictation, None, 95).unwrap();
        board.claim(&sing, "a").unwrap();
        board.claim(&dict, "b").unwrap();

        assert_eq!(board.top(GameMode::Singing, 10).unwrap().len(), 1);
        assert_eq!(board.top(GameMode::Dictation, 10).unwrap()[0].points, 95);
    }

    #[test]
    fn test_ids_are_unique() {
        let board = board();
        let a = board.record(GameMode::Singing, None, 1).unwrap();
        let b = board.record(GameMode::Singing, None, 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn test_export_csv() {
        let board = board();
        let id = board.record(GameMode::Dictation, None, 77).unwrap();
        board.claim(&id, "Cy").unwrap();

        let mut out = Vec::new();
        board.export_csv(GameMode::Dictation, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("name,points,song_key,recorded_at"));
        assert!(lines.next().unwrap().starts_with("Cy,77,,"));
    }

    #[test]
    fn test_clear() {
        let board = board();
        let id = board.record(GameMode::Singing, None, 10).unwrap();
        board.clear().unwrap();
        assert_eq!(board.points(&id).unwrap(), None);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.db");
        let id = {
            let board = Leaderboard::open(&path).unwrap();
            board.record(GameMode::Singing, None, 55).unwrap()
        };

        let reopened = Leaderboard::open(&path).unwrap();
        assert_eq!(reopened.points(&id).unwrap(), Some(55));
    }

    #[test]
    fn test_game_mode_display() {
        assert_eq!(GameMode::Singing.to_string(), "singing");
        assert_eq!(GameMode::Dictation.to_string(), "dictation");
    }
}
