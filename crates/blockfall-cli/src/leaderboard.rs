//! High-score table for solo games.

use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Entries shown in the table.
pub const TOP_ENTRIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub score: u32,
    pub level: u8,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl LeaderboardEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(nickname: impl Into<String>, score: u32, level: u8) -> Self {
        Self {
            nickname: nickname.into(),
            score,
            level,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Returns the submission time in the local time zone.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        DateTime::from_timestamp_millis(self.timestamp).map(|time| time.with_timezone(&Local))
    }

    fn validate(&self) -> Result<(), LeaderboardError> {
        if self.nickname.trim().is_empty() {
            return Err(LeaderboardError::EmptyNickname);
        }
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LeaderboardError {
    #[display("nickname must not be empty")]
    EmptyNickname,
    #[display("failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed leaderboard {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Storage for submitted scores.
pub trait Leaderboard {
    /// Stores `entry` and returns the updated top entries.
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Returns the top entries, best score first.
    fn top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// Orders entries by score, best first. Equal scores keep submission order.
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(TOP_ENTRIES);
    ranked
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        entry.validate()?;
        self.entries.push(entry);
        Ok(rank(&self.entries))
    }

    fn top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(rank(&self.entries))
    }
}

/// Leaderboard persisted as a JSON array of entries.
///
/// A missing file is an empty leaderboard. Every submission rewrites the whole
/// file.
#[derive(Debug, Clone)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LeaderboardError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the entries to a sibling `.tmp` file and renames it over the
    /// table, so a failed write never leaves a truncated table behind.
    fn store(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        let mut json = serde_json::to_vec_pretty(entries).map_err(|source| {
            LeaderboardError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        json.push(b'\n');

        let tmp = self.temp_path();
        let written = fs::write(&tmp, &json).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            _ = fs::remove_file(&tmp);
            return Err(self.io_error(source));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: io::Error) -> LeaderboardError {
        LeaderboardError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Leaderboard for JsonFileLeaderboard {
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        entry.validate()?;
        let mut entries = self.load()?;
        entries.push(entry);
        self.store(&entries)?;
        log::info!("leaderboard saved to {}", self.path.display());
        Ok(rank(&entries))
    }

    fn top(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(rank(&self.load()?))
    }
}

/// Wraps a leaderboard so that failures never lose a score.
///
/// Successful results are mirrored in memory. When the backing store fails,
/// the error is kept for display and the mirror answers instead.
#[derive(Debug)]
pub struct FallbackLeaderboard<L> {
    primary: L,
    mirror: MemoryLeaderboard,
    last_error: Option<LeaderboardError>,
}

impl<L> FallbackLeaderboard<L>
where
    L: Leaderboard,
{
    pub fn new(primary: L) -> Self {
        let mut this = Self {
            primary,
            mirror: MemoryLeaderboard::new(),
            last_error: None,
        };
        this.refresh();
        this
    }

    pub fn last_error(&self) -> Option<&LeaderboardError> {
        self.last_error.as_ref()
    }

    /// Reloads the mirror from the backing store.
    pub fn refresh(&mut self) -> Vec<LeaderboardEntry> {
        match self.primary.top() {
            Ok(top) => {
                self.last_error = None;
                self.mirror = MemoryLeaderboard::with_entries(top.clone());
                top
            }
            Err(e) => {
                log::warn!("leaderboard unavailable: {e}");
                self.last_error = Some(e);
                rank(&self.mirror.entries)
            }
        }
    }

    pub fn submit(&mut self, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
        match self.primary.submit(entry.clone()) {
            Ok(top) => {
                self.last_error = None;
                self.mirror = MemoryLeaderboard::with_entries(top.clone());
                top
            }
            Err(e) => {
                log::warn!("failed to submit score: {e}");
                self.last_error = Some(e);
                // An invalid entry is rejected by the mirror too.
                self.mirror
                    .submit(entry)
                    .unwrap_or_else(|_| rank(&self.mirror.entries))
            }
        }
    }

    pub fn top(&self) -> Vec<LeaderboardEntry> {
        rank(&self.mirror.entries)
    }
}
