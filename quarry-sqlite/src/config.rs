//! SQLite configuration.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::{SqliteError, SqliteResult};

/// SQLite database configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database path (or ":memory:" for in-memory).
    pub path: DatabasePath,
    /// Enable foreign keys.
    pub foreign_keys: bool,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: Option<u32>,
    /// Journal mode for file databases.
    pub journal_mode: JournalMode,
    /// Connections opened when the pool is created (file databases).
    pub min_size: usize,
    /// Upper bound on connections in use at once.
    pub max_size: usize,
}

/// Database path configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabasePath {
    /// In-memory database.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// Display form of the path, for logs. Connections open the path itself.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Memory => Cow::Borrowed(":memory:"),
            Self::File(path) => path.to_string_lossy(),
        }
    }

    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// SQLite journal mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalMode {
    /// Delete the journal after each transaction.
    Delete,
    /// Write-ahead logging.
    #[default]
    Wal,
}

impl JournalMode {
    /// Get the SQLite pragma value.
    pub fn as_pragma(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Wal => "WAL",
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: DatabasePath::Memory,
            foreign_keys: true,
            busy_timeout_ms: Some(5000),
            journal_mode: JournalMode::Wal,
            min_size: 1,
            max_size: 10,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a new configuration for a file-based database.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            path: DatabasePath::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Parse a SQLite URL into configuration.
    ///
    /// Supported formats:
    /// - `sqlite::memory:` or `:memory:` - In-memory database
    /// - `sqlite://path/to/db.sqlite` - File-based database
    /// - `sqlite:path/to/db.sqlite` - Alternative format
    ///
    /// Query parameters: `foreign_keys`, `busy_timeout`, `journal_mode`,
    /// `min_size`, `max_size`.
    pub fn from_url(url: impl AsRef<str>) -> SqliteResult<Self> {
        let url_str = url.as_ref();
        let (location, query) = match url_str.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (url_str, None),
        };

        let path = location
            .strip_prefix("sqlite://")
            .or_else(|| location.strip_prefix("sqlite:"))
            .unwrap_or(location);

        let mut config = match path {
            "" => return Err(SqliteError::config("database path is required")),
            ":memory:" => Self::memory(),
            path => Self::file(path),
        };

        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "mode" if value == "memory" => config.path = DatabasePath::Memory,
                "foreign_keys" => config.foreign_keys = value == "true" || value == "1",
                "busy_timeout" => config.busy_timeout_ms = Some(parse(key, value)?),
                "journal_mode" => {
                    config.journal_mode = match value.to_lowercase().as_str() {
                        "delete" => JournalMode::Delete,
                        "wal" => JournalMode::Wal,
                        other => {
                            return Err(SqliteError::config(format!(
                                "unsupported journal_mode '{}'",
                                other
                            )));
                        }
                    }
                }
                "min_size" => config.min_size = parse(key, value)?,
                "max_size" => config.max_size = parse(key, value)?,
                _ => {}
            }
        }

        Ok(config)
    }

    /// Display form of the database path.
    pub fn path_str(&self) -> Cow<'_, str> {
        self.path.as_str()
    }

    /// Number of connections the pool may hand out at once.
    ///
    /// Every in-memory connection is a separate database, so an in-memory
    /// pool shares exactly one connection.
    pub fn effective_max_size(&self) -> usize {
        if self.path.is_memory() {
            1
        } else {
            self.max_size
        }
    }

    /// Check that the settings are consistent.
    pub fn validate(&self) -> SqliteResult<()> {
        if self.max_size == 0 || self.min_size > self.max_size {
            return Err(SqliteError::config(format!(
                "invalid pool size: min {} max {}",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }

    /// Generate the initialization SQL for this configuration.
    pub fn init_sql(&self) -> String {
        let mut sql = String::new();

        if self.foreign_keys {
            sql.push_str("PRAGMA foreign_keys = ON;\n");
        }

        if !self.path.is_memory() {
            sql.push_str(&format!(
                "PRAGMA journal_mode = {};\n",
                self.journal_mode.as_pragma()
            ));
        }

        if let Some(timeout) = self.busy_timeout_ms {
            sql.push_str(&format!("PRAGMA busy_timeout = {};\n", timeout));
        }

        sql
    }

    /// Enable or disable foreign keys.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Set the busy timeout in milliseconds.
    pub fn busy_timeout(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }

    /// Set the journal mode.
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Set the number of connections opened up front.
    pub fn min_size(mut self, n: usize) -> Self {
        self.min_size = n;
        self
    }

    /// Set the maximum number of connections.
    pub fn max_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> SqliteResult<T> {
    value
        .parse()
        .map_err(|_| SqliteError::config(format!("invalid {} value '{}'", key, value)))
}
