//! Store configuration supplied by the host application.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::BoundsMode;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_NAME: &str = "database.db";

/// Where and how the point store keeps its data.
///
/// With the `serde` feature the configuration can be deserialised from any
/// serde format; missing fields fall back to [`StoreConfig::default`].
///
/// # Examples
/// ```
/// use camino::Utf8Path;
/// use waymark_core::{BoundsMode, StoreConfig};
///
/// let config = StoreConfig::new("/var/lib/app")
///     .with_bounds_mode(BoundsMode::Normalised { scale_longitude: true });
///
/// assert_eq!(config.database_path(), Utf8Path::new("/var/lib/app/database.db"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct StoreConfig {
    /// Application-private directory holding the database file.
    pub data_dir: Utf8PathBuf,
    /// Bare file name of the database inside `data_dir`.
    pub database_name: String,
    /// Bound computation used by region queries.
    pub bounds_mode: BoundsMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Utf8PathBuf::from("."),
            database_name: String::from(DATABASE_NAME),
            bounds_mode: BoundsMode::default(),
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at `data_dir` with default settings otherwise.
    pub fn new(data_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Override the database file name.
    #[must_use]
    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = database_name.into();
        self
    }

    /// Override the region query bound computation.
    #[must_use]
    pub fn with_bounds_mode(mut self, bounds_mode: BoundsMode) -> Self {
        self.bounds_mode = bounds_mode;
        self
    }

    /// Full path of the database file.
    #[must_use]
    pub fn database_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.database_name)
    }

    /// Reject database names that are empty or would escape `data_dir`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.database_name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyDatabaseName);
        }
        let is_bare_file_name = Utf8Path::new(name).file_name() == Some(name)
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !is_bare_file_name {
            return Err(ConfigError::InvalidDatabaseName {
                name: self.database_name.clone(),
            });
        }
        Ok(())
    }
}

/// Errors raised by [`StoreConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The database name was empty or whitespace.
    #[error("database name must not be empty")]
    EmptyDatabaseName,
    /// The database name was not a bare file name.
    #[error("database name {name:?} must be a bare file name")]
    InvalidDatabaseName {
        /// Rejected name.
        name: String,
    },
}
