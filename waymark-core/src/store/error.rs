use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use super::schema::SchemaError;
use crate::ConfigError;

/// Errors raised by [`PointStore`](super::PointStore) operations.
#[derive(Debug, Error)]
pub enum PointStoreError {
    /// The supplied configuration was rejected.
    #[error("invalid store configuration: {0}")]
    Config(#[from] ConfigError),
    /// The data directory could not be created or is not a directory.
    #[error("failed to prepare data directory {path:?}")]
    DataDirectory {
        /// Directory that could not be prepared.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The SQLite database could not be opened or created.
    #[error("failed to open SQLite database at {path:?}")]
    StorageUnavailable {
        /// Location of the database file.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or upgrading the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// `clear_table` named a table that does not exist.
    #[error("table {table:?} does not exist")]
    TableMissing {
        /// Requested table name.
        table: String,
    },
    /// A single point could not be inserted.
    #[error("failed to insert point {name:?}")]
    Write {
        /// Name of the rejected point.
        name: String,
        /// Cause of the rejection.
        #[source]
        source: WriteError,
    },
    /// At least one point of a batch could not be inserted.
    #[error(transparent)]
    PartialBatch(#[from] BatchInsertError),
    /// Reading or deleting rows failed.
    #[error("failed to {operation}")]
    Query {
        /// Operation being performed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Reason a single insert was rejected.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A coordinate was NaN or infinite.
    #[error("{field} must be finite, found {value}")]
    NonFiniteCoordinate {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The storage engine rejected the row.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// One failed entry of a batch insert.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the point in the submitted batch.
    pub index: usize,
    /// Name of the point.
    pub name: String,
    /// Cause of the rejection.
    pub source: WriteError,
}

/// Outcome of a batch insert in which some points failed.
///
/// Batches are not transactional: every row listed in `inserted_ids` stays
/// persisted even though the batch as a whole is reported as failed.
#[derive(Debug, Error)]
#[error("{} of {} points failed to insert", .failures.len(), .attempted)]
pub struct BatchInsertError {
    /// Number of points submitted.
    pub attempted: usize,
    /// Row ids of the points that were written, in batch order.
    pub inserted_ids: Vec<i64>,
    /// Points that were rejected, in batch order.
    pub failures: Vec<BatchFailure>,
}

impl BatchInsertError {
    /// Status code reported for failed batches by the sentinel-based API.
    pub const LEGACY_CODE: i64 = -1;

    /// Number of rows that were written despite the failure.
    #[must_use]
    pub const fn inserted(&self) -> usize {
        self.inserted_ids.len()
    }

    /// Batch indices of the rejected points.
    #[must_use]
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|failure| failure.index).collect()
    }

    /// The sentinel status a caller of the sentinel-based API would observe.
    #[must_use]
    pub const fn legacy_code(&self) -> i64 {
        Self::LEGACY_CODE
    }
}
