//! SQLite-backed persistence for [`Point`] values.
//!
//! - [`schema`] creates the `points` table and tracks its version.
//! - [`PointStore`] exposes the insert, clear and query operations.
//!
//! Every operation opens its own connection and closes it before returning;
//! no connection, statement or cursor outlives a call.

mod error;
mod schema;


use std::{collections::HashSet, sync::Arc};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row, params};

use crate::{AppContext, BoundsMode, DegreeBounds, Point, StoreConfig};

pub use error::{BatchFailure, BatchInsertError, PointStoreError, WriteError};
pub use schema::{POINTS_TABLE, SCHEMA_VERSION, SchemaError};

use schema::{SchemaOutcome, initialise_schema};

/// Shared handle to the single store of an [`AppContext`].
pub type StoreHandle = Arc<PointStore>;

const INSERT_POINT: &str =
    "INSERT INTO points (name, latitude, longitude, elevation) VALUES (?1, ?2, ?3, ?4)";
const SELECT_ALL_POINTS: &str = "SELECT id, name, latitude, longitude, elevation FROM points";
const SELECT_POINTS_IN_BOUNDS: &str = "SELECT id, name, latitude, longitude, elevation
    FROM points
    WHERE latitude >= ?1 AND latitude <= ?2 AND longitude >= ?3 AND longitude <= ?4";

/// Persistent table of points of interest.
///
/// # Examples
/// ```
/// use waymark_core::{AppContext, Point, PointStore, StoreConfig};
///
/// # fn main() -> Result<(), waymark_core::PointStoreError> {
/// let dir = tempfile::tempdir().expect("create temp dir");
/// let data_dir = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
///     .expect("utf-8 temp dir");
/// let context = AppContext::new(StoreConfig::new(data_dir));
///
/// let store = PointStore::open(&context)?;
/// let id = store.add_point(&Point::new("Eiffel Tower", 48.8584, 2.2945, 330))?;
/// store.add_point(&Point::new("Tokyo Tower", 35.6586, 139.7454, 150))?;
///
/// let nearby = store.points_around(&Point::new("here", 48.8580, 2.2950, 0), 500.0)?;
/// assert_eq!(nearby.len(), 1);
/// assert_eq!(nearby[0].id, Some(id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PointStore {
    config: StoreConfig,
    database_path: Utf8PathBuf,
}

impl PointStore {
    /// Return the store owned by `context`, creating it on first use.
    ///
    /// The first call prepares the data directory and the schema. Concurrent
    /// first calls block until that work completes and then share its
    /// result; every later call returns the same handle. A failed first
    /// call leaves the context without a store so the next call retries.
    pub fn open(context: &AppContext) -> Result<StoreHandle, PointStoreError> {
        context
            .store_slot()
            .get_or_try_init(|| Self::open_at(context.config().clone()).map(Arc::new))
            .map(Arc::clone)
    }

    /// Open a store directly from a configuration, bypassing any context.
    ///
    /// Callers are responsible for keeping a single instance per database.
    pub fn open_at(config: StoreConfig) -> Result<Self, PointStoreError> {
        config.validate()?;
        waymark_fs::ensure_dir(&config.data_dir).map_err(|source| {
            PointStoreError::DataDirectory {
                path: config.data_dir.clone(),
                source,
            }
        })?;

        let database_path = config.database_path();
        match waymark_fs::file_is_file(&database_path) {
            Ok(true) => debug!("opening existing database {database_path}"),
            Ok(false) => debug!("creating database {database_path}"),
            Err(err) => warn!("could not inspect {database_path} before opening: {err}"),
        }
        let mut connection = Connection::open(database_path.as_std_path()).map_err(|source| {
            PointStoreError::StorageUnavailable {
                path: database_path.clone(),
                source,
            }
        })?;

        match initialise_schema(&mut connection)? {
            SchemaOutcome::Created => {
                debug!("created {POINTS_TABLE} schema v{SCHEMA_VERSION} in {database_path}");
            }
            SchemaOutcome::Current => {
                debug!("opened {database_path} at schema v{SCHEMA_VERSION}");
            }
            SchemaOutcome::Upgraded { from } => {
                debug!("upgraded {database_path} from schema v{from} to v{SCHEMA_VERSION}");
            }
        }

        Ok(Self {
            config,
            database_path,
        })
    }

    /// File name of the backing database.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Full path of the backing database.
    #[must_use]
    pub fn database_path(&self) -> &Utf8Path {
        &self.database_path
    }

    /// Configuration the store was opened with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Delete every row of `table`, keeping its schema.
    ///
    /// Fails with [`PointStoreError::TableMissing`] when no such table exists.
    pub fn clear_table(&self, table: &str) -> Result<(), PointStoreError> {
        let connection = self.connect()?;
        let exists = connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
                [table],
                |_| Ok(()),
            )
            .optional()
            .map_err(query_error("look up table"))?
            .is_some();
        if !exists {
            return Err(PointStoreError::TableMissing {
                table: table.to_owned(),
            });
        }

        let removed = connection
            .execute(&format!("DELETE FROM {}", quote_identifier(table)), [])
            .map_err(query_error("clear table"))?;
        debug!("cleared {removed} rows from {table}");
        Ok(())
    }

    /// Insert one point and return its newly assigned row id.
    ///
    /// Any `id` already set on `point` is ignored.
    pub fn add_point(&self, point: &Point) -> Result<i64, PointStoreError> {
        let connection = self.connect()?;
        insert_point(&connection, point).map_err(|source| PointStoreError::Write {
            name: point.name.clone(),
            source,
        })
    }

    /// Insert `points` in order and return how many were written.
    ///
    /// Each point is inserted on its own; there is no enclosing transaction.
    /// When any insert fails the remaining points are still attempted and
    /// the call returns [`PointStoreError::PartialBatch`], whose
    /// [`BatchInsertError::inserted_ids`] lists the rows that stay persisted.
    pub fn add_points(&self, points: &[Point]) -> Result<usize, PointStoreError> {
        let connection = self.connect()?;
        let mut inserted_ids = Vec::with_capacity(points.len());
        let mut failures = Vec::new();

        for (index, point) in points.iter().enumerate() {
            match insert_point(&connection, point) {
                Ok(id) => inserted_ids.push(id),
                Err(source) => failures.push(BatchFailure {
                    index,
                    name: point.name.clone(),
                    source,
                }),
            }
        }

        if failures.is_empty() {
            return Ok(inserted_ids.len());
        }

        info!(
            "batch insert kept {} of {} points; {} failed",
            inserted_ids.len(),
            points.len(),
            failures.len()
        );
        Err(BatchInsertError {
            attempted: points.len(),
            inserted_ids,
            failures,
        }
        .into())
    }

    /// Every persisted point, in storage order.
    pub fn all_points(&self) -> Result<Vec<Point>, PointStoreError> {
        let connection = self.connect()?;
        collect_points(&connection, SELECT_ALL_POINTS, [], "read points")
    }

    /// Points inside the square of half-size `distance_meters` around
    /// `center`, using the configured [`BoundsMode`].
    ///
    /// The square is measured in degrees: both axes use the same
    /// [`meters_to_degrees`](crate::meters_to_degrees) delta, and bounds are
    /// inclusive. A negative distance yields an inverted, empty square.
    pub fn points_around(
        &self,
        center: &Point,
        distance_meters: f64,
    ) -> Result<Vec<Point>, PointStoreError> {
        self.points_around_with(center, distance_meters, self.config.bounds_mode)
    }

    /// Like [`points_around`](Self::points_around) with an explicit mode.
    pub fn points_around_with(
        &self,
        center: &Point,
        distance_meters: f64,
        mode: BoundsMode,
    ) -> Result<Vec<Point>, PointStoreError> {
        let bounds = mode.bounds(center, distance_meters);
        debug!("querying {distance_meters} m around {center:?} with {mode:?}: {bounds:?}");
        self.points_in_any(&bounds)
    }

    /// Points inside `bounds`, edges included.
    pub fn points_in_bounds(&self, bounds: &DegreeBounds) -> Result<Vec<Point>, PointStoreError> {
        self.points_in_any(std::slice::from_ref(bounds))
    }

    fn points_in_any(&self, bounds: &[DegreeBounds]) -> Result<Vec<Point>, PointStoreError> {
        let connection = self.connect()?;
        let mut points = Vec::new();
        let mut seen = HashSet::new();

        for bound in bounds {
            let matches = collect_points(
                &connection,
                SELECT_POINTS_IN_BOUNDS,
                params![bound.lat_min, bound.lat_max, bound.lon_min, bound.lon_max],
                "query points in bounds",
            )?;
            points.extend(matches.into_iter().filter(|point| seen.insert(point.id)));
        }

        Ok(points)
    }

    fn connect(&self) -> Result<Connection, PointStoreError> {
        Connection::open_with_flags(
            self.database_path.as_std_path(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| PointStoreError::StorageUnavailable {
            path: self.database_path.clone(),
            source,
        })
    }
}

fn insert_point(connection: &Connection, point: &Point) -> Result<i64, WriteError> {
    if let Some((field, value)) = point.first_non_finite() {
        warn!("rejecting point {:?}: {field} is {value}", point.name);
        return Err(WriteError::NonFiniteCoordinate { field, value });
    }

    connection
        .prepare_cached(INSERT_POINT)
        .and_then(|mut statement| {
            statement.insert(params![
                point.name,
                point.latitude,
                point.longitude,
                point.elevation
            ])
        })
        .inspect_err(|err| warn!("error inserting point {:?}: {err}", point.name))
        .map_err(WriteError::from)
}

fn collect_points<P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
    operation: &'static str,
) -> Result<Vec<Point>, PointStoreError> {
    let mut statement = connection.prepare(sql).map_err(query_error(operation))?;
    let rows = statement
        .query_map(params, point_from_row)
        .map_err(query_error(operation))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(query_error(operation))
}

/// Missing values read back the way an unset column would: an empty name
/// and zero for numbers.
fn point_from_row(row: &Row<'_>) -> rusqlite::Result<Point> {
    Ok(Point {
        id: Some(row.get(0)?),
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        latitude: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
        longitude: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
        elevation: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
    })
}

fn query_error(operation: &'static str) -> impl Fn(rusqlite::Error) -> PointStoreError {
    move |source| PointStoreError::Query { operation, source }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
