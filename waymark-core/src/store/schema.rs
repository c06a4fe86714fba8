//! Schema creation and version tracking for the points table.

use log::debug;
use rusqlite::{Connection, Error as SqliteError, Transaction, TransactionBehavior};
use thiserror::Error;

/// Name of the table holding persisted points.
pub const POINTS_TABLE: &str = "points";

/// Schema version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// What [`initialise_schema`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaOutcome {
    /// A fresh database received the current schema.
    Created,
    /// The database already carried the current version.
    Current,
    /// Upgrade steps ran from the recorded version.
    Upgraded { from: i64 },
}

/// Bring the database schema to [`SCHEMA_VERSION`].
///
/// Runs inside one immediate transaction so concurrent openers observe
/// either no schema or the complete one. Databases written by a newer
/// version are rejected rather than downgraded.
pub(crate) fn initialise_schema(
    connection: &mut Connection,
) -> Result<SchemaOutcome, SchemaError> {
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    let found: i64 = transaction
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    let outcome = match found {
        0 => {
            create_points_table(&transaction)?;
            record_version(&transaction)?;
            SchemaOutcome::Created
        }
        SCHEMA_VERSION => SchemaOutcome::Current,
        older if (1..SCHEMA_VERSION).contains(&older) => {
            for version in (older + 1)..=SCHEMA_VERSION {
                upgrade_to(&transaction, version)?;
            }
            record_version(&transaction)?;
            SchemaOutcome::Upgraded { from: older }
        }
        other => {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found: other,
            });
        }
    };

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    Ok(outcome)
}

fn create_points_table(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create points table",
        "CREATE TABLE IF NOT EXISTS points (
            id INTEGER PRIMARY KEY,
            name TEXT,
            latitude REAL,
            longitude REAL,
            elevation INTEGER
        )",
    )
}

/// Apply the changes introduced by `version`.
///
/// Version 1 is the initial layout, so no step is registered yet.
fn upgrade_to(_transaction: &Transaction<'_>, version: i64) -> Result<(), SchemaError> {
    debug!("no migration registered for schema version {version}");
    Ok(())
}

fn record_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    transaction
        .pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|source| SchemaError::Migration {
            step: "record schema version",
            source,
        })
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised while creating or upgrading the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A schema step failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was written by an unknown schema version.
    #[error("expected schema version {expected} or older but found {found}")]
    VersionMismatch {
        /// Newest version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        Connection::open_in_memory().expect("open in-memory database")
    }

    fn user_version(connection: &Connection) -> i64 {
        connection
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("read user_version")
    }

    fn column_names(connection: &Connection) -> Vec<String> {
        let mut statement = connection
            .prepare("SELECT name FROM pragma_table_info('points') ORDER BY cid")
            .expect("prepare table info");
        statement
            .query_map([], |row| row.get(0))
            .expect("query table info")
            .collect::<Result<_, _>>()
            .expect("collect columns")
    }

    #[rstest]
    fn creates_points_table_and_records_version(mut connection: Connection) {
        let outcome = initialise_schema(&mut connection).expect("initialise schema");

        assert_eq!(outcome, SchemaOutcome::Created);
        assert_eq!(user_version(&connection), SCHEMA_VERSION);
        assert_eq!(
            column_names(&connection),
            vec!["id", "name", "latitude", "longitude", "elevation"]
        );
    }

    #[rstest]
    fn second_initialisation_is_a_no_op(mut connection: Connection) {
        initialise_schema(&mut connection).expect("first initialisation");
        connection
            .execute(
                "INSERT INTO points (name, latitude, longitude, elevation) VALUES ('kept', 1.0, 2.0, 3)",
                [],
            )
            .expect("insert row");

        let outcome = initialise_schema(&mut connection).expect("second initialisation");

        assert_eq!(outcome, SchemaOutcome::Current);
        let rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))
            .expect("count rows");
        assert_eq!(rows, 1);
    }

    #[rstest]
    fn adopts_existing_points_table(mut connection: Connection) {
        connection
            .execute(
                "CREATE TABLE points (id INTEGER PRIMARY KEY, name TEXT, latitude REAL, longitude REAL, elevation INTEGER)",
                [],
            )
            .expect("pre-create table");

        let outcome = initialise_schema(&mut connection).expect("initialise schema");

        assert_eq!(outcome, SchemaOutcome::Created);
        assert_eq!(user_version(&connection), SCHEMA_VERSION);
    }

    #[rstest]
    #[case(SCHEMA_VERSION + 1)]
    #[case(-3)]
    fn rejects_unknown_versions(mut connection: Connection, #[case] found: i64) {
        connection
            .pragma_update(None, "user_version", found)
            .expect("set user_version");

        let error = initialise_schema(&mut connection).expect_err("unknown version should fail");

        assert!(matches!(
            error,
            SchemaError::VersionMismatch { expected, found: actual }
                if expected == SCHEMA_VERSION && actual == found
        ));
    }
}
