//! Test-only helpers shared by unit tests.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use tempfile::TempDir;

use crate::Point;

/// Temporary data directory that lives as long as the returned guard.
pub(crate) fn temp_data_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

/// Make the storage engine abort every insert of a point named `name`.
pub(crate) fn reject_inserts_named(database: &Utf8Path, name: &str) {
    let connection = Connection::open(database.as_std_path()).expect("open database");
    connection
        .execute_batch(&format!(
            "CREATE TRIGGER reject_named_insert BEFORE INSERT ON points
             WHEN NEW.name = '{}'
             BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;",
            name.replace('\'', "''")
        ))
        .expect("install rejecting trigger");
}

pub(crate) fn eiffel_tower() -> Point {
    Point::new("Eiffel Tower", 48.8584, 2.2945, 330)
}

pub(crate) fn arc_de_triomphe() -> Point {
    Point::new("Arc de Triomphe", 48.8738, 2.2950, 50)
}

pub(crate) fn tokyo_tower() -> Point {
    Point::new("Tokyo Tower", 35.6586, 139.7454, 150)
}
