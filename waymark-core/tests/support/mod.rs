//! Shared helpers for the point store integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::Connection;
use tempfile::TempDir;
use waymark_core::Point;

/// Temporary data directory that lives as long as the returned guard.
pub fn temp_data_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

/// Make the storage engine abort every insert of a point named `name`.
pub fn reject_inserts_named(database: &Utf8Path, name: &str) {
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

/// The three landmarks used throughout the behaviour scenarios.
pub fn landmarks() -> Vec<Point> {
    vec![
        Point::new("Eiffel Tower", 48.8584, 2.2945, 330),
        Point::new("Arc de Triomphe", 48.8738, 2.2950, 50),
        Point::new("Tokyo Tower", 35.6586, 139.7454, 150),
    ]
}

/// Sorted names of `points`, for order-independent assertions.
pub fn sorted_names(points: &[Point]) -> Vec<String> {
    let mut names: Vec<_> = points.iter().map(|point| point.name.clone()).collect();
    names.sort_unstable();
    names
}
