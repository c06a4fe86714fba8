//! Geospatial point store for the Waymark engine.
//!
//! Points of interest (name, latitude, longitude, elevation) live in one
//! SQLite table. The store answers two queries: every point, and every point
//! inside an approximate square around a reference point.
#![forbid(unsafe_code)]

mod config;
mod context;
pub mod geometry;
mod point;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, DATABASE_NAME, StoreConfig};
pub use context::AppContext;
pub use geometry::{
    BoundsMode, DegreeBounds, EARTH_RADIUS_METERS, METERS_PER_DEGREE, degrees_to_meters,
    meters_to_degrees,
};
pub use point::Point;
pub use store::{
    BatchFailure, BatchInsertError, POINTS_TABLE, PointStore, PointStoreError, SCHEMA_VERSION,
    SchemaError, StoreHandle, WriteError,
};
