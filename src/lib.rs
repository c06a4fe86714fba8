//! Facade crate for the Waymark point store.
//!
//! This crate re-exports the core domain types, the SQLite-backed store and
//! the degree-space helpers used by region queries.

#![forbid(unsafe_code)]

pub use waymark_core::{
    AppContext, BatchFailure, BatchInsertError, BoundsMode, ConfigError, DATABASE_NAME,
    DegreeBounds, EARTH_RADIUS_METERS, METERS_PER_DEGREE, POINTS_TABLE, Point, PointStore,
    PointStoreError, SCHEMA_VERSION, SchemaError, StoreConfig, StoreHandle, WriteError,
    degrees_to_meters, meters_to_degrees,
};
