//! Course catalog library
//! Normalization, indexing, faceted filtering, sorting, pagination and the
//! admin write path shared by the `catalog` CLI and its tests.

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
