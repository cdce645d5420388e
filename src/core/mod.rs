//! Core catalog functionality

pub mod admin;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod grouped;
pub mod indexer;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod pagination;
pub mod prepare;
pub mod render;
pub mod sort;
pub mod state;

pub use error::CatalogError;

/// Returns the current version of the `course-catalog` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
