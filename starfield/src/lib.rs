//! Star catalog and constellation line storage.
//!
//! Loads a star catalog (Hipparcos `hip_main.dat` or a plain `id ra dec mag`
//! table) together with a Stellarium-style constellation line file, and keeps
//! the result in a [`CatalogStore`] that is initialized exactly once and then
//! shared read-only between render requests.

pub mod catalogs;
pub mod data;
mod error;

pub use catalogs::{
    Catalog, CatalogStore, Constellation, ConstellationEdge, LookupError, StarCatalog, StarRecord,
};
pub use data::{CatalogSource, CatalogSources};
pub use error::{CatalogError, Result};
