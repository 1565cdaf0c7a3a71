//! Star catalogs module
//!
//! This module provides the catalog record types, the parsers for the
//! supported catalog and constellation file formats, and the shared
//! [`CatalogStore`].

pub mod constellations;
pub mod hipparcos;
mod store;

pub use constellations::{Constellation, ConstellationEdge};
pub use store::{Catalog, CatalogStore};

use thiserror::Error;

/// A single catalog entry in fixed equatorial coordinates.
///
/// Records are immutable once loaded; the catalog store owns them for its
/// whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    /// Catalog identifier (HIP number for Hipparcos)
    pub id: u32,
    /// Right ascension in degrees (J2000)
    pub ra_deg: f64,
    /// Declination in degrees (J2000)
    pub dec_deg: f64,
    /// Visual magnitude (smaller is brighter)
    pub magnitude: f64,
    /// Trigonometric parallax in milliarcseconds, when the catalog provides one
    pub parallax_mas: Option<f64>,
}

impl StarRecord {
    pub fn new(id: u32, ra_deg: f64, dec_deg: f64, magnitude: f64) -> Self {
        Self {
            id,
            ra_deg,
            dec_deg,
            magnitude,
            parallax_mas: None,
        }
    }

    pub fn with_parallax(mut self, parallax_mas: f64) -> Self {
        self.parallax_mas = Some(parallax_mas);
        self
    }
}

/// Why an identifier did not map to a single catalog offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("star {0} is not in the catalog")]
    NotFound(u32),

    /// The identifier occurs more than once, so its offset is ambiguous.
    #[error("star {id} appears {count} times in the catalog")]
    Ambiguous { id: u32, count: usize },
}

/// Generic trait for all star catalogs
pub trait StarCatalog {
    /// Star entry type for this catalog
    type Star;

    /// Get a star by its identifier. Missing identifiers yield `None`.
    fn get_star(&self, id: u32) -> Option<&Self::Star>;

    /// Offset of the star with this identifier within [`StarCatalog::stars`].
    fn index_of(&self, id: u32) -> Result<usize, LookupError>;

    /// All stars, in catalog iteration order
    fn stars(&self) -> &[Self::Star];

    /// Get the number of stars in the catalog
    fn len(&self) -> usize {
        self.stars().len()
    }

    /// Check if the catalog is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
