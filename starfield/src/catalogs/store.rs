use std::collections::HashMap;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;

use super::constellations::read_constellation_file;
use super::hipparcos::parse_catalog;
use super::{Constellation, ConstellationEdge, LookupError, StarCatalog, StarRecord};
use crate::data::{read_source, CatalogSources};
use crate::error::{CatalogError, Result};

/// Offset of the first record with an identifier, and how many records share it.
#[derive(Debug, Clone, Copy)]
struct IndexSlot {
    first: usize,
    count: usize,
}

/// Loaded star records and constellation lines with an identifier index.
///
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stars: Vec<StarRecord>,
    index: HashMap<u32, IndexSlot>,
    constellations: Vec<Constellation>,
}

impl Catalog {
    pub fn new(stars: Vec<StarRecord>, constellations: Vec<Constellation>) -> Self {
        let mut index: HashMap<u32, IndexSlot> = HashMap::with_capacity(stars.len());
        for (offset, star) in stars.iter().enumerate() {
            index
                .entry(star.id)
                .and_modify(|slot| slot.count += 1)
                .or_insert(IndexSlot {
                    first: offset,
                    count: 1,
                });
        }

        let duplicates = index.values().filter(|slot| slot.count > 1).count();
        if duplicates > 0 {
            warn!("{duplicates} catalog identifiers occur more than once");
        }

        Self {
            stars,
            index,
            constellations,
        }
    }

    /// Look up a star by identifier.
    ///
    /// Never fails for unknown identifiers; it returns `None` so callers can
    /// skip whatever referenced the star.
    pub fn lookup(&self, id: u32) -> Option<&StarRecord> {
        self.index.get(&id).map(|slot| &self.stars[slot.first])
    }

    pub fn constellations(&self) -> &[Constellation] {
        &self.constellations
    }

    /// All constellation segments, flattened in file order.
    pub fn edges(&self) -> impl Iterator<Item = ConstellationEdge<'_>> {
        self.constellations.iter().flat_map(Constellation::edges)
    }
}

impl StarCatalog for Catalog {
    type Star = StarRecord;

    fn get_star(&self, id: u32) -> Option<&StarRecord> {
        self.lookup(id)
    }

    fn index_of(&self, id: u32) -> std::result::Result<usize, LookupError> {
        match self.index.get(&id) {
            None => Err(LookupError::NotFound(id)),
            Some(slot) if slot.count > 1 => Err(LookupError::Ambiguous {
                id,
                count: slot.count,
            }),
            Some(slot) => Ok(slot.first),
        }
    }

    fn stars(&self) -> &[StarRecord] {
        &self.stars
    }
}

/// Load stars from the first readable source, then the constellation lines.
///
/// A source that cannot be read or yields no stars moves on to the next one.
/// The constellation file is decorative: failing to read it leaves the
/// catalog without stick figures.
pub fn load_catalog(sources: &CatalogSources) -> Result<Catalog> {
    let mut attempts = Vec::new();
    let mut stars = None;

    for source in &sources.star_sources {
        let parsed = read_source(source, &sources.cache_dir, sources.download_timeout)
            .map(|text| parse_catalog(&text, sources.magnitude_ceiling))
            .and_then(|parsed| {
                if parsed.is_empty() {
                    Err(CatalogError::Empty(source.to_string()))
                } else {
                    Ok(parsed)
                }
            });

        match parsed {
            Ok(parsed) => {
                info!("Loaded {} stars from {}", parsed.len(), source);
                stars = Some(parsed);
                break;
            }
            Err(e) => {
                warn!("Star source {source} unavailable: {e}");
                attempts.push(e.to_string());
            }
        }
    }

    let stars = stars.ok_or(CatalogError::Unavailable { attempts })?;

    let constellations = match &sources.constellation_file {
        Some(path) => match read_constellation_file(path) {
            Ok(constellations) => {
                info!(
                    "Loaded {} constellations from {}",
                    constellations.len(),
                    path.display()
                );
                constellations
            }
            Err(e) => {
                warn!(
                    "Constellation file {} unreadable, charting stars only: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Ok(Catalog::new(stars, constellations))
}

/// Process-wide catalog cache with one-time initialization.
///
/// `load` may be called concurrently; exactly one caller performs the load
/// while the others block and then observe the finished catalog. A failed
/// load leaves the store empty so a later call can retry.
#[derive(Debug)]
pub struct CatalogStore {
    sources: CatalogSources,
    catalog: OnceCell<Catalog>,
}

impl CatalogStore {
    pub fn new(sources: CatalogSources) -> Self {
        Self {
            sources,
            catalog: OnceCell::new(),
        }
    }

    /// A store that is already loaded with the given catalog.
    pub fn preloaded(catalog: Catalog) -> Self {
        Self {
            sources: CatalogSources {
                star_sources: Vec::new(),
                constellation_file: None,
                ..CatalogSources::default()
            },
            catalog: OnceCell::with_value(catalog),
        }
    }

    pub fn sources(&self) -> &CatalogSources {
        &self.sources
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// Return the catalog, loading it on first use.
    pub fn load(&self) -> Result<&Catalog> {
        if let Some(catalog) = self.catalog.get() {
            debug!("Catalog cache hit");
            return Ok(catalog);
        }
        self.catalog.get_or_try_init(|| load_catalog(&self.sources))
    }
}
