//! End-to-end chart requests.
//!
//! A [`StarChartPipeline`] holds the long-lived collaborators (catalog store,
//! ephemeris, geocoder, configuration) and turns a [`ChartRequest`] into PNG
//! bytes. Each request runs synchronously on the caller's thread; the only
//! shared state is the catalog, which loads once and is then read-only.

use std::sync::Arc;

use ephemeris::{EphemerisProvider, ObservationInstant, ObserverLocation, SiderealEphemeris};
use log::{info, warn};
use starfield::{CatalogStore, StarCatalog};

use crate::config::SkyChartConfig;
use crate::constellation::resolve_edges;
use crate::error::Result;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::horizon::compute_visible_stars;
use crate::render::ChartRenderer;

/// One chart to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    /// Place name handed to the geocoder
    pub location: String,
    pub when: ObservationInstant,
    pub transparent: bool,
}

/// Something that did not stop the chart but the caller should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    /// The place name did not geocode; the chart uses `fallback` instead.
    LocationUnresolved {
        query: String,
        reason: String,
        fallback: ObserverLocation,
    },
    /// Stars between `ceiling` and `limit` were dropped when the catalog loaded.
    LimitBeyondCatalogCeiling { limit: f64, ceiling: f64 },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::LocationUnresolved {
                query,
                reason,
                fallback,
            } => write!(
                f,
                "location '{query}' could not be resolved ({reason}); using {fallback}"
            ),
            RenderWarning::LimitBeyondCatalogCeiling { limit, ceiling } => write!(
                f,
                "limiting magnitude {limit} is fainter than the catalog ceiling {ceiling}; \
                 stars fainter than {ceiling} are not charted"
            ),
        }
    }
}

/// A finished chart.
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub png: Vec<u8>,
    /// The observer the chart was computed for
    pub observer: ObserverLocation,
    pub warnings: Vec<RenderWarning>,
    pub star_count: usize,
    pub edge_count: usize,
}

type BoxedEphemeris = Box<dyn EphemerisProvider + Send + Sync>;
type BoxedGeocoder = Box<dyn Geocoder + Send + Sync>;

pub struct StarChartPipeline {
    catalog: Arc<CatalogStore>,
    ephemeris: BoxedEphemeris,
    geocoder: BoxedGeocoder,
    renderer: ChartRenderer,
    config: SkyChartConfig,
}

impl StarChartPipeline {
    pub fn new(
        catalog: Arc<CatalogStore>,
        ephemeris: BoxedEphemeris,
        geocoder: BoxedGeocoder,
        config: SkyChartConfig,
    ) -> Self {
        Self {
            catalog,
            ephemeris,
            geocoder,
            renderer: ChartRenderer::new(config.render.clone()),
            config,
        }
    }

    /// Pipeline with the built-in sidereal ephemeris and Nominatim geocoding.
    pub fn from_config(config: SkyChartConfig) -> Self {
        let catalog = Arc::new(CatalogStore::new(config.catalog.to_sources()));
        let geocoder = NominatimGeocoder::new(&config.geocoder);
        Self::new(
            catalog,
            Box::new(SiderealEphemeris::new()),
            Box::new(geocoder),
            config,
        )
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub fn config(&self) -> &SkyChartConfig {
        &self.config
    }

    /// Geocode a place name, falling back to the configured observer.
    pub fn locate(&self, query: &str) -> (ObserverLocation, Option<RenderWarning>) {
        match self.geocoder.geocode(query) {
            Ok(location) => (location, None),
            Err(e) => {
                let fallback = self.config.fallback_location;
                warn!("{e}; falling back to {fallback}");
                (
                    fallback,
                    Some(RenderWarning::LocationUnresolved {
                        query: e.query,
                        reason: e.reason,
                        fallback,
                    }),
                )
            }
        }
    }

    /// Draw the chart for a named place.
    pub fn render(&self, request: &ChartRequest) -> Result<ChartOutput> {
        let (observer, warning) = self.locate(&request.location);
        let mut output = self.render_at(observer, &request.when, request.transparent)?;
        if let Some(warning) = warning {
            output.warnings.insert(0, warning);
        }
        Ok(output)
    }

    /// Draw the chart for an observer that is already known.
    pub fn render_at(
        &self,
        observer: ObserverLocation,
        when: &ObservationInstant,
        transparent: bool,
    ) -> Result<ChartOutput> {
        let mut warnings = Vec::new();
        let limit = self.config.limiting_magnitude;
        if let Some(ceiling) = self.config.ceiling_below_limit() {
            warn!("Limiting magnitude {limit} exceeds catalog ceiling {ceiling}");
            warnings.push(RenderWarning::LimitBeyondCatalogCeiling { limit, ceiling });
        }

        let catalog = self.catalog.load()?;
        let visible = compute_visible_stars(
            &*self.ephemeris,
            catalog.stars(),
            &observer,
            when,
            limit,
        )?;
        let edges = resolve_edges(catalog, catalog.edges(), &visible, limit);
        let png = self.renderer.render(&visible, &edges, transparent)?;

        info!(
            "Chart for {} at {}: {} stars, {} segments",
            observer,
            when,
            visible.len(),
            edges.len()
        );

        Ok(ChartOutput {
            png,
            observer,
            warnings,
            star_count: visible.len(),
            edge_count: edges.len(),
        })
    }
}
