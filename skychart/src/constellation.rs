//! Constellation line selection.
//!
//! A segment is drawn only when both endpoints exist in the catalog, are no
//! dimmer than the limiting magnitude, and are above the horizon for this
//! request. Anything else about a segment (unknown star, duplicate identifier)
//! skips that segment and nothing more.

use log::debug;
use starfield::{ConstellationEdge, LookupError, StarCatalog, StarRecord};

use crate::horizon::VisibleStarSet;
use crate::render::projection::SkyPoint;

/// A constellation segment ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableEdge {
    pub constellation: String,
    pub from: SkyPoint,
    pub to: SkyPoint,
}

#[derive(Debug, Clone, Copy)]
enum Skip {
    Lookup(LookupError),
    TooFaint,
    BelowHorizon,
}

fn endpoint<C>(
    catalog: &C,
    id: u32,
    visible: &VisibleStarSet,
    limiting_magnitude: f64,
) -> Result<SkyPoint, Skip>
where
    C: StarCatalog<Star = StarRecord> + ?Sized,
{
    let star = catalog
        .get_star(id)
        .ok_or(Skip::Lookup(LookupError::NotFound(id)))?;
    if !(star.magnitude <= limiting_magnitude) {
        return Err(Skip::TooFaint);
    }
    let offset = catalog.index_of(id).map_err(Skip::Lookup)?;
    visible
        .get_by_catalog_index(offset)
        .map(|star| SkyPoint::from(&star.position))
        .ok_or(Skip::BelowHorizon)
}

fn resolve_edge<C>(
    catalog: &C,
    edge: &ConstellationEdge<'_>,
    visible: &VisibleStarSet,
    limiting_magnitude: f64,
) -> Result<DrawableEdge, Skip>
where
    C: StarCatalog<Star = StarRecord> + ?Sized,
{
    let from = endpoint(catalog, edge.star_a, visible, limiting_magnitude)?;
    let to = endpoint(catalog, edge.star_b, visible, limiting_magnitude)?;
    Ok(DrawableEdge {
        constellation: edge.constellation.to_string(),
        from,
        to,
    })
}

/// Select the drawable segments among `edges`, positioned from `visible`.
///
/// `visible` must have been computed from `catalog.stars()` so its original
/// indices are catalog offsets.
pub fn resolve_edges<'a, C, I>(
    catalog: &C,
    edges: I,
    visible: &VisibleStarSet,
    limiting_magnitude: f64,
) -> Vec<DrawableEdge>
where
    C: StarCatalog<Star = StarRecord> + ?Sized,
    I: IntoIterator<Item = ConstellationEdge<'a>>,
{
    let mut drawable = Vec::new();
    let (mut missing, mut faint, mut hidden) = (0usize, 0usize, 0usize);

    for edge in edges {
        match resolve_edge(catalog, &edge, visible, limiting_magnitude) {
            Ok(resolved) => drawable.push(resolved),
            Err(Skip::Lookup(e)) => {
                debug!("Skipping {} segment: {}", edge.constellation, e);
                missing += 1;
            }
            Err(Skip::TooFaint) => faint += 1,
            Err(Skip::BelowHorizon) => hidden += 1,
        }
    }

    debug!(
        "Resolved {} constellation segments ({} unresolved, {} too faint, {} below horizon)",
        drawable.len(),
        missing,
        faint,
        hidden
    );
    drawable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::filter_visible;
    use ephemeris::{HorizonPosition, UNKNOWN_DISTANCE_PC};
    use starfield::{Catalog, Constellation};

    fn position(star: &StarRecord, altitude_deg: f64) -> HorizonPosition {
        HorizonPosition {
            star_id: star.id,
            altitude_deg,
            azimuth_deg: f64::from(star.id),
            distance_pc: UNKNOWN_DISTANCE_PC,
        }
    }

    fn orion(edges: Vec<(u32, u32)>) -> Constellation {
        Constellation {
            name: "Ori".to_string(),
            declared_count: edges.len(),
            edges,
        }
    }

    /// Stars 1..=4 bright, star 5 faint; star 3 below the horizon.
    fn fixture(edges: Vec<(u32, u32)>) -> (Catalog, VisibleStarSet) {
        let stars = vec![
            StarRecord::new(1, 0.0, 0.0, 1.0),
            StarRecord::new(2, 0.0, 0.0, 2.0),
            StarRecord::new(3, 0.0, 0.0, 2.0),
            StarRecord::new(4, 0.0, 0.0, 3.0),
            StarRecord::new(5, 0.0, 0.0, 6.0),
        ];
        let altitudes = [30.0, 50.0, -10.0, 70.0, 20.0];
        let positions: Vec<HorizonPosition> = stars
            .iter()
            .zip(altitudes)
            .map(|(star, alt)| position(star, alt))
            .collect();

        let visible = filter_visible(&stars, &positions, 6.5);
        (Catalog::new(stars, vec![orion(edges)]), visible)
    }

    #[test]
    fn test_edge_uses_visible_positions() {
        let (catalog, visible) = fixture(vec![(1, 2)]);
        let edges = resolve_edges(&catalog, catalog.edges(), &visible, 6.5);
        assert_eq!(
            edges,
            vec![DrawableEdge {
                constellation: "Ori".to_string(),
                from: SkyPoint::new(1.0, 30.0),
                to: SkyPoint::new(2.0, 50.0),
            }]
        );
    }

    #[test]
    fn test_unresolvable_edges_skipped() {
        // Unknown star, below horizon, and a valid segment
        let (catalog, visible) = fixture(vec![(1, 99), (2, 3), (2, 4)]);
        let edges = resolve_edges(&catalog, catalog.edges(), &visible, 6.5);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, SkyPoint::new(4.0, 70.0));
    }

    #[test]
    fn test_stricter_limit_removes_faint_endpoint() {
        let (catalog, _) = fixture(vec![(4, 5), (1, 4)]);
        let stars = catalog.stars().to_vec();
        let positions: Vec<HorizonPosition> = stars.iter().map(|s| position(s, 45.0)).collect();

        let visible = filter_visible(&stars, &positions, 6.5);
        assert_eq!(resolve_edges(&catalog, catalog.edges(), &visible, 6.5).len(), 2);

        // Even if the caller's visible set still held star 5, the limit rules it out
        assert_eq!(resolve_edges(&catalog, catalog.edges(), &visible, 5.0).len(), 1);
    }

    #[test]
    fn test_removing_a_star_drops_its_edges() {
        let (full, visible) = fixture(vec![(1, 2), (2, 4), (4, 1)]);
        assert_eq!(resolve_edges(&full, full.edges(), &visible, 6.5).len(), 3);

        let without_two: Vec<StarRecord> =
            full.stars().iter().copied().filter(|s| s.id != 2).collect();
        let positions: Vec<HorizonPosition> =
            without_two.iter().map(|s| position(s, 45.0)).collect();
        let visible = filter_visible(&without_two, &positions, 6.5);
        let reduced = Catalog::new(without_two, full.constellations().to_vec());

        let edges = resolve_edges(&reduced, reduced.edges(), &visible, 6.5);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, SkyPoint::new(4.0, 45.0));
    }

    #[test]
    fn test_duplicate_identifier_skips_edge() {
        let stars = vec![
            StarRecord::new(7, 0.0, 0.0, 1.0),
            StarRecord::new(8, 0.0, 0.0, 1.0),
            StarRecord::new(7, 0.0, 0.0, 1.0),
        ];
        let positions: Vec<HorizonPosition> = stars.iter().map(|s| position(s, 45.0)).collect();
        let visible = filter_visible(&stars, &positions, 6.5);
        let catalog = Catalog::new(stars, vec![orion(vec![(7, 8), (8, 8)])]);

        let edges = resolve_edges(&catalog, catalog.edges(), &visible, 6.5);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, SkyPoint::new(8.0, 45.0));
    }
}
