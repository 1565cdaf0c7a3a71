//! Horizon and brightness filtering of ephemeris output.
//!
//! The ephemeris provider turns every catalog star into a [`HorizonPosition`];
//! this module keeps the ones above the horizon and no dimmer than the limiting
//! magnitude, remembering where each survivor sat in the catalog so constellation
//! endpoints can be matched back to it.

use std::collections::HashMap;

use ephemeris::{EphemerisError, EphemerisProvider, HorizonPosition, ObservationInstant, ObserverLocation};
use log::debug;
use starfield::StarRecord;
use thiserror::Error;

/// Default brightness cutoff, roughly the naked-eye limit under a dark sky.
pub const DEFAULT_LIMITING_MAGNITUDE: f64 = 6.5;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("ephemeris computation failed: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error("ephemeris returned {got} positions for {expected} stars")]
    LengthMismatch { expected: usize, got: usize },

    #[error("ephemeris position {index} belongs to star {got}, expected star {expected}")]
    OrderMismatch { index: usize, expected: u32, got: u32 },
}

/// A star that survived both filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleStar {
    pub position: HorizonPosition,
    pub magnitude: f64,
}

/// Stars visible for one request, in catalog order.
///
/// `original_index()[k]` is the catalog offset of `stars()[k]`.
#[derive(Debug, Clone, Default)]
pub struct VisibleStarSet {
    stars: Vec<VisibleStar>,
    original_index: Vec<usize>,
    by_original: HashMap<usize, usize>,
}

impl VisibleStarSet {
    fn push(&mut self, star: VisibleStar, original: usize) {
        self.by_original.insert(original, self.stars.len());
        self.stars.push(star);
        self.original_index.push(original);
    }

    pub fn stars(&self) -> &[VisibleStar] {
        &self.stars
    }

    pub fn original_index(&self) -> &[usize] {
        &self.original_index
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisibleStar> {
        self.stars.iter()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// The visible entry for the star at a catalog offset, if it survived filtering.
    pub fn get_by_catalog_index(&self, catalog_index: usize) -> Option<&VisibleStar> {
        self.by_original
            .get(&catalog_index)
            .map(|&position| &self.stars[position])
    }
}

/// Apply the horizon filter, then the magnitude filter, to aligned arrays.
///
/// `stars[i]` and `positions[i]` must describe the same star. Altitude exactly
/// zero is below the horizon. A NaN altitude or magnitude fails its filter.
pub fn filter_visible(
    stars: &[StarRecord],
    positions: &[HorizonPosition],
    limiting_magnitude: f64,
) -> VisibleStarSet {
    let above_horizon: Vec<usize> = positions
        .iter()
        .enumerate()
        .filter(|(_, position)| position.altitude_deg > 0.0)
        .map(|(index, _)| index)
        .collect();

    let mut visible = VisibleStarSet::default();
    for &index in &above_horizon {
        let magnitude = stars[index].magnitude;
        if magnitude <= limiting_magnitude {
            visible.push(
                VisibleStar {
                    position: positions[index],
                    magnitude,
                },
                index,
            );
        }
    }

    debug!(
        "{} of {} stars above the horizon, {} at magnitude <= {}",
        above_horizon.len(),
        stars.len(),
        visible.len(),
        limiting_magnitude
    );
    visible
}

/// Compute horizontal positions for `stars` and keep the visible ones.
pub fn compute_visible_stars<P>(
    provider: &P,
    stars: &[StarRecord],
    observer: &ObserverLocation,
    when: &ObservationInstant,
    limiting_magnitude: f64,
) -> Result<VisibleStarSet, TransformError>
where
    P: EphemerisProvider + ?Sized,
{
    let positions = provider.horizon_positions(stars, observer, when)?;

    if positions.len() != stars.len() {
        return Err(TransformError::LengthMismatch {
            expected: stars.len(),
            got: positions.len(),
        });
    }
    if let Some((index, (star, position))) = stars
        .iter()
        .zip(&positions)
        .enumerate()
        .find(|(_, (star, position))| star.id != position.star_id)
    {
        return Err(TransformError::OrderMismatch {
            index,
            expected: star.id,
            got: position.star_id,
        });
    }

    Ok(filter_visible(stars, &positions, limiting_magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ephemeris::UNKNOWN_DISTANCE_PC;
    use rstest::rstest;

    fn position(star_id: u32, altitude_deg: f64) -> HorizonPosition {
        HorizonPosition {
            star_id,
            altitude_deg,
            azimuth_deg: 180.0,
            distance_pc: UNKNOWN_DISTANCE_PC,
        }
    }

    /// Provider that hands back canned positions.
    struct Canned(Vec<HorizonPosition>);

    impl EphemerisProvider for Canned {
        fn horizon_positions(
            &self,
            _stars: &[StarRecord],
            _observer: &ObserverLocation,
            _when: &ObservationInstant,
        ) -> ephemeris::Result<Vec<HorizonPosition>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl EphemerisProvider for Failing {
        fn horizon_positions(
            &self,
            stars: &[StarRecord],
            _observer: &ObserverLocation,
            _when: &ObservationInstant,
        ) -> ephemeris::Result<Vec<HorizonPosition>> {
            Err(EphemerisError::InvalidCoordinates {
                star_id: stars[0].id,
            })
        }
    }

    fn observer() -> ObserverLocation {
        ObserverLocation::new(39.9042, 116.4074).unwrap()
    }

    fn when() -> ObservationInstant {
        ObservationInstant::parse("2024-03-20T21:30:00+08:00").unwrap()
    }

    #[test]
    fn test_filters_keep_original_indices() {
        let stars = vec![
            StarRecord::new(1, 0.0, 0.0, 1.0),
            StarRecord::new(2, 0.0, 0.0, 2.0),
            StarRecord::new(3, 0.0, 0.0, 7.0),
            StarRecord::new(4, 0.0, 0.0, 3.0),
            StarRecord::new(5, 0.0, 0.0, 6.5),
        ];
        let positions = vec![
            position(1, 10.0),
            position(2, -5.0),
            position(3, 40.0),
            position(4, 0.0),
            position(5, 80.0),
        ];

        let visible = filter_visible(&stars, &positions, 6.5);
        assert_eq!(visible.original_index(), &[0, 4]);
        let ids: Vec<u32> = visible.iter().map(|s| s.position.star_id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(visible.get_by_catalog_index(4).unwrap().magnitude, 6.5);
        assert!(visible.get_by_catalog_index(2).is_none());
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(1e-9, true)]
    #[case(-1e-9, false)]
    #[case(f64::NAN, false)]
    fn test_horizon_boundary(#[case] altitude: f64, #[case] visible: bool) {
        let stars = [StarRecord::new(9, 0.0, 0.0, 1.0)];
        let set = filter_visible(&stars, &[position(9, altitude)], 6.5);
        assert_eq!(set.len() == 1, visible);
    }

    #[test]
    fn test_every_visible_star_within_limit() {
        let stars: Vec<StarRecord> = (0..40)
            .map(|i| StarRecord::new(i, 0.0, 0.0, -1.5 + f64::from(i) * 0.25))
            .collect();
        let positions: Vec<HorizonPosition> = (0..40)
            .map(|i| position(i, f64::from(i % 7) * 15.0 - 30.0))
            .collect();

        let limit = 4.0;
        let visible = filter_visible(&stars, &positions, limit);
        for (star, &original) in visible.iter().zip(visible.original_index()) {
            assert!(star.magnitude <= limit);
            assert!(star.position.altitude_deg > 0.0);
            assert_eq!(stars[original].id, star.position.star_id);
        }
        let expected = stars
            .iter()
            .zip(&positions)
            .filter(|(s, p)| p.altitude_deg > 0.0 && s.magnitude <= limit)
            .count();
        assert_eq!(visible.len(), expected);
    }

    #[test]
    fn test_provider_failure_is_transform_error() {
        let stars = [StarRecord::new(11, 0.0, 0.0, 1.0)];
        let err = compute_visible_stars(&Failing, &stars, &observer(), &when(), 6.5).unwrap_err();
        assert!(matches!(err, TransformError::Ephemeris(_)));
    }

    #[test]
    fn test_misaligned_provider_output_rejected() {
        let stars = [
            StarRecord::new(1, 0.0, 0.0, 1.0),
            StarRecord::new(2, 0.0, 0.0, 1.0),
        ];

        let short = Canned(vec![position(1, 10.0)]);
        assert!(matches!(
            compute_visible_stars(&short, &stars, &observer(), &when(), 6.5),
            Err(TransformError::LengthMismatch { expected: 2, got: 1 })
        ));

        let swapped = Canned(vec![position(2, 10.0), position(1, 10.0)]);
        assert!(matches!(
            compute_visible_stars(&swapped, &stars, &observer(), &when(), 6.5),
            Err(TransformError::OrderMismatch { index: 0, .. })
        ));
    }
}
