//! End-to-end chart rendering against small fixture catalogs.

use std::path::Path;
use std::sync::Arc;

use ephemeris::{
    EphemerisError, EphemerisProvider, HorizonPosition, ObservationInstant, ObserverLocation,
    SiderealEphemeris, UNKNOWN_DISTANCE_PC,
};
use image::RgbaImage;
use skychart::config::CatalogConfig;
use skychart::{
    ChartRequest, RenderConfig, RenderWarning, SkyChartConfig, SkyChartError, StarChartPipeline,
    StaticGeocoder, BEIJING,
};
use starfield::{CatalogSource, CatalogStore, StarRecord};
use tempfile::TempDir;
use test_helpers::{output_path, write_constellation_fixture, write_star_fixture};

const NAVY: [u8; 4] = [0x04, 0x1A, 0x40, 255];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Polaris, Kochab, and a far-southern star never visible from Beijing.
fn write_fixtures(dir: &Path) {
    write_star_fixture(
        dir,
        "stars.txt",
        &[
            (11767, 37.95, 89.26, 2.02),
            (72607, 222.68, 74.16, 2.07),
            (41037, 125.63, -80.0, 1.86),
        ],
    );
    write_constellation_fixture(
        dir,
        "lines.fab",
        &["UMi 2 11767 72607 11767 99999", "Oct 1 11767 41037", "bad"],
    );
}

fn config(dir: &Path) -> SkyChartConfig {
    SkyChartConfig {
        catalog: CatalogConfig {
            star_sources: vec![CatalogSource::file(dir.join("stars.txt"))],
            constellation_file: Some(dir.join("lines.fab")),
            cache_dir: Some(dir.join("cache")),
            ..CatalogConfig::default()
        },
        render: RenderConfig {
            figure_size_in: 2.0,
            dpi: 100,
            ..RenderConfig::default()
        },
        ..SkyChartConfig::default()
    }
}

fn pipeline_with(
    config: SkyChartConfig,
    ephemeris: Box<dyn EphemerisProvider + Send + Sync>,
) -> StarChartPipeline {
    let catalog = Arc::new(CatalogStore::new(config.catalog.to_sources()));
    let geocoder = StaticGeocoder::new().with_place("Beijing", BEIJING);
    StarChartPipeline::new(catalog, ephemeris, Box::new(geocoder), config)
}

fn request(location: &str, transparent: bool) -> ChartRequest {
    ChartRequest {
        location: location.to_string(),
        when: ObservationInstant::parse("2024-03-20T21:30:00+08:00").unwrap(),
        transparent,
    }
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

/// Puts every star at the same fixed spot in the sky.
struct FixedSky {
    altitude_deg: f64,
    azimuth_deg: f64,
}

impl EphemerisProvider for FixedSky {
    fn horizon_positions(
        &self,
        stars: &[StarRecord],
        _observer: &ObserverLocation,
        _when: &ObservationInstant,
    ) -> ephemeris::Result<Vec<HorizonPosition>> {
        Ok(stars
            .iter()
            .map(|star| HorizonPosition {
                star_id: star.id,
                altitude_deg: self.altitude_deg,
                azimuth_deg: self.azimuth_deg,
                distance_pc: UNKNOWN_DISTANCE_PC,
            })
            .collect())
    }
}

struct BrokenSky;

impl EphemerisProvider for BrokenSky {
    fn horizon_positions(
        &self,
        _stars: &[StarRecord],
        observer: &ObserverLocation,
        _when: &ObservationInstant,
    ) -> ephemeris::Result<Vec<HorizonPosition>> {
        Err(EphemerisError::InvalidObserver {
            latitude: observer.latitude,
            longitude: observer.longitude,
        })
    }
}

#[test]
fn test_circumpolar_chart_over_beijing() {
    init_logging();
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let pipeline = pipeline_with(config(dir.path()), Box::new(SiderealEphemeris::new()));

    let chart = pipeline.render(&request("Beijing", false)).unwrap();
    assert_eq!(chart.observer, BEIJING);
    assert!(chart.warnings.is_empty());
    // Polaris and Kochab never set at 40°N; the southern star never rises
    assert_eq!(chart.star_count, 2);
    // Only Polaris-Kochab survives: one unknown endpoint, one below the horizon
    assert_eq!(chart.edge_count, 1);

    std::fs::write(output_path("circumpolar_beijing.png"), &chart.png).unwrap();
}

#[test]
fn test_unresolved_location_falls_back_with_warning() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let pipeline = pipeline_with(config(dir.path()), Box::new(SiderealEphemeris::new()));

    let chart = pipeline.render(&request("Nowhereville", false)).unwrap();
    assert_eq!(chart.observer, BEIJING);
    assert!(!chart.png.is_empty());
    match chart.warnings.as_slice() {
        [RenderWarning::LocationUnresolved {
            query, fallback, ..
        }] => {
            assert_eq!(query, "Nowhereville");
            assert_eq!(*fallback, BEIJING);
        }
        other => panic!("expected one location warning, got {other:?}"),
    }
}

#[test]
fn test_background_policy() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let pipeline = pipeline_with(config(dir.path()), Box::new(SiderealEphemeris::new()));

    let opaque = decode(&pipeline.render(&request("Beijing", false)).unwrap().png);
    assert_eq!(opaque.get_pixel(0, 0).0, NAVY);
    assert_eq!(opaque.get_pixel(199, 0).0, NAVY);

    let clear = decode(&pipeline.render(&request("Beijing", true)).unwrap().png);
    assert_eq!(clear.get_pixel(0, 0).0[3], 0);
    assert_eq!(clear.get_pixel(199, 199).0[3], 0);
}

#[test]
fn test_star_at_45_degrees_east_is_right_of_centre() {
    let dir = TempDir::new().unwrap();
    write_star_fixture(dir.path(), "stars.txt", &[(1, 0.0, 0.0, 0.0)]);
    let mut config = config(dir.path());
    config.catalog.constellation_file = None;
    let pipeline = pipeline_with(
        config,
        Box::new(FixedSky {
            altitude_deg: 45.0,
            azimuth_deg: 90.0,
        }),
    );

    let chart = pipeline.render(&request("Beijing", false)).unwrap();
    assert_eq!(chart.star_count, 1);

    // 200 px canvas: radius 45 of 90 is 50 px from the centre, due east is +x
    let image = decode(&chart.png);
    assert_eq!(image.get_pixel(150, 100).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(50, 100).0, NAVY);
    assert_eq!(image.get_pixel(100, 50).0, NAVY);
}

#[test]
fn test_rendering_is_repeatable() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let pipeline = Arc::new(pipeline_with(
        config(dir.path()),
        Box::new(SiderealEphemeris::new()),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || pipeline.render(&request("Beijing", false)).unwrap().png)
        })
        .collect();
    let charts: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(charts.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_missing_catalog_fails_without_image() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(config(dir.path()), Box::new(SiderealEphemeris::new()));

    let err = pipeline.render(&request("Beijing", false)).unwrap_err();
    assert!(matches!(err, SkyChartError::CatalogUnavailable(_)));
    assert!(!pipeline.catalog().is_loaded());
}

#[test]
fn test_missing_constellation_file_draws_stars_only() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    std::fs::remove_file(dir.path().join("lines.fab")).unwrap();
    let pipeline = pipeline_with(config(dir.path()), Box::new(SiderealEphemeris::new()));

    let chart = pipeline.render(&request("Beijing", false)).unwrap();
    assert_eq!(chart.star_count, 2);
    assert_eq!(chart.edge_count, 0);
}

#[test]
fn test_ephemeris_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let pipeline = pipeline_with(config(dir.path()), Box::new(BrokenSky));

    let err = pipeline.render(&request("Beijing", false)).unwrap_err();
    assert!(matches!(err, SkyChartError::TransformFailed(_)));
    assert!(err.to_string().starts_with("transform failed"));
}

#[test]
fn test_limit_beyond_ceiling_warns() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let mut config = config(dir.path());
    config.limiting_magnitude = 8.0;
    let pipeline = pipeline_with(config, Box::new(SiderealEphemeris::new()));

    let chart = pipeline.render(&request("Beijing", false)).unwrap();
    assert!(chart
        .warnings
        .contains(&RenderWarning::LimitBeyondCatalogCeiling {
            limit: 8.0,
            ceiling: 6.5
        }));
}

#[test]
fn test_stricter_limit_hides_stars_and_lines() {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    let mut config = config(dir.path());
    config.limiting_magnitude = 2.05;
    let pipeline = pipeline_with(config, Box::new(SiderealEphemeris::new()));

    let chart = pipeline.render(&request("Beijing", false)).unwrap();
    // Kochab (2.07) drops out and takes the only drawable line with it
    assert_eq!(chart.star_count, 1);
    assert_eq!(chart.edge_count, 0);
}
