//! Star catalog record parsing.
//!
//! Two layouts are understood:
//!
//! - The Hipparcos main catalog (`hip_main.dat`), pipe delimited. The fields
//!   used are HIP number (1), Vmag (5), RAdeg (8), DEdeg (9) and Plx (11).
//! - A plain table of `id ra dec mag [parallax]`, separated by commas or
//!   whitespace, with `#` starting a comment line.
//!
//! Rows that lack coordinates or a magnitude are skipped rather than treated
//! as errors; the Hipparcos catalog has a few hundred of them.

use log::debug;

use super::StarRecord;

const HIP_ID: usize = 1;
const HIP_VMAG: usize = 5;
const HIP_RA_DEG: usize = 8;
const HIP_DEC_DEG: usize = 9;
const HIP_PARALLAX: usize = 11;

/// Catalog text layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Hipparcos,
    Plain,
}

impl CatalogFormat {
    /// Guess the layout from the first data line.
    pub fn detect(text: &str) -> Self {
        let first = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'));
        match first {
            Some(line) if line.contains('|') => CatalogFormat::Hipparcos,
            _ => CatalogFormat::Plain,
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&&str>) -> Option<T> {
    field.map(|f| f.trim()).filter(|f| !f.is_empty())?.parse().ok()
}

/// Parse one `hip_main.dat` record.
pub fn parse_hipparcos_line(line: &str) -> Option<StarRecord> {
    let fields: Vec<&str> = line.split('|').collect();

    let id = parse_field::<u32>(fields.get(HIP_ID))?;
    let magnitude = parse_field::<f64>(fields.get(HIP_VMAG))?;
    let ra_deg = parse_field::<f64>(fields.get(HIP_RA_DEG))?;
    let dec_deg = parse_field::<f64>(fields.get(HIP_DEC_DEG))?;

    let mut record = StarRecord::new(id, ra_deg, dec_deg, magnitude);
    record.parallax_mas = parse_field::<f64>(fields.get(HIP_PARALLAX));
    Some(record)
}

/// Parse one plain `id ra dec mag [parallax]` record.
pub fn parse_plain_line(line: &str) -> Option<StarRecord> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = if line.contains(',') {
        line.split(',').collect()
    } else {
        line.split_whitespace().collect()
    };
    if fields.len() < 4 {
        return None;
    }

    let id = parse_field::<u32>(fields.first())?;
    let ra_deg = parse_field::<f64>(fields.get(1))?;
    let dec_deg = parse_field::<f64>(fields.get(2))?;
    let magnitude = parse_field::<f64>(fields.get(3))?;

    let mut record = StarRecord::new(id, ra_deg, dec_deg, magnitude);
    record.parallax_mas = parse_field::<f64>(fields.get(4));
    Some(record)
}

/// Parse a full catalog text, keeping only stars at or brighter than
/// `magnitude_ceiling` when one is given.
pub fn parse_catalog(text: &str, magnitude_ceiling: Option<f64>) -> Vec<StarRecord> {
    let format = CatalogFormat::detect(text);
    let parse_line: fn(&str) -> Option<StarRecord> = match format {
        CatalogFormat::Hipparcos => parse_hipparcos_line,
        CatalogFormat::Plain => parse_plain_line,
    };

    let mut skipped = 0usize;
    let mut too_faint = 0usize;
    let mut stars = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some(star) => {
                if magnitude_ceiling.is_some_and(|ceiling| star.magnitude > ceiling) {
                    too_faint += 1;
                } else {
                    stars.push(star);
                }
            }
            None => skipped += 1,
        }
    }

    debug!(
        "Parsed {:?} catalog: {} stars kept, {} fainter than ceiling, {} rows skipped",
        format,
        stars.len(),
        too_faint,
        skipped
    );

    stars
}
