//! Constellation stick-figure line files.
//!
//! Each line of the file reads `name count id1 id2 id3 id4 ...`: a
//! constellation abbreviation, the declared number of segments, then star
//! identifiers consumed two at a time as segment endpoints.

use std::path::Path;

use log::debug;

/// One constellation and its line segments as catalog identifier pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constellation {
    pub name: String,
    /// Segment count as written in the file; not trusted for pairing
    pub declared_count: usize,
    pub edges: Vec<(u32, u32)>,
}

/// A single segment between two catalog identifiers.
///
/// The identifiers are references into the star catalog that are not
/// guaranteed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationEdge<'a> {
    pub constellation: &'a str,
    pub star_a: u32,
    pub star_b: u32,
}

impl Constellation {
    /// Iterate this constellation's segments as [`ConstellationEdge`]s.
    pub fn edges(&self) -> impl Iterator<Item = ConstellationEdge<'_>> {
        self.edges.iter().map(move |&(star_a, star_b)| ConstellationEdge {
            constellation: &self.name,
            star_a,
            star_b,
        })
    }
}

/// Parse a single line of a constellation file.
///
/// Returns `None` for lines with fewer than three tokens or with tokens that
/// are not integers. A trailing unpaired identifier is dropped.
pub fn parse_constellation_line(line: &str) -> Option<Constellation> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }

    let declared_count = parts[1].parse::<usize>().ok()?;
    let ids = parts[2..]
        .iter()
        .map(|token| token.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    let edges: Vec<(u32, u32)> = ids.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();

    if edges.len() != declared_count {
        debug!(
            "Constellation {} declares {} segments but lists {}",
            parts[0],
            declared_count,
            edges.len()
        );
    }

    Some(Constellation {
        name: parts[0].to_string(),
        declared_count,
        edges,
    })
}

/// Parse a whole constellation file, skipping malformed lines.
pub fn parse_constellation_lines(text: &str) -> Vec<Constellation> {
    let mut constellations = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_constellation_line(line) {
            Some(constellation) => constellations.push(constellation),
            None => debug!("Skipping malformed constellation line {}", line_no + 1),
        }
    }
    constellations
}

/// Read and parse a constellation file from disk.
pub fn read_constellation_file(path: &Path) -> std::io::Result<Vec<Constellation>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_constellation_lines(&text))
}
