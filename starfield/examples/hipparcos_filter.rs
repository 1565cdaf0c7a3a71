//! Tool for shrinking a star catalog to the naked-eye stars a chart needs
//!
//! Reads a Hipparcos `hip_main.dat` (or a plain catalog, optionally gzipped),
//! keeps stars at or brighter than a magnitude threshold (default: 6.5) and
//! writes them as a plain `id ra dec mag [parallax]` table that the catalog
//! loader reads directly.
//!
//! Usage:
//!   cargo run --example hipparcos_filter -- [options]
//!
//! Options:
//!   --input PATH       Input catalog file or URL (defaults to the CDS Hipparcos copy)
//!   --output PATH      Output file path
//!   --magnitude FLOAT  Maximum magnitude threshold (default: 6.5)

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use starfield::catalogs::hipparcos::parse_catalog;
use starfield::data::{get_cache_dir, read_source, HIPPARCOS_URL};
use starfield::CatalogSource;

/// Filter a catalog source into a plain catalog file
fn filter_catalog<P: AsRef<Path>>(
    source: &CatalogSource,
    output_path: P,
    magnitude_limit: f64,
) -> Result<usize, Box<dyn std::error::Error>> {
    println!("Reading star catalog: {}", source);

    let text = read_source(source, &get_cache_dir(), Duration::from_secs(120))?;
    let processed_lines = text.lines().count();
    let stars = parse_catalog(&text, Some(magnitude_limit));

    let output_file = File::create(&output_path)?;
    let mut writer = BufWriter::new(output_file);
    writeln!(writer, "# id ra_deg dec_deg magnitude parallax_mas")?;
    for star in &stars {
        match star.parallax_mas {
            Some(parallax) => writeln!(
                writer,
                "{} {} {} {} {}",
                star.id, star.ra_deg, star.dec_deg, star.magnitude, parallax
            )?,
            None => writeln!(
                writer,
                "{} {} {} {}",
                star.id, star.ra_deg, star.dec_deg, star.magnitude
            )?,
        }
    }
    writer.flush()?;

    println!("Completed filtering:");
    println!("  Processed {} lines", processed_lines);
    println!(
        "  Kept {} stars with magnitude <= {}",
        stars.len(),
        magnitude_limit
    );
    println!("  Output written to: {}", output_path.as_ref().display());

    Ok(stars.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut input = None;
    let mut output_path = None;
    let mut magnitude_limit = 6.5;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                if i + 1 < args.len() {
                    input = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    return Err("Missing value for --input".into());
                }
            }
            "--output" => {
                if i + 1 < args.len() {
                    output_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    return Err("Missing value for --output".into());
                }
            }
            "--magnitude" => {
                if i + 1 < args.len() {
                    magnitude_limit = args[i + 1].parse()?;
                    i += 2;
                } else {
                    return Err("Missing value for --magnitude".into());
                }
            }
            _ => {
                println!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    println!("Star Catalog Filter Tool");
    println!("========================");

    let Some(output_path) = output_path else {
        println!("Usage:");
        println!("  cargo run --example hipparcos_filter -- --output <output_file> [--input <file_or_url>] [--magnitude <limit>]");
        println!();
        println!("Options:");
        println!("  --input PATH       Input catalog file or URL (default: CDS Hipparcos)");
        println!("  --output PATH      Output file path");
        println!("  --magnitude FLOAT  Maximum magnitude threshold (default: 6.5)");

        return Err("Missing required arguments".into());
    };

    let source = match input {
        Some(input) if input.starts_with("http://") || input.starts_with("https://") => {
            CatalogSource::url(input)
        }
        Some(input) => CatalogSource::file(input),
        None => CatalogSource::url(HIPPARCOS_URL),
    };

    filter_catalog(&source, output_path, magnitude_limit)?;

    Ok(())
}
