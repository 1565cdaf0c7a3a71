//! Shared test infrastructure for the sky chart workspace.
//!
//! Locates the workspace root, provides a `test_output/` directory for
//! rendered charts kept for manual inspection, and writes small catalog and
//! constellation fixture files in the formats the catalog loader reads.
//!
//! ```rust
//! use test_helpers::{output_path, write_star_fixture};
//!
//! let dir = std::env::temp_dir().join("test_helpers_doc");
//! std::fs::create_dir_all(&dir).unwrap();
//! let catalog = write_star_fixture(&dir, "stars.txt", &[(1, 88.79, 7.41, 0.5)]);
//! assert!(catalog.exists());
//! assert!(output_path("chart.png").starts_with(test_helpers::get_output_dir()));
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No `Cargo.toml` with a `[workspace]` section above the current directory.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Walk up from the current directory to the workspace `Cargo.toml`.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<project_root>/test_output/`, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path to a file inside the test output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Write a plain `id ra dec mag` star catalog into `dir` and return its path.
pub fn write_star_fixture(dir: &Path, name: &str, stars: &[(u32, f64, f64, f64)]) -> PathBuf {
    let mut text = String::from("# id ra_deg dec_deg magnitude\n");
    for (id, ra, dec, mag) in stars {
        text.push_str(&format!("{id} {ra} {dec} {mag}\n"));
    }
    let path = dir.join(name);
    std::fs::write(&path, text).expect("Failed to write star fixture");
    path
}

/// Write a constellation line file (`name count id1 id2 ...` per line) into `dir`.
pub fn write_constellation_fixture(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).expect("Failed to write constellation fixture");
    path
}
