//! # slidetime
//!
//! Extract per-slide transition durations from PPTX presentations.
//!
//! A PPTX deck is a ZIP package holding one XML fragment per slide.
//! This library enumerates those fragments in numeric slide order,
//! reads the optional advance time of each slide's transition, and
//! collects the results into a two-column report ("number page",
//! "duration" in seconds) that can be written as an .xlsx spreadsheet
//! or rendered as JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slidetime::ExtractConfig;
//!
//! // Extract and write the spreadsheet report in one step
//! let config = ExtractConfig::new("deck.pptx", "slide_durations.xlsx");
//! slidetime::run(&config)?;
//!
//! // Or work with the report directly
//! let report = slidetime::extract_file("deck.pptx")?;
//! for row in &report.rows {
//!     println!("slide {}: {:?}", row.page, row.duration);
//! }
//! # Ok::<(), slidetime::Error>(())
//! ```

pub mod archive;
pub mod error;
pub mod report;
pub mod slides;
pub mod xlsx;

// Re-exports
pub use archive::PresentationArchive;
pub use error::{Error, Result};
pub use report::{DurationReport, DurationRow, JsonFormat, COLUMNS};
pub use slides::SlideEntry;

use std::path::{Path, PathBuf};

/// Explicit input and output paths for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Path of the presentation archive to read.
    pub input: PathBuf,
    /// Path of the spreadsheet report to write.
    pub output: PathBuf,
}

impl ExtractConfig {
    /// Create a config from input and output paths.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Extract slide durations from a presentation file.
pub fn extract_file(path: impl AsRef<Path>) -> Result<DurationReport> {
    let archive = PresentationArchive::open(path)?;
    extract(&archive)
}

/// Extract slide durations from presentation bytes.
pub fn extract_bytes(data: &[u8]) -> Result<DurationReport> {
    let archive = PresentationArchive::from_bytes(data.to_vec())?;
    extract(&archive)
}

/// Extract slide durations from an open archive.
///
/// Rows are numbered by rank after numeric sorting, starting at 1, so
/// the output numbering stays contiguous even when the archive's slide
/// ordinals are not. The first malformed slide entry aborts the whole
/// extraction.
pub fn extract(archive: &PresentationArchive) -> Result<DurationReport> {
    slides::slide_entries(archive)
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            let xml = archive.read_entry(&entry.path)?;
            let duration = slides::transition_duration(&entry.path, &xml)?;
            log::debug!("{}: duration {:?}", entry.path, duration);
            Ok(DurationRow {
                page: (rank + 1) as u32,
                duration,
            })
        })
        .collect()
}

/// Run a full extraction: read the input archive, then write the
/// report to the output path. Nothing is written when extraction
/// fails.
pub fn run(config: &ExtractConfig) -> Result<()> {
    let report = extract_file(&config.input)?;
    xlsx::write_report(&report, &config.output)
}
