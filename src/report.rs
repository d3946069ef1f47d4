//! The report interchange contract: benchmark keys, their on-disk path
//! encoding, and the JSON estimate files.
//!
//! One report leaf lives at `<root>/<series>/<variant>/<size_exp>/new/`
//! holding a single `estimates.json` with body
//! `{"mean": {"point_estimate": <nanoseconds>}}`. The layout matches what
//! criterion writes under `target/criterion/`, so criterion runs are valid
//! producers of this format.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Literal directory name marking a report leaf.
pub const LEAF_DIR: &str = "new";

/// Estimate file name inside a leaf.
pub const ESTIMATE_FILE: &str = "estimates.json";

/// Largest accepted size exponent. Row counts are `2^size_exp` in a `u64`,
/// so anything above 63 cannot name a representable row count and is treated
/// as malformed wherever it appears.
pub const MAX_SIZE_EXP: u32 = 63;

/// Logical key of one benchmark report.
///
/// The triple uniquely identifies one report leaf; writing the same key
/// twice overwrites (last-write-wins), never merges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchmarkKey {
    pub series: String,
    pub variant: String,
    pub size_exp: u32,
}

fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty() || segment.contains(['/', '\\']) {
        return Err(BenchError::InvalidKey(segment.to_string()));
    }
    Ok(())
}

impl BenchmarkKey {
    pub fn new(series: impl Into<String>, variant: impl Into<String>, size_exp: u32) -> Result<Self> {
        let series = series.into();
        let variant = variant.into();
        check_segment(&series)?;
        check_segment(&variant)?;
        if size_exp > MAX_SIZE_EXP {
            return Err(BenchError::SizeExponentTooLarge(size_exp));
        }
        Ok(Self {
            series,
            variant,
            size_exp,
        })
    }

    /// Serialize the key to its leaf directory path, relative to a root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.series)
            .join(&self.variant)
            .join(self.size_exp.to_string())
            .join(LEAF_DIR)
    }

    /// Parse a leaf directory discovered under `root` back into its key.
    ///
    /// The leaf must be named [`LEAF_DIR`] and must have at least three
    /// ancestor segments below `root`; the segment before the leaf must be a
    /// non-negative integer no larger than [`MAX_SIZE_EXP`]. Anything else is
    /// malformed and yields an error,
    /// never a partial key. Leaves nested deeper than three segments are
    /// keyed by the last three, so foreign trees with extra grouping levels
    /// still parse.
    pub fn parse_leaf(root: &Path, leaf_dir: &Path) -> Result<Self> {
        let malformed = || BenchError::MalformedReportPath(leaf_dir.to_path_buf());

        let rel = leaf_dir.strip_prefix(root).map_err(|_| malformed())?;
        let mut segments = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(s) => {
                    segments.push(s.to_str().ok_or_else(malformed)?.to_string())
                }
                _ => return Err(malformed()),
            }
        }

        if segments.last().map(String::as_str) != Some(LEAF_DIR) || segments.len() < 4 {
            return Err(malformed());
        }

        let size_segment = &segments[segments.len() - 2];
        let size_exp: u32 = size_segment
            .parse()
            .ok()
            .filter(|&exp| exp <= MAX_SIZE_EXP)
            .ok_or_else(|| BenchError::MalformedSizeSegment {
                path: leaf_dir.to_path_buf(),
                segment: size_segment.clone(),
            })?;

        Ok(Self {
            series: segments[segments.len() - 4].clone(),
            variant: segments[segments.len() - 3].clone(),
            size_exp,
        })
    }
}

/// Mean point estimate in nanoseconds. Extra fields (criterion writes many)
/// are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanEstimate {
    pub point_estimate: f64,
}

/// Body of an `estimates.json` report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEstimate {
    pub mean: MeanEstimate,
}

/// Writer side of the report tree. Sole owner of the tree during a
/// benchmark run; aggregators only ever read it.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one estimate under `key`, replacing any prior report.
    ///
    /// The JSON is written to a temporary file in the leaf directory and
    /// renamed over `estimates.json`, so readers never observe a partial
    /// file. Returns the estimate file path.
    pub fn save(&self, key: &BenchmarkKey, mean_ns: f64) -> Result<PathBuf> {
        let leaf = self.root.join(key.relative_path());
        fs::create_dir_all(&leaf)?;

        let estimate = RawEstimate {
            mean: MeanEstimate {
                point_estimate: mean_ns,
            },
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&leaf)?;
        serde_json::to_writer(&mut tmp, &estimate)?;
        tmp.flush()?;

        let path = leaf.join(ESTIMATE_FILE);
        tmp.persist(&path).map_err(|e| BenchError::Io(e.error))?;
        Ok(path)
    }
}

/// Load and validate the estimate stored in one leaf directory.
pub fn load_estimate(leaf_dir: &Path) -> Result<RawEstimate> {
    let path = leaf_dir.join(ESTIMATE_FILE);
    let bytes = fs::read(&path).map_err(|e| BenchError::CorruptReport {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| BenchError::CorruptReport {
        path,
        reason: e.to_string(),
    })
}
