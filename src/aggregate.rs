//! Report discovery and aggregation.
//!
//! Walks a report tree, decodes every leaf path back into its key, loads the
//! stored estimate and emits flat records. Aggregation is per-leaf isolated:
//! a malformed path or corrupt estimate fails that leaf only and the walk
//! always completes.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::BenchError;
use crate::report::{self, BenchmarkKey, LEAF_DIR, MAX_SIZE_EXP};

/// One aggregated measurement, recomputed on every pass and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    /// Series that produced the report (implementation/suite name).
    pub task: String,
    /// Measured configuration within the series.
    pub variant: String,
    /// Log2 of the row count; the row count itself is `2^size_exp`.
    pub size_exp: u32,
    /// Mean decode cost in milliseconds.
    pub time_ms: f64,
}

impl AggregatedRecord {
    pub fn rows(&self) -> u64 {
        // Key parsing caps size_exp at MAX_SIZE_EXP; clamp again so a
        // hand-built record can never overflow the shift.
        1u64 << self.size_exp.min(MAX_SIZE_EXP)
    }
}

/// A leaf that could not be aggregated, with the reason.
#[derive(Debug)]
pub struct LeafFailure {
    pub path: PathBuf,
    pub error: BenchError,
}

/// Result of one aggregation pass.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub records: Vec<AggregatedRecord>,
    pub failures: Vec<LeafFailure>,
}

impl Aggregation {
    fn leaf_failed(&mut self, path: &Path, error: BenchError) {
        warn!("skipping report leaf {}: {error}", path.display());
        self.failures.push(LeafFailure {
            path: path.to_path_buf(),
            error,
        });
    }

    /// Concatenate another aggregation into this one. No deduplication: keys
    /// from independent roots are kept side by side and disambiguated
    /// downstream via [`qualify`] where needed.
    pub fn merge(&mut self, other: Aggregation) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
    }
}

/// Recursively collect every report leaf under `root`.
///
/// Every directory literally named `new` is a candidate leaf. The walk order
/// is not deterministic; callers needing stable chart x-ordering sort by
/// `size_exp` afterwards.
pub fn collect(root: &Path) -> Aggregation {
    let mut out = Aggregation::default();

    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("walk error under {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_dir() || entry.file_name() != LEAF_DIR {
            continue;
        }

        let leaf = entry.path();
        let key = match BenchmarkKey::parse_leaf(root, leaf) {
            Ok(key) => key,
            Err(e) => {
                out.leaf_failed(leaf, e);
                continue;
            }
        };

        match report::load_estimate(leaf) {
            Ok(estimate) => out.records.push(AggregatedRecord {
                task: key.series,
                variant: key.variant,
                size_exp: key.size_exp,
                time_ms: estimate.mean.point_estimate / 1000.0,
            }),
            Err(e) => out.leaf_failed(leaf, e),
        }
    }

    out
}

/// Collect and merge several independent report roots.
pub fn collect_all<'a>(roots: impl IntoIterator<Item = &'a Path>) -> Aggregation {
    let mut out = Aggregation::default();
    for root in roots {
        out.merge(collect(root));
    }
    out
}

/// Disambiguate identical variant names across series by qualifying each
/// record's variant with its task, e.g. `utf8` → `utf8 fastavro`.
pub fn qualify(records: &mut [AggregatedRecord]) {
    for record in records.iter_mut() {
        record.variant = format!("{} {}", record.variant, record.task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BenchmarkKey, ReportStore};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn converts_nanoseconds_to_milliseconds() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        store
            .save(&BenchmarkKey::new("s", "utf8", 10).unwrap(), 2_500_000.0)
            .unwrap();

        let agg = collect(dir.path());
        assert_eq!(agg.records.len(), 1);
        assert_eq!(agg.records[0].time_ms, 2500.0);
        assert_eq!(agg.records[0].rows(), 1024);
    }

    #[test]
    fn corrupt_leaf_does_not_block_the_rest() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        for exp in 0..9 {
            store
                .save(&BenchmarkKey::new("s", "int", exp).unwrap(), 100.0)
                .unwrap();
        }

        let corrupt = dir.path().join("s/int/99/new");
        fs::create_dir_all(&corrupt).unwrap();
        fs::write(corrupt.join("estimates.json"), b"not json {").unwrap();

        let agg = collect(dir.path());
        assert_eq!(agg.records.len(), 9);
        assert_eq!(agg.failures.len(), 1);
        assert!(matches!(
            agg.failures[0].error,
            BenchError::CorruptReport { .. }
        ));
    }

    #[test]
    fn shallow_leaf_is_skipped_as_malformed() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("utf8/10/new")).unwrap();

        let agg = collect(dir.path());
        assert!(agg.records.is_empty());
        assert_eq!(agg.failures.len(), 1);
        assert!(matches!(
            agg.failures[0].error,
            BenchError::MalformedReportPath(_)
        ));
    }

    #[test]
    fn oversized_exponent_leaf_is_skipped_as_malformed() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        store
            .save(&BenchmarkKey::new("s", "utf8", 10).unwrap(), 1_000.0)
            .unwrap();

        let foreign = dir.path().join("foreign/utf8/64/new");
        fs::create_dir_all(&foreign).unwrap();
        fs::write(
            foreign.join("estimates.json"),
            r#"{"mean":{"point_estimate":1000.0}}"#,
        )
        .unwrap();

        let agg = collect(dir.path());
        assert_eq!(agg.records.len(), 1);
        assert_eq!(agg.failures.len(), 1);
        assert!(matches!(
            agg.failures[0].error,
            BenchError::MalformedSizeSegment { .. }
        ));
        assert_eq!(agg.records[0].rows(), 1024);
    }

    #[test]
    fn rows_never_overflows() {
        let record = AggregatedRecord {
            task: "s".to_string(),
            variant: "utf8".to_string(),
            size_exp: 64,
            time_ms: 1.0,
        };
        assert_eq!(record.rows(), 1u64 << 63);
    }

    #[test]
    fn missing_estimate_fails_that_leaf_only() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        store
            .save(&BenchmarkKey::new("s", "utf8", 10).unwrap(), 1.0)
            .unwrap();
        fs::create_dir_all(dir.path().join("s/utf8/12/new")).unwrap();

        let agg = collect(dir.path());
        assert_eq!(agg.records.len(), 1);
        assert_eq!(agg.failures.len(), 1);
    }

    #[test]
    fn merges_roots_and_qualifies_variants() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        ReportStore::new(a.path())
            .save(&BenchmarkKey::new("avro_read", "utf8", 10).unwrap(), 1000.0)
            .unwrap();
        ReportStore::new(b.path())
            .save(&BenchmarkKey::new("fastavro", "utf8", 10).unwrap(), 2000.0)
            .unwrap();

        let mut agg = collect_all([a.path(), b.path()]);
        assert_eq!(agg.records.len(), 2);

        qualify(&mut agg.records);
        let mut variants: Vec<&str> = agg.records.iter().map(|r| r.variant.as_str()).collect();
        variants.sort();
        assert_eq!(variants, vec!["utf8 avro_read", "utf8 fastavro"]);
    }

    #[test]
    fn scenario_six_sizes_for_one_series() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        for exp in [10u32, 12, 14, 16, 18, 20] {
            let key = BenchmarkKey::new("fastavro", "utf8", exp).unwrap();
            store.save(&key, 1_000.0 * exp as f64).unwrap();
        }

        let mut records: Vec<AggregatedRecord> = collect(dir.path())
            .records
            .into_iter()
            .filter(|r| r.variant == "utf8")
            .collect();
        records.sort_by_key(|r| r.size_exp);

        let sizes: Vec<u32> = records.iter().map(|r| r.size_exp).collect();
        assert_eq!(sizes, vec![10, 12, 14, 16, 18, 20]);
        assert!(records.iter().all(|r| r.time_ms > 0.0));
    }
}
