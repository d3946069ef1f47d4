//! The benchmark suite: wires dataset generation, the timed decode loop and
//! the report store together for a sweep of sizes.

use log::info;

use crate::codec;
use crate::dataset;
use crate::error::{BenchError, Result};
use crate::harness::{measure, BenchConfig};
use crate::report::{BenchmarkKey, ReportStore, MAX_SIZE_EXP};
use crate::schema::FieldKind;

/// One completed measurement, already persisted to the store.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub key: BenchmarkKey,
    pub mean_ns: f64,
}

/// One full decode pass over `buffer`, materializing every row and checking
/// the materialized count against the dataset's.
fn decode_pass(buffer: &[u8], expected_rows: usize) -> Result<usize> {
    let (_, values) = codec::decode_rows(buffer)?;
    if values.len() != expected_rows {
        return Err(BenchError::RowCountMismatch {
            expected: expected_rows,
            got: values.len(),
        });
    }
    Ok(values.len())
}

/// Run the decode suite for `series` across every kind and size exponent.
///
/// For each (kind, exponent): generate `2^exponent` rows, verify one untimed
/// decode pass, measure `cfg.trials` timed passes, persist the mean under
/// `(series, kind, exponent)`. A decode failure aborts the whole run; a
/// filesystem failure aborts that save.
pub fn run(
    cfg: &BenchConfig,
    series: &str,
    kinds: &[FieldKind],
    store: &ReportStore,
) -> Result<Vec<SuiteOutcome>> {
    let mut outcomes = Vec::new();

    for &kind in kinds {
        for exp in cfg.size_exponents() {
            if exp > MAX_SIZE_EXP {
                return Err(BenchError::SizeExponentTooLarge(exp));
            }
            let rows = usize::try_from(1u64 << exp)
                .map_err(|_| BenchError::SizeExponentTooLarge(exp))?;
            let ds = dataset::generate(kind, rows, cfg.seed)?;

            decode_pass(&ds.buffer, rows)?;
            let measured = measure(cfg.trials, || decode_pass(&ds.buffer, rows))?;

            let key = BenchmarkKey::new(series, kind.as_str(), exp)?;
            store.save(&key, measured.mean_ns)?;
            info!(
                "{series}/{}/2^{exp}: {:.3} ns over {} trials",
                kind.as_str(),
                measured.mean_ns,
                measured.trials
            );

            outcomes.push(SuiteOutcome {
                key,
                mean_ns: measured.mean_ns,
            });
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use tempfile::tempdir;

    #[test]
    fn suite_persists_a_report_per_size() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let cfg = BenchConfig {
            trials: 3,
            seed: 1,
            min_exp: 0,
            max_exp: 4,
            step: 2,
        };

        let outcomes = run(&cfg, "rowbin", &[FieldKind::Utf8], &store).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.mean_ns >= 0.0));

        let agg = aggregate::collect(dir.path());
        assert!(agg.failures.is_empty());
        let mut exps: Vec<u32> = agg.records.iter().map(|r| r.size_exp).collect();
        exps.sort_unstable();
        assert_eq!(exps, vec![0, 2, 4]);
        assert!(agg.records.iter().all(|r| r.task == "rowbin"));
        assert!(agg.records.iter().all(|r| r.variant == "utf8"));
    }

    #[test]
    fn rejects_oversized_exponent_before_generating() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        let cfg = BenchConfig {
            trials: 1,
            seed: 1,
            min_exp: 64,
            max_exp: 64,
            step: 1,
        };

        let err = run(&cfg, "rowbin", &[FieldKind::Int], &store).unwrap_err();
        assert!(matches!(err, BenchError::SizeExponentTooLarge(64)));
    }

    #[test]
    fn decode_pass_flags_row_count_mismatch() {
        let ds = dataset::generate(FieldKind::Int, 8, 0).unwrap();
        assert!(decode_pass(&ds.buffer, 8).is_ok());
        assert!(matches!(
            decode_pass(&ds.buffer, 9),
            Err(BenchError::RowCountMismatch { .. })
        ));
    }
}
