use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rowbench::aggregate;
use rowbench::harness::BenchConfig;
use rowbench::plot::{self, SeriesSelector};
use rowbench::report::ReportStore;
use rowbench::schema::FieldKind;
use rowbench::suite;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Int,
    Utf8,
    Nullable,
}

impl From<KindArg> for FieldKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Int => FieldKind::Int,
            KindArg::Utf8 => FieldKind::Utf8,
            KindArg::Nullable => FieldKind::NullableInt,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the decode suite and persist one report per (kind, size).
    Bench {
        /// Series name identifying this implementation in the report tree.
        #[arg(long, default_value = "rowbin")]
        series: String,

        /// Column kind(s) to benchmark; defaults to all of them.
        #[arg(long = "kind", value_enum, num_args = 1.., action = clap::ArgAction::Append)]
        kinds: Vec<KindArg>,

        /// Report tree root to write under.
        #[arg(long, value_name = "DIR", default_value = "target/criterion")]
        root: PathBuf,

        #[arg(long, default_value_t = 100)]
        trials: u32,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Smallest size exponent (row count = 2^exp).
        #[arg(long, default_value_t = 10)]
        min_exp: u32,

        /// Largest size exponent, inclusive.
        #[arg(long, default_value_t = 20)]
        max_exp: u32,

        #[arg(long, default_value_t = 2)]
        step: u32,
    },

    /// Aggregate report trees and render a comparison chart.
    Report {
        /// Report tree root(s) to merge. Can be provided multiple times.
        #[arg(long = "root", value_name = "DIR", num_args = 1.., action = clap::ArgAction::Append)]
        roots: Vec<PathBuf>,

        /// Series to chart, as VARIANT or VARIANT=LABEL. Selector order is
        /// chart legend and dump order.
        #[arg(long = "select", value_name = "VARIANT[=LABEL]", num_args = 1.., action = clap::ArgAction::Append)]
        selects: Vec<String>,

        #[arg(long, default_value = "decode throughput")]
        title: String,

        /// Chart destination (SVG).
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Also print a per-selector `size, time (ms)` table to stdout.
        #[arg(long, default_value_t = false)]
        dump: bool,

        /// Qualify each variant with its series name before selecting, to
        /// disambiguate identical variants across merged trees.
        #[arg(long, default_value_t = false)]
        qualify: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "rowbench")]
#[command(about = "Row-format decode benchmarks with criterion-compatible reports")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

fn parse_selector(raw: &str) -> SeriesSelector {
    match raw.split_once('=') {
        Some((variant, label)) => SeriesSelector::new(variant, label),
        None => SeriesSelector::new(raw, raw),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.cmd {
        Command::Bench {
            series,
            kinds,
            root,
            trials,
            seed,
            min_exp,
            max_exp,
            step,
        } => {
            let cfg = BenchConfig {
                trials,
                seed,
                min_exp,
                max_exp,
                step,
            };
            let kinds: Vec<FieldKind> = if kinds.is_empty() {
                vec![FieldKind::Utf8, FieldKind::Int, FieldKind::NullableInt]
            } else {
                kinds.into_iter().map(FieldKind::from).collect()
            };

            let store = ReportStore::new(&root);
            let outcomes = suite::run(&cfg, &series, &kinds, &store)
                .with_context(|| format!("running suite {series:?}"))?;

            for outcome in &outcomes {
                println!("2^{},{:.3} ns", outcome.key.size_exp, outcome.mean_ns);
            }
        }

        Command::Report {
            roots,
            selects,
            title,
            out,
            dump,
            qualify,
        } => {
            let mut agg = aggregate::collect_all(roots.iter().map(PathBuf::as_path));
            if qualify {
                aggregate::qualify(&mut agg.records);
            }
            agg.records.sort_by_key(|r| r.size_exp);

            let selectors: Vec<SeriesSelector> =
                selects.iter().map(|s| parse_selector(s)).collect();
            plot::render(&agg.records, &selectors, &title, &out, dump)?;
            eprintln!("wrote {}", out.display());
        }
    }

    Ok(())
}
