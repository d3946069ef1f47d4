//! Comparison charts and the tabular stdout dump.
//!
//! Each selector picks one variant out of the aggregated records and becomes
//! one line on the chart, plotted over its own native x-domain (row counts).
//! No alignment or interpolation is performed across series.

use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::prelude::*;

use crate::aggregate::AggregatedRecord;

/// Picks records whose variant equals `variant` and labels the resulting
/// chart series `label`.
#[derive(Debug, Clone)]
pub struct SeriesSelector {
    pub variant: String,
    pub label: String,
}

impl SeriesSelector {
    pub fn new(variant: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            label: label.into(),
        }
    }
}

fn series_points(records: &[AggregatedRecord], variant: &str) -> Vec<(u64, f64)> {
    records
        .iter()
        .filter(|r| r.variant == variant)
        .map(|r| (r.rows(), r.time_ms))
        .collect()
}

/// Render one comparison chart to `destination` (SVG) and, when `dump` is
/// set, print a `label / size, time (ms)` table per selector to stdout in
/// selector order.
pub fn render(
    records: &[AggregatedRecord],
    selectors: &[SeriesSelector],
    title: &str,
    destination: &Path,
    dump: bool,
) -> Result<()> {
    let series: Vec<(&SeriesSelector, Vec<(u64, f64)>)> = selectors
        .iter()
        .map(|sel| (sel, series_points(records, &sel.variant)))
        .collect();

    if series.iter().all(|(_, points)| points.is_empty()) {
        bail!("no aggregated records match any selector");
    }

    if dump {
        for (sel, points) in &series {
            println!("{}", sel.label);
            println!("size, time (ms)");
            for (rows, time_ms) in points {
                println!("{rows}, {time_ms}");
            }
        }
    }

    let max_x = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(rows, _)| rows as f64))
        .fold(1.0_f64, f64::max);
    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, time_ms)| time_ms))
        .fold(0.0_f64, f64::max);

    let root = SVGBackend::new(destination, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..max_x * 1.05, 0.0..max_y * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("size")
        .y_desc("time (ms)")
        .label_style(("sans-serif", 16))
        .draw()?;

    for (idx, (sel, points)) in series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color: RGBAColor = Palette99::pick(idx).to_rgba();
        let data: Vec<(f64, f64)> = points
            .iter()
            .map(|&(rows, time_ms)| (rows as f64, time_ms))
            .collect();

        chart
            .draw_series(LineSeries::new(data.clone(), color.stroke_width(2)))?
            .label(sel.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        chart.draw_series(
            data.iter()
                .map(|&point| Circle::new(point, 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 16))
        .draw()?;

    root.present()
        .with_context(|| format!("writing chart to {}", destination.display()))?;
    Ok(())
}
