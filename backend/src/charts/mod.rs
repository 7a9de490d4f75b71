//! SVG chart rendering for the dashboard.
//!
//! Four chart types are produced from [`DashboardArtifacts`]:
//!
//! - time-series line per AHU with a dashed threshold rule
//! - exceedance-count bar chart
//! - per-AHU box plot of the full distribution
//! - hour x AHU heatmap of mean readings
//!
//! Rendering consumes the artifacts read-only and returns standalone
//! SVG strings; the pipeline itself never touches plotting state, which
//! keeps it unit-testable without a display environment.

use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::models::DashboardArtifacts;

/// The four rendered charts, as standalone SVG documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    /// CO2 trend over time, one line per AHU.
    pub line_svg: String,
    /// Exceedance count per AHU.
    pub bar_svg: String,
    /// CO2 distribution per AHU.
    pub box_svg: String,
    /// Mean CO2 by hour and AHU.
    pub heatmap_svg: String,
}

/// Render all four charts from the pipeline's artifacts.
pub fn render_all(artifacts: &DashboardArtifacts) -> ChartResult<ChartSet> {
    Ok(ChartSet {
        line_svg: render_line_chart(artifacts)?,
        bar_svg: render_bar_chart(artifacts)?,
        box_svg: render_box_plot(artifacts)?,
        heatmap_svg: render_heatmap(artifacts)?,
    })
}

fn draw_err<E: std::fmt::Display>(chart: &'static str) -> impl Fn(E) -> ChartError {
    move |e| ChartError::Draw {
        chart,
        message: e.to_string(),
    }
}

/// Pad a numeric range so plotters never sees a zero-width axis.
fn padded(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

fn empty_chart(title: &str, size: (u32, u32), chart: &'static str) -> ChartResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err(chart))?;
        root.draw(&Text::new(
            format!("{title} (no data)"),
            (20, 20),
            ("sans-serif", 20),
        ))
        .map_err(draw_err(chart))?;
        root.present().map_err(draw_err(chart))?;
    }
    Ok(svg)
}

// =============================================================================
// Line chart: CO2 trend, all AHUs
// =============================================================================

/// Time-series line chart over the full long table, one series per AHU,
/// with a dashed horizontal rule at the threshold.
pub fn render_line_chart(artifacts: &DashboardArtifacts) -> ChartResult<String> {
    const SIZE: (u32, u32) = (1200, 500);
    let err = draw_err::<Box<dyn std::error::Error>>("line");

    if artifacts.long.is_empty() {
        return empty_chart("CO2 Trend - All AHUs", SIZE, "line");
    }

    let to_secs = |ts: chrono::NaiveDateTime| ts.and_utc().timestamp() as f64;

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for row in &artifacts.long {
        let x = to_secs(row.timestamp);
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(row.co2_ppm);
        y_max = y_max.max(row.co2_ppm);
    }
    // Keep the threshold rule in view.
    y_min = y_min.min(artifacts.threshold_ppm);
    y_max = y_max.max(artifacts.threshold_ppm);

    let (x_min, x_max) = padded(x_min, x_max);
    let (y_min, y_max) = padded(y_min, y_max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err("line"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("CO2 Trend - All AHUs", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| err(Box::new(e)))?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|secs| {
                chrono::DateTime::from_timestamp(*secs as i64, 0)
                    .map(|dt| dt.naive_utc().format("%m-%d %H:%M").to_string())
                    .unwrap_or_default()
            })
            .y_desc("CO2 (ppm)")
            .draw()
            .map_err(|e| err(Box::new(e)))?;

        for (idx, ahu) in artifacts.heatmap.ahu_ids.iter().enumerate() {
            let color = Palette99::pick(idx);
            let points: Vec<(f64, f64)> = artifacts
                .long
                .iter()
                .filter(|r| &r.ahu == ahu)
                .map(|r| (to_secs(r.timestamp), r.co2_ppm))
                .collect();

            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(|e| err(Box::new(e)))?
                .label(ahu.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                });
        }

        // Dashed threshold rule.
        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (x_min, artifacts.threshold_ppm),
                    (x_max, artifacts.threshold_ppm),
                ],
                8,
                6,
                RED.stroke_width(2),
            ))
            .map_err(|e| err(Box::new(e)))?;

        chart
            .configure_series_labels()
            .border_style(&BLACK.mix(0.4))
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(|e| err(Box::new(e)))?;

        root.present().map_err(draw_err("line"))?;
    }
    Ok(svg)
}

// =============================================================================
// Bar chart: exceedance count per AHU
// =============================================================================

/// Bar chart of exceedance counts, one bar per AHU with at least one
/// exceedance.
pub fn render_bar_chart(artifacts: &DashboardArtifacts) -> ChartResult<String> {
    const SIZE: (u32, u32) = (1000, 500);
    let err = draw_err::<Box<dyn std::error::Error>>("bar");

    let counts = &artifacts.exceed_counts;
    if counts.is_empty() {
        return empty_chart("CO2 Exceedance Count", SIZE, "bar");
    }

    let max_count = counts.iter().map(|c| c.count).max().unwrap_or(1) as f64;
    let title = format!(
        "CO2 Exceedance Count (>{} ppm)",
        artifacts.threshold_ppm as i64
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err("bar"))?;

        let labels: Vec<String> = counts.iter().map(|c| c.ahu.clone()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..counts.len() as f64, 0f64..max_count * 1.1)
            .map_err(|e| err(Box::new(e)))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&|x| {
                let idx = x.floor() as usize;
                labels.get(idx).cloned().unwrap_or_default()
            })
            .y_desc("Count")
            .draw()
            .map_err(|e| err(Box::new(e)))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, c)| {
                let color = Palette99::pick(i);
                Rectangle::new(
                    [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, c.count as f64)],
                    color.filled(),
                )
            }))
            .map_err(|e| err(Box::new(e)))?;

        root.present().map_err(draw_err("bar"))?;
    }
    Ok(svg)
}

// =============================================================================
// Box plot: CO2 distribution per AHU
// =============================================================================

/// Box plot of the full reading distribution per AHU, with the
/// threshold rule for reference.
pub fn render_box_plot(artifacts: &DashboardArtifacts) -> ChartResult<String> {
    const SIZE: (u32, u32) = (1200, 500);
    let err = draw_err::<Box<dyn std::error::Error>>("box");

    let ahus = &artifacts.heatmap.ahu_ids;
    if ahus.is_empty() {
        return empty_chart("CO2 Distribution by AHU", SIZE, "box");
    }

    let quartiles: Vec<(String, Quartiles)> = ahus
        .iter()
        .map(|ahu| {
            let values: Vec<f64> = artifacts
                .long
                .iter()
                .filter(|r| &r.ahu == ahu)
                .map(|r| r.co2_ppm)
                .collect();
            (ahu.clone(), Quartiles::new(&values))
        })
        .collect();

    let mut y_min = artifacts.threshold_ppm;
    let mut y_max = artifacts.threshold_ppm;
    for row in &artifacts.long {
        y_min = y_min.min(row.co2_ppm);
        y_max = y_max.max(row.co2_ppm);
    }
    let (y_min, y_max) = padded(y_min, y_max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err("box"))?;

        let labels: Vec<String> = ahus.clone();

        let mut chart = ChartBuilder::on(&root)
            .caption("CO2 Distribution by AHU", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..ahus.len()).into_segmented(), (y_min as f32)..(y_max as f32))
            .map_err(|e| err(Box::new(e)))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("CO2 (ppm)")
            .draw()
            .map_err(|e| err(Box::new(e)))?;

        chart
            .draw_series(quartiles.iter().enumerate().map(|(i, (_, q))| {
                Boxplot::new_vertical(SegmentValue::CenterOf(i), q)
                    .width(24)
                    .whisker_width(0.5)
                    .style(Palette99::pick(i).filled())
            }))
            .map_err(|e| err(Box::new(e)))?;

        // Threshold rule across the whole axis.
        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (SegmentValue::Exact(0), artifacts.threshold_ppm as f32),
                    (SegmentValue::Exact(ahus.len()), artifacts.threshold_ppm as f32),
                ],
                8,
                6,
                RED.stroke_width(2),
            ))
            .map_err(|e| err(Box::new(e)))?;

        root.present().map_err(draw_err("box"))?;
    }
    Ok(svg)
}

// =============================================================================
// Heatmap: mean CO2 by hour and AHU
// =============================================================================

/// Linear two-color ramp for heatmap cells.
fn heat_color(value: f64, min: f64, max: f64) -> RGBColor {
    let t = if (max - min).abs() < f64::EPSILON {
        0.5
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    };
    let lerp = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
    // Cool blue to warm red.
    RGBColor(lerp(59, 214), lerp(118, 66), lerp(188, 56))
}

/// Hour x AHU heatmap of mean readings. Cells without observations are
/// left unpainted; the hour axis always spans 0-23.
pub fn render_heatmap(artifacts: &DashboardArtifacts) -> ChartResult<String> {
    const SIZE: (u32, u32) = (1400, 600);
    let err = draw_err::<Box<dyn std::error::Error>>("heatmap");

    let heatmap = &artifacts.heatmap;
    if heatmap.ahu_ids.is_empty() {
        return empty_chart("Average CO2 Heatmap (Hour vs AHU)", SIZE, "heatmap");
    }

    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    for row in &heatmap.cells {
        for &cell in row.iter().flatten() {
            v_min = v_min.min(cell);
            v_max = v_max.max(cell);
        }
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err("heatmap"))?;

        let labels: Vec<String> = heatmap.ahu_ids.clone();

        let mut chart = ChartBuilder::on(&root)
            .caption("Average CO2 Heatmap (Hour vs AHU)", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..labels.len() as f64, 0f64..24f64)
            .map_err(|e| err(Box::new(e)))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                let idx = x.floor() as usize;
                labels.get(idx).cloned().unwrap_or_default()
            })
            .y_labels(24)
            .y_label_formatter(&|y| format!("{:02}:00", y.floor() as u32))
            .y_desc("Hour")
            .draw()
            .map_err(|e| err(Box::new(e)))?;

        chart
            .draw_series(heatmap.hours.iter().enumerate().flat_map(|(r, &hour)| {
                let cells = &heatmap.cells[r];
                cells.iter().enumerate().filter_map(move |(c, &cell)| {
                    cell.map(|mean| {
                        Rectangle::new(
                            [
                                (c as f64, hour as f64),
                                (c as f64 + 1.0, hour as f64 + 1.0),
                            ],
                            heat_color(mean, v_min, v_max).filled(),
                        )
                    })
                })
            }))
            .map_err(|e| err(Box::new(e)))?;

        root.present().map_err(draw_err("heatmap"))?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WideRow, WideTable};
    use crate::pipeline::{run_pipeline, PipelineConfig};
    use chrono::NaiveDate;

    fn sample_artifacts() -> DashboardArtifacts {
        let ts = |h: u32| {
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let table = WideTable {
            ahu_ids: vec!["AHU1".into(), "AHU2".into()],
            rows: vec![
                WideRow {
                    timestamp: ts(8),
                    cells: vec![Some(1200.0), Some(800.0)],
                },
                WideRow {
                    timestamp: ts(9),
                    cells: vec![Some(950.0), Some(1500.0)],
                },
            ],
        };
        run_pipeline(&table, &PipelineConfig::default())
    }

    #[test]
    fn test_all_charts_render_svg() {
        let charts = render_all(&sample_artifacts()).unwrap();
        for svg in [
            &charts.line_svg,
            &charts.bar_svg,
            &charts.box_svg,
            &charts.heatmap_svg,
        ] {
            assert!(svg.contains("<svg"), "not an SVG document");
        }
    }

    #[test]
    fn test_empty_artifacts_render_placeholders() {
        let table = WideTable {
            ahu_ids: vec!["AHU1".into()],
            rows: vec![],
        };
        let artifacts = run_pipeline(&table, &PipelineConfig::default());
        let charts = render_all(&artifacts).unwrap();
        assert!(charts.line_svg.contains("no data"));
        assert!(charts.bar_svg.contains("no data"));
    }

    #[test]
    fn test_heat_color_endpoints() {
        let cold = heat_color(0.0, 0.0, 1.0);
        let hot = heat_color(1.0, 0.0, 1.0);
        assert_eq!(cold, RGBColor(59, 118, 188));
        assert_eq!(hot, RGBColor(214, 66, 56));
    }

    #[test]
    fn test_bar_chart_mentions_threshold() {
        let charts = render_bar_chart(&sample_artifacts()).unwrap();
        assert!(charts.contains("1000"));
    }
}
