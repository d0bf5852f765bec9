//! Scatter plot rendering.
//!
//! Points are drawn at their original (unscaled) decibel values and coloured
//! by cluster label on a viridis scale normalised over the label range, so the
//! noise label `-1` always takes the dark end when present. A colour bar on
//! the right maps colours back to cluster ids.

use crate::dataset::{ColumnKind, LabeledDataset};
use crate::error::{ProcessingError, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::ops::Range;

pub const X_AXIS_LABEL: &str = "Day Noise Level (dB)";
pub const Y_AXIS_LABEL: &str = "Night Noise Level (dB)";
pub const COLORBAR_LABEL: &str = "Cluster ID";

const FONT: &str = "sans-serif";
const COLORBAR_WIDTH: i32 = 120;
const MAX_COLORBAR_TICKS: i32 = 12;

/// Viridis sampled at nine evenly spaced stops.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

#[derive(Clone, Debug, PartialEq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub point_size: u32,
}

impl PlotOptions {
    /// 10x8 inches at 100 dpi, titled with the clustering parameters.
    pub fn for_parameters(eps: f64, min_samples: usize) -> Self {
        Self {
            width: 1000,
            height: 800,
            title: format!(
                "DBSCAN Clustering (eps={}, min_samples={})",
                ColumnKind::Float.format(eps),
                min_samples
            ),
            point_size: 5,
        }
    }

    /// 8x6 inches at 100 dpi, as written by the standalone script.
    pub fn script() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "DBSCAN Clustering of Noise Levels".to_string(),
            point_size: 5,
        }
    }
}

/// Maps `t` in `[0, 1]` onto the viridis scale; out-of-range values clamp.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = pos - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * frac).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn normalize(label: i32, lo: i32, hi: i32) -> f64 {
    if hi <= lo {
        0.0
    } else {
        (label - lo) as f64 / (hi - lo) as f64
    }
}

pub fn label_color(label: i32, lo: i32, hi: i32) -> RGBColor {
    viridis(normalize(label, lo, hi))
}

pub fn label_bounds(labels: &[i32]) -> (i32, i32) {
    let lo = labels.iter().copied().min().unwrap_or(0);
    let hi = labels.iter().copied().max().unwrap_or(0);
    (lo, hi)
}

/// Data range padded by 5% on each side; a zero-width range is widened by 1.
pub fn axis_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if lo > hi {
        return 0.0..1.0;
    }
    if hi - lo == 0.0 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn colorbar_ticks(lo: i32, hi: i32) -> Vec<i32> {
    if hi - lo < MAX_COLORBAR_TICKS {
        (lo..=hi).collect()
    } else {
        vec![lo, lo + (hi - lo) / 2, hi]
    }
}

pub fn render_png(data: &LabeledDataset, options: &PlotOptions) -> Result<Vec<u8>> {
    let mut pixels = vec![0u8; options.width as usize * options.height as usize * 3];
    draw(data, options, &mut pixels).map_err(|e| ProcessingError::Render(e.to_string()))?;

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(&pixels, options.width, options.height, image::ColorType::Rgb8)
        .map_err(|e| ProcessingError::Render(e.to_string()))?;

    tracing::debug!("Rendered {}x{} plot ({} bytes)", options.width, options.height, png.len());
    Ok(png)
}

fn draw(
    data: &LabeledDataset,
    options: &PlotOptions,
    pixels: &mut [u8],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (plot_area, bar_area) = root.split_horizontally(options.width as i32 - COLORBAR_WIDTH);

    let x_range = axis_range(data.data().x_values().iter().copied());
    let y_range = axis_range(data.data().y_values().iter().copied());

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(options.title.as_str(), (FONT, 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .axis_desc_style((FONT, 16))
        .draw()?;

    let (lo, hi) = label_bounds(data.labels());
    chart.draw_series(data.rows().map(|(x, y, label)| {
        Circle::new((x, y), options.point_size, label_color(label, lo, hi).filled())
    }))?;

    let (_, bar_height) = bar_area.dim_in_pixel();
    let top = 60;
    let bottom = (bar_height as i32 - 70).max(top + 1);
    let left = 20;
    let right = left + 25;
    let span = bottom - top;

    for i in 0..span {
        let color = viridis(1.0 - i as f64 / span as f64);
        bar_area.draw(&Rectangle::new([(left, top + i), (right, top + i + 1)], color.filled()))?;
    }
    bar_area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    for tick in colorbar_ticks(lo, hi) {
        let y = bottom - (normalize(tick, lo, hi) * span as f64).round() as i32;
        bar_area.draw(&PathElement::new(vec![(right, y), (right + 5, y)], BLACK.stroke_width(1)))?;
        bar_area.draw(&Text::new(tick.to_string(), (right + 8, y - 7), (FONT, 14).into_font()))?;
    }

    bar_area.draw(&Text::new(
        COLORBAR_LABEL,
        (right + 50, (top + bottom) / 2 - 35),
        (FONT, 16).into_font().transform(FontTransform::Rotate90),
    ))?;

    root.present()?;
    Ok(())
}
