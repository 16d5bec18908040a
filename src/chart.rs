//! Histogram rendering to inline SVG.
//!
//! Every call draws into its own `String` through a fresh plotters SVG
//! backend, so repeated calls within one request cannot affect each other.

use std::f64::consts::PI;

use plotters::prelude::*;

use crate::error::AppError;

const BACKGROUND: RGBColor = RGBColor(234, 234, 242);
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const KDE_POINTS: usize = 200;
const MAX_BINS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Pixel height of the chart.
    pub height: u32,
    /// Width divided by height.
    pub aspect: f64,
    /// Overlay a kernel density estimate.
    pub kde: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            height: 288,
            aspect: 1.0,
            kde: true,
        }
    }
}

impl ChartOptions {
    pub fn width(&self) -> u32 {
        (f64::from(self.height) * self.aspect).round().max(1.0) as u32
    }
}

/// Equal-width bins over the range of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64]) -> Self {
        let Some((min, max)) = bounds(values) else {
            return Self {
                start: 0.0,
                bin_width: 1.0,
                counts: Vec::new(),
            };
        };
        if max == min {
            return Self {
                start: min - 0.5,
                bin_width: 1.0,
                counts: vec![values.len()],
            };
        }

        let bins = bin_count(values);
        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - min) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self {
            start: min,
            bin_width,
            counts,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.counts.len().max(1) as f64
    }

    /// `(left edge, right edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, count)| {
            let lo = self.start + self.bin_width * i as f64;
            (lo, lo + self.bin_width, *count)
        })
    }
}

/// Number of bins for `values`, following numpy's "auto" estimator: the
/// narrower of the Sturges and Freedman-Diaconis bin widths.
pub fn bin_count(values: &[f64]) -> usize {
    let Some((min, max)) = bounds(values) else {
        return 1;
    };
    let range = max - min;
    if range == 0.0 {
        return 1;
    }

    let n = values.len() as f64;
    let sturges = range / (n.log2() + 1.0);
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    ((range / width).ceil() as usize).clamp(1, MAX_BINS)
}

/// Gaussian kernel density estimate over the data range, scaled so its area
/// matches the histogram's. `None` when there is nothing to smooth.
pub fn density_curve(values: &[f64], bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let (min, max) = bounds(values)?;
    let n = values.len() as f64;
    if values.len() < 2 || max == min {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    // Scott's rule
    let bandwidth = variance.sqrt() * n.powf(-0.2);
    if bandwidth <= 0.0 {
        return None;
    }

    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
    let step = (max - min) / (KDE_POINTS - 1) as f64;
    let curve = (0..KDE_POINTS)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * n * bin_width)
        })
        .collect();
    Some(curve)
}

/// Renders the distribution of `values` as an SVG histogram.
///
/// Non-finite values are ignored. The chart has tick labels but no axis
/// descriptions. An empty column renders an empty frame.
///
/// # Errors
///
/// [`AppError::Chart`] when plotters fails to draw.
pub fn render_distribution(values: &[f64], options: &ChartOptions) -> Result<String, AppError> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let histogram = Histogram::new(&values);
    let curve = if options.kde {
        density_curve(&values, histogram.bin_width)
    } else {
        None
    };

    let peak_count = histogram.counts.iter().copied().max().unwrap_or(0) as f64;
    let peak_curve = curve
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);
    let y_max = (peak_count.max(peak_curve) * 1.05).max(1.0);
    let (x0, x1) = if histogram.counts.is_empty() {
        (0.0, 1.0)
    } else {
        (histogram.start, histogram.end())
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width(), options.height))
            .into_drawing_area();
        root.fill(&BACKGROUND).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(8)
            .x_label_area_size(20)
            .y_label_area_size(30)
            .build_cartesian_2d(x0..x1, 0f64..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&WHITE)
            .bold_line_style(&WHITE)
            .x_labels(5)
            .y_labels(4)
            .label_style(("sans-serif", 10))
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(histogram.bins().map(|(lo, hi, count)| {
                Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_COLOR.mix(0.6).filled())
            }))
            .map_err(chart_error)?;

        if let Some(curve) = curve {
            chart
                .draw_series(LineSeries::new(curve, BAR_COLOR.stroke_width(2)))
                .map_err(chart_error)?;
        }

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Linear-interpolated quantile of already sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn chart_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Chart(err.to_string())
}
