//! Rendering a captured signal for visual inspection.
//!
//! Rendering is an external collaborator of the probe, not part of its
//! concurrency core: a pure function of a numeric sequence plus labels. The
//! [`SignalRenderer`] trait is the seam; [`PlottersRenderer`] (behind the
//! `render` feature) is the bundled backend, drawing a line chart to a PNG
//! via the `plotters` crate.
//!
//! A render failure is always recoverable. It never disturbs the probe's
//! buffer or activation state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a rendering collaborator.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Create a render error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What to draw and where to write it.
///
/// All labels are cosmetic; `reference_lines` are horizontal rules drawn
/// across the full x range, useful for marking thresholds or setpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSpec {
    /// Chart title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Legend entry for the signal series.
    pub series_name: String,
    /// Y values at which to draw horizontal reference lines.
    pub reference_lines: Vec<f64>,
    /// Output image path.
    pub output_path: PathBuf,
}

impl PlotSpec {
    /// A plot spec with default labels writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            title: "Signal".to_string(),
            x_label: "Sample".to_string(),
            y_label: "Value".to_string(),
            series_name: "signal".to_string(),
            reference_lines: Vec::new(),
            output_path: output_path.into(),
        }
    }

    /// Set the chart title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the axis labels.
    #[must_use]
    pub fn with_axis_labels(
        mut self,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Set the legend entry for the signal series.
    #[must_use]
    pub fn with_series_name(mut self, series_name: impl Into<String>) -> Self {
        self.series_name = series_name.into();
        self
    }

    /// Add a horizontal reference line at the given y value.
    #[must_use]
    pub fn with_reference_line(mut self, y: f64) -> Self {
        self.reference_lines.push(y);
        self
    }
}

/// The seam to an external plotting collaborator.
pub trait SignalRenderer {
    /// Render `signal` according to `plot`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the backend cannot produce the image.
    fn render(&self, signal: &[f64], plot: &PlotSpec) -> Result<(), RenderError>;
}

#[cfg(feature = "render")]
pub use self::plotters_backend::PlottersRenderer;

#[cfg(feature = "render")]
mod plotters_backend {
    use super::{PlotSpec, RenderError, SignalRenderer};
    use plotters::prelude::*;

    /// PNG line-chart renderer backed by the `plotters` crate.
    #[derive(Debug, Clone)]
    pub struct PlottersRenderer {
        /// Output image width in pixels.
        pub width: u32,
        /// Output image height in pixels.
        pub height: u32,
    }

    impl Default for PlottersRenderer {
        fn default() -> Self {
            Self {
                width: 1024,
                height: 576,
            }
        }
    }

    impl PlottersRenderer {
        /// Renderer producing images of the given pixel dimensions.
        #[must_use]
        pub fn new(width: u32, height: u32) -> Self {
            Self { width, height }
        }
    }

    /// Y range covering the signal and every reference line, padded so flat
    /// or empty signals still produce a drawable chart.
    fn y_range(signal: &[f64], reference_lines: &[f64]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in signal.iter().chain(reference_lines) {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }

    fn draw_error(err: impl std::fmt::Display) -> RenderError {
        RenderError::new(err.to_string())
    }

    impl SignalRenderer for PlottersRenderer {
        fn render(&self, signal: &[f64], plot: &PlotSpec) -> Result<(), RenderError> {
            let root = BitMapBackend::new(&plot.output_path, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let x_max = signal.len().saturating_sub(1).max(1) as f64;
            let (y_min, y_max) = y_range(signal, &plot.reference_lines);

            let mut chart = ChartBuilder::on(&root)
                .caption(&plot.title, ("sans-serif", 24))
                .margin(16)
                .x_label_area_size(36)
                .y_label_area_size(48)
                .build_cartesian_2d(0.0..x_max, y_min..y_max)
                .map_err(draw_error)?;

            chart
                .configure_mesh()
                .x_desc(plot.x_label.as_str())
                .y_desc(plot.y_label.as_str())
                .draw()
                .map_err(draw_error)?;

            if !signal.is_empty() {
                let points = signal.iter().enumerate().map(|(i, &v)| (i as f64, v));
                chart
                    .draw_series(LineSeries::new(points, &BLUE))
                    .map_err(draw_error)?
                    .label(plot.series_name.as_str())
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

                chart
                    .configure_series_labels()
                    .border_style(BLACK)
                    .background_style(WHITE.mix(0.8))
                    .draw()
                    .map_err(draw_error)?;
            }

            for &y in &plot.reference_lines {
                chart
                    .draw_series(LineSeries::new([(0.0, y), (x_max, y)], &RED))
                    .map_err(draw_error)?;
            }

            root.present().map_err(draw_error)?;
            Ok(())
        }
    }
}
