//! Pie chart rendering for bucketed distributions.
//!
//! [`ChartRenderer`] is the seam report builders draw through. The shipped
//! implementation, [`SvgPieRenderer`], draws with the [`plotters`] SVG backend
//! and persists each chart as `<output_dir>/<chart_id>.svg`.

use crate::types::BucketedRatios;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while rendering a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart '{chart_id}': {message}")]
    Drawing { chart_id: String, message: String },

    #[error("Failed to save chart to file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chart id: {0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Result of rendering one chart
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutput {
    /// SVG markup, also written to `path`
    Svg { markup: String, path: PathBuf },
    /// Nothing to plot
    NoData,
}

impl ChartOutput {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Svg { markup, .. } => Some(markup),
            Self::NoData => None,
        }
    }

    /// `data:` URI for embedding the chart in an `<img>` tag
    pub fn data_uri(&self) -> Option<String> {
        self.markup().map(|markup| {
            let encoded = base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                markup.as_bytes(),
            );
            format!("data:image/svg+xml;base64,{}", encoded)
        })
    }
}

/// Turns bucketed ratios into a rendered chart artifact
pub trait ChartRenderer {
    fn render(&self, data: &BucketedRatios, chart_id: &str) -> Result<ChartOutput>;
}

/// Wedge colours, cycled when there are more entries than colours
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Pie chart renderer writing SVG files
#[derive(Debug, Clone)]
pub struct SvgPieRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl SvgPieRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            width: 640,
            height: 480,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the chart with the given id is written to
    pub fn chart_path(&self, chart_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.svg", chart_id))
    }

    fn draw_svg(&self, data: &BucketedRatios, chart_id: &str) -> Result<String> {
        let drawing_error = |e: &dyn std::fmt::Display| ChartError::Drawing {
            chart_id: chart_id.to_string(),
            message: e.to_string(),
        };

        let sizes: Vec<f64> = data.iter().map(|entry| entry.ratio).collect();
        let labels: Vec<String> = data.iter().map(|entry| entry.label()).collect();
        let colors: Vec<RGBColor> = (0..sizes.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();

        let center = (self.width as i32 / 2, self.height as i32 / 2);
        let radius = self.width.min(self.height) as f64 * 0.35;

        let mut markup = String::new();
        {
            let root = SVGBackend::with_string(&mut markup, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(|e| drawing_error(&e))?;

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(90.0);
            pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
            pie.percentages(("sans-serif", 12).into_font().color(&WHITE));

            root.draw(&pie).map_err(|e| drawing_error(&e))?;
            root.present().map_err(|e| drawing_error(&e))?;
        }

        Ok(markup)
    }
}

impl ChartRenderer for SvgPieRenderer {
    fn render(&self, data: &BucketedRatios, chart_id: &str) -> Result<ChartOutput> {
        if chart_id.is_empty() || chart_id.contains(['/', '\\']) {
            return Err(ChartError::InvalidId(chart_id.to_string()));
        }

        if data.is_empty() {
            debug!(chart_id, "No data to plot");
            return Ok(ChartOutput::NoData);
        }

        let markup = self.draw_svg(data, chart_id)?;

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(chart_id);
        std::fs::write(&path, &markup)?;
        debug!(chart_id, path = %path.display(), "Chart written");

        Ok(ChartOutput::Svg { markup, path })
    }
}
