//! Plotters-powered PNG chart renderer.
//!
//! Draws into an in-memory RGB buffer with `BitMapBackend::with_buffer`, then
//! encodes the buffer as PNG. Nothing touches the filesystem.
//!
//! Text needs a TrueType font registered with Plotters' `ab_glyph` backend.
//! Without one we still draw the lines and the dashed tick grid, just no text.

use std::error::Error;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;

use crate::error::PipelineError;
use crate::plot::{ChartRenderer, ChartSpec, MAX_UNIT_TICKS};

const FONT_FAMILY: &str = "sans-serif";
const BACKGROUND: RGBColor = RGBColor(0xBE, 0xBE, 0xBE);
const GRID: RGBColor = RGBColor(0x99, 0x99, 0x99);
const DASH_LEN: u32 = 6;
const DASH_GAP: u32 = 4;

pub struct PngChartRenderer {
    text: bool,
}

impl PngChartRenderer {
    /// Renderer without text (no font available).
    pub fn without_text() -> Self {
        Self { text: false }
    }

    /// Register the font at `path` (if any) and build a renderer.
    pub fn from_font_path(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            log::warn!("no chart font configured; rendering chart without text");
            return Ok(Self::without_text());
        };

        let bytes = std::fs::read(path).map_err(|e| {
            PipelineError::RenderFailure(format!("failed to read font '{}': {e}", path.display()))
        })?;
        // Plotters keeps registered fonts for the rest of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
            PipelineError::RenderFailure(format!("invalid font '{}': not a valid TrueType font", path.display()))
        })?;

        Ok(Self { text: true })
    }

    fn draw(&self, spec: &ChartSpec, buf: &mut [u8]) -> Result<(), Box<dyn Error>> {
        let (first, last) = spec.date_bounds().ok_or("chart has no data points")?;
        let (v_min, v_max) = spec.value_bounds().ok_or("chart has no data points")?;
        if !(v_min.is_finite() && v_max.is_finite()) {
            return Err(format!("non-finite rate in chart data ({v_min}..{v_max})").into());
        }

        let day = |d: NaiveDate| (d - first).num_days() as f64;
        let (x0, x1) = if first == last { (-1.0, 1.0) } else { (0.0, day(last)) };

        // Visible range covers the data and every tick; ticks are unit steps.
        let tick_lo = spec.y_ticks.first().map(|t| *t as f64).unwrap_or(v_min);
        let tick_hi = spec.y_ticks.last().map(|t| *t as f64).unwrap_or(v_max);
        let y0 = v_min.min(tick_lo).floor();
        let mut y1 = v_max.max(tick_hi).ceil();
        if y1 <= y0 {
            y1 = y0 + 1.0;
        }

        let root = BitMapBackend::with_buffer(buf, (spec.width, spec.height)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if self.text {
            builder
                .caption(&spec.title, (FONT_FAMILY, 24))
                .set_label_area_size(LabelAreaPosition::Left, 70)
                .set_label_area_size(LabelAreaPosition::Bottom, 60);
        }
        let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

        let in_ticks = |v: f64| spec.y_ticks.iter().any(|t| (*t as f64 - v).abs() < 1e-9);

        if self.text {
            let fmt_x = |v: &f64| (first + Duration::days(v.round() as i64)).format("%Y-%m-%d").to_string();
            let fmt_y = |v: &f64| if in_ticks(*v) { format!("{v:.0}") } else { String::new() };
            // One key point per unit step while the range is narrow enough;
            // labels only on the tick list.
            let span = y1 - y0;
            let n_ticks = if span < MAX_UNIT_TICKS as f64 {
                span as usize + 1
            } else {
                spec.y_ticks.len().max(2)
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(&spec.x_label)
                .y_desc(&spec.y_label)
                .x_labels(10)
                .y_labels(n_ticks)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&fmt_y)
                .axis_desc_style((FONT_FAMILY, 18))
                .label_style((FONT_FAMILY, 13))
                .draw()?;
        }

        for tick in &spec.y_ticks {
            let y = *tick as f64;
            chart.draw_series(DashedLineSeries::new(
                [(x0, y), (x1, y)],
                DASH_LEN,
                DASH_GAP,
                GRID.mix(0.6).stroke_width(1),
            ))?;
        }

        for line in &spec.lines {
            let color = RGBColor(line.color.0, line.color.1, line.color.2);
            let points: Vec<(f64, f64)> = line.points.iter().map(|(d, v)| (day(*d), *v)).collect();
            let series = chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
            if self.text {
                series
                    .label(line.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }

        if self.text {
            let (px, py) = chart.plotting_area().get_base_pixel();
            root.draw(&Text::new(
                spec.legend_title.clone(),
                (px + 14, py + 10),
                (FONT_FAMILY, 15).into_font(),
            ))?;
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::Coordinate(10, 30))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT_FAMILY, 14))
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, PipelineError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(PipelineError::RenderFailure("chart size must be non-zero".to_string()));
        }

        let mut buf = vec![0u8; spec.width as usize * spec.height as usize * 3];
        self.draw(spec, &mut buf)
            .map_err(|e| PipelineError::RenderFailure(e.to_string()))?;

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&buf, spec.width, spec.height, ColorType::Rgb8)
            .map_err(|e| PipelineError::RenderFailure(format!("PNG encoding failed: {e}")))?;

        log::debug!("rendered {}x{} chart ({} bytes)", spec.width, spec.height, out.len());
        Ok(out)
    }
}
