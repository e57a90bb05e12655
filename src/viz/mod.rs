//! Visualization: render the league-vs-team comparison chart.
//!
//! - [`ChartLayout`] turns an [`Aggregation`] into pixel geometry (scales, ticks,
//!   polylines, markers, legend) without touching any backend
//! - [`DrawingSurface`] is the small set of primitives a backend must offer
//! - [`render_chart`] clears a surface and draws a layout onto it from scratch
//! - [`render_to_file`] / [`render_svg_string`] use the plotters SVG and bitmap backends
//! - [`tooltip`] holds the hover state machine used by interactive frontends

pub mod fonts;
pub mod layout;
pub mod plotters_adapter;
pub mod scale;
pub mod text;
pub mod tooltip;

pub use layout::{ChartLayout, LegendEntry, Marker, PlotArea, Polyline, SeriesRole, Tick};
pub use plotters_adapter::PlottersSurface;
pub use tooltip::{HoverChange, HoverState, Tooltip};

use crate::aggregate::Aggregation;
use crate::config::{ChartConfig, Rgb};
use anyhow::{Context, Result, bail};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

use text::estimate_text_width_px;

/// Pixel coordinate, origin top-left.
pub type Point = (f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// How a text run is anchored at its point and drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSpec {
    pub size: u32,
    pub color: Rgb,
    pub h: HAlign,
    pub v: VAlign,
    /// Rotated a quarter turn counter-clockwise (y axis title).
    pub vertical: bool,
}

impl TextSpec {
    pub fn new(size: u32, color: Rgb, h: HAlign, v: VAlign) -> Self {
        Self {
            size,
            color,
            h,
            v,
            vertical: false,
        }
    }

    pub fn rotated(self) -> Self {
        Self {
            vertical: true,
            ..self
        }
    }
}

/// Drawing primitives the chart needs from a backend.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Wipe the whole surface.
    fn clear(&mut self, background: Rgb) -> Result<()>;
    fn line_path(&mut self, points: &[Point], stroke: Stroke) -> Result<()>;
    fn line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<()> {
        self.line_path(&[from, to], stroke)
    }
    fn circle(&mut self, center: Point, radius: f32, fill: Rgb) -> Result<()>;
    fn rect(&mut self, top_left: Point, bottom_right: Point, fill: Rgb) -> Result<()>;
    fn text(&mut self, text: &str, at: Point, style: &TextSpec) -> Result<()>;
}

const TICK_LEN: f32 = 6.0;
const LEGEND_SWATCH: f32 = 12.0;

/// Draw `layout` onto `surface`, replacing whatever was there.
pub fn draw_layout<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layout: &ChartLayout,
    cfg: &ChartConfig,
) -> Result<()> {
    surface.clear(cfg.background)?;
    let a = &layout.area;
    let axis = Stroke {
        color: cfg.axis_color,
        width: 1.0,
    };
    let label = TextSpec::new(cfg.font_px, cfg.axis_color, HAlign::Center, VAlign::Top);

    if !layout.title.is_empty() {
        surface.text(
            &layout.title,
            (layout.width / 2.0, a.top / 2.0),
            &TextSpec::new(cfg.font_px + 4, cfg.axis_color, HAlign::Center, VAlign::Center),
        )?;
    }

    // X axis
    surface.line((a.left, a.bottom), (a.right, a.bottom), axis)?;
    for t in &layout.x_ticks {
        surface.line((t.at, a.bottom), (t.at, a.bottom + TICK_LEN), axis)?;
        surface.text(&t.label, (t.at, a.bottom + TICK_LEN + 3.0), &label)?;
    }
    surface.text(
        &layout.x_title,
        ((a.left + a.right) / 2.0, a.bottom + TICK_LEN + cfg.font_px as f32 + 14.0),
        &label,
    )?;

    // Y axis
    surface.line((a.left, a.top), (a.left, a.bottom), axis)?;
    let y_label = TextSpec::new(cfg.font_px, cfg.axis_color, HAlign::Right, VAlign::Center);
    let mut widest = 0f32;
    for t in &layout.y_ticks {
        surface.line((a.left - TICK_LEN, t.at), (a.left, t.at), axis)?;
        surface.text(&t.label, (a.left - TICK_LEN - 3.0, t.at), &y_label)?;
        widest = widest.max(estimate_text_width_px(&t.label, cfg.font_px));
    }
    surface.text(
        &layout.y_title,
        (
            (a.left - TICK_LEN - widest - 10.0).max(cfg.font_px as f32),
            (a.top + a.bottom) / 2.0,
        ),
        &TextSpec::new(cfg.font_px, cfg.axis_color, HAlign::Center, VAlign::Bottom).rotated(),
    )?;

    for line in &layout.lines {
        if line.points.len() >= 2 {
            surface.line_path(
                &line.points,
                Stroke {
                    color: line.color,
                    width: line.width,
                },
            )?;
        }
    }
    for m in &layout.markers {
        surface.circle(m.at, m.radius, m.color)?;
    }

    let legend_text = TextSpec::new(cfg.font_px, cfg.axis_color, HAlign::Left, VAlign::Center);
    for e in &layout.legend {
        let (x, y) = e.at;
        surface.rect((x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH), e.color)?;
        surface.text(
            &e.label,
            (x + LEGEND_SWATCH + 6.0, y + LEGEND_SWATCH / 2.0),
            &legend_text,
        )?;
    }
    Ok(())
}

/// Lay out `agg` for the surface's current size and draw it. Returns the layout
/// so interactive callers can hit-test markers against it.
pub fn render_chart<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    agg: &Aggregation,
    title: &str,
    cfg: &ChartConfig,
) -> Result<ChartLayout> {
    let size = (surface.width() as f32, surface.height() as f32);
    let layout = ChartLayout::compute(agg, title, size, cfg);
    draw_layout(surface, &layout, cfg)?;
    Ok(layout)
}

/// Draw a visible tooltip as a bordered box near its anchor, kept inside the surface.
pub fn draw_tooltip<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    tooltip: &Tooltip,
    cfg: &ChartConfig,
) -> Result<()> {
    if !tooltip.visible || tooltip.lines.is_empty() {
        return Ok(());
    }
    let font = cfg.font_px;
    let line_h = font as f32 + 4.0;
    let pad = 6.0;
    let w = tooltip
        .lines
        .iter()
        .map(|l| estimate_text_width_px(l, font))
        .fold(0f32, f32::max)
        + 2.0 * pad;
    let h = tooltip.lines.len() as f32 * line_h + 2.0 * pad;
    let max_x = (surface.width() as f32 - w).max(0.0);
    let max_y = (surface.height() as f32 - h).max(0.0);
    let x = tooltip.at.0.clamp(0.0, max_x);
    let y = tooltip.at.1.clamp(0.0, max_y);

    surface.rect((x, y), (x + w, y + h), cfg.axis_color)?;
    surface.rect((x + 1.0, y + 1.0), (x + w - 1.0, y + h - 1.0), cfg.background)?;
    let spec = TextSpec::new(font, cfg.axis_color, HAlign::Left, VAlign::Top);
    for (i, l) in tooltip.lines.iter().enumerate() {
        surface.text(l, (x + pad, y + pad + i as f32 * line_h), &spec)?;
    }
    Ok(())
}

/// Render the chart to an in-memory SVG document.
pub fn render_svg_string(agg: &Aggregation, title: &str, cfg: &ChartConfig) -> Result<String> {
    let mut buf = String::new();
    {
        let mut surface =
            PlottersSurface::new(SVGBackend::with_string(&mut buf, (cfg.width, cfg.height)));
        render_chart(&mut surface, agg, title, cfg)?;
        surface.present()?;
    }
    Ok(buf)
}

/// Render the chart to `out_path`; the format follows the extension (`.svg` or `.png`).
///
/// PNG output rasterizes text and therefore needs a TrueType font, either
/// registered through [`fonts::register_font_file`] or found among common system
/// locations.
pub fn render_to_file<P: AsRef<Path>>(
    agg: &Aggregation,
    title: &str,
    out_path: P,
    cfg: &ChartConfig,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let ext = out_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let size = (cfg.width, cfg.height);
    match ext.as_deref() {
        Some("svg") => {
            let mut surface = PlottersSurface::new(SVGBackend::new(path_string.as_str(), size));
            render_chart(&mut surface, agg, title, cfg)?;
            surface
                .present()
                .with_context(|| format!("writing {path_string}"))?;
        }
        Some("png") => {
            if !fonts::ensure_font() {
                bail!("PNG output needs a TrueType font; pass one with --font or write .svg instead");
            }
            let mut surface = PlottersSurface::new(BitMapBackend::new(path_string.as_str(), size));
            render_chart(&mut surface, agg, title, cfg)?;
            surface
                .present()
                .with_context(|| format!("writing {path_string}"))?;
        }
        _ => bail!("unsupported chart format for {path_string}, use .svg or .png"),
    }
    log::info!("wrote chart to {path_string}");
    Ok(())
}
