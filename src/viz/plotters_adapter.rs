//! [`DrawingSurface`] over a plotters drawing area (SVG or bitmap backend).

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{DrawingSurface, HAlign, Point, Stroke, TextSpec, VAlign};
use crate::config::Rgb;

pub fn rgb_color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn px((x, y): Point) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn line_style(stroke: Stroke) -> ShapeStyle {
    rgb_color(stroke.color).stroke_width(stroke.width.round().max(1.0) as u32)
}

fn anchor(spec: &TextSpec) -> Pos {
    let h = match spec.h {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v = match spec.v {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    Pos::new(h, v)
}

/// Wraps any plotters backend; call [`PlottersSurface::present`] once drawing is done.
pub struct PlottersSurface<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
}

impl<DB: DrawingBackend> PlottersSurface<DB> {
    pub fn new(backend: DB) -> Self {
        Self {
            area: backend.into_drawing_area(),
        }
    }

    /// Flush to the backend's target (file or string).
    pub fn present(&self) -> Result<()> {
        self.area.present().map_err(|e| anyhow!("{:?}", e))
    }
}

impl<DB: DrawingBackend> DrawingSurface for PlottersSurface<DB> {
    fn width(&self) -> u32 {
        self.area.dim_in_pixel().0
    }

    fn height(&self) -> u32 {
        self.area.dim_in_pixel().1
    }

    fn clear(&mut self, background: Rgb) -> Result<()> {
        self.area
            .fill(&rgb_color(background))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn line_path(&mut self, points: &[Point], stroke: Stroke) -> Result<()> {
        let pts: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
        self.area
            .draw(&PathElement::new(pts, line_style(stroke)))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Rgb) -> Result<()> {
        let r = radius.round().max(1.0) as i32;
        self.area
            .draw(&Circle::new(px(center), r, rgb_color(fill).filled()))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn rect(&mut self, top_left: Point, bottom_right: Point, fill: Rgb) -> Result<()> {
        self.area
            .draw(&Rectangle::new(
                [px(top_left), px(bottom_right)],
                rgb_color(fill).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn text(&mut self, text: &str, at: Point, spec: &TextSpec) -> Result<()> {
        let mut font = (FontFamily::SansSerif, spec.size as f64).into_font();
        if spec.vertical {
            font = font.transform(FontTransform::Rotate270);
        }
        let style = font.color(&rgb_color(spec.color)).pos(anchor(spec));
        self.area
            .draw(&Text::new(text.to_string(), px(at), style))
            .map_err(|e| anyhow!("{:?}", e))
    }
}
