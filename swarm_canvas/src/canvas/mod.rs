//! Pixel canvas addressed in real-world coordinates.

pub mod clip;
pub mod config;

use std::convert::TryFrom;
use std::f64::consts::PI;
use std::path::Path;

use image::{Rgb, RgbImage, RgbaImage};
use plotters::prelude::{BitMapBackend, Color, IntoFont, ShapeStyle};
use plotters_backend::{BackendCoord, DrawingBackend};
use tracing::{debug, trace};

use crate::error::CanvasError;
use crate::robot::Locate;
use crate::stats::SwarmStatistic;

pub use clip::{Point, Segment, Window};
pub use config::{CanvasConfig, DrawState, AXIS_COLOR, BACKGROUND, MAX_PIXELS};
pub use plotters::style::RGBColor;

/// Half length of the segment standing in for an infinite line.
pub const LONG_LINE: f64 = 99999.0;
pub const DEFAULT_OUTPUT: &str = "result.png";
pub const TEXT_SIZE: f64 = 20.0;

const MIN_ARC_SEGMENTS: usize = 8;
const MAX_ARC_SEGMENTS: usize = 4096;

/// RGB buffer, row-major from the top-left corner, with a held baseline frame.
pub struct Canvas {
    config: CanvasConfig,
    state: DrawState,
    buffer: Vec<u8>,
    baseline: Vec<u8>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let mut canvas = Canvas {
            config,
            state: DrawState::default(),
            buffer: Vec::new(),
            baseline: Vec::new(),
        };
        canvas.reset();
        canvas
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.config.width_px()
    }

    pub fn height(&self) -> u32 {
        self.config.height_px()
    }

    pub fn pixel(&self, px: u32, py: u32) -> Option<RGBColor> {
        if px >= self.width() || py >= self.height() {
            return None;
        }
        let i = self.index(px, py);
        Some(RGBColor(
            self.buffer[i],
            self.buffer[i + 1],
            self.buffer[i + 2],
        ))
    }

    fn index(&self, px: u32, py: u32) -> usize {
        (py as usize * self.width() as usize + px as usize) * 3
    }

    fn put_pixel(&mut self, px: i64, py: i64, color: RGBColor) -> bool {
        if !self.config.contains_pixel(px, py) {
            return false;
        }
        let i = self.index(px as u32, py as u32);
        self.buffer[i] = color.0;
        self.buffer[i + 1] = color.1;
        self.buffer[i + 2] = color.2;
        true
    }

    /// Rebuilds the default frame (background and axes) and holds it.
    pub fn reset(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.buffer = [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2]
            .iter()
            .copied()
            .cycle()
            .take(w as usize * h as usize * 3)
            .collect();

        let (ox, oy) = self.config.origin_px();
        for px in 0..w as i64 {
            self.put_pixel(px, oy, AXIS_COLOR);
        }
        for py in 0..h as i64 {
            self.put_pixel(ox, py, AXIS_COLOR);
        }

        self.baseline = self.buffer.clone();
        debug!(width = w, height = h, origin_x = ox, origin_y = oy, "canvas reset");
    }

    /// Restores the held baseline frame.
    pub fn clear(&mut self) {
        self.buffer.copy_from_slice(&self.baseline);
    }

    /// Holds the current buffer as the baseline frame.
    pub fn hold(&mut self) {
        self.baseline.copy_from_slice(&self.buffer);
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
        self.reset();
    }

    pub fn set_resolution(&mut self, resolution: f64) -> Result<(), CanvasError> {
        let config = self.config.with_resolution(resolution)?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) -> Result<(), CanvasError> {
        let config = self.config.with_width(width)?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_height(&mut self, height: f64) -> Result<(), CanvasError> {
        let config = self.config.with_height(height)?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_origin_from_left(&mut self, left: f64) -> Result<(), CanvasError> {
        let config = self.config.with_origin_from_left(left)?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_origin_from_bottom(&mut self, bottom: f64) -> Result<(), CanvasError> {
        let config = self.config.with_origin_from_bottom(bottom)?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_point_color(&mut self, color: RGBColor) {
        self.state.point_color = color;
    }

    pub fn set_line_color(&mut self, color: RGBColor) {
        self.state.line_color = color;
    }

    pub fn set_line_width(&mut self, width: u32) -> Result<(), CanvasError> {
        if width == 0 {
            return Err(CanvasError::InvalidConfig(
                "line width must be at least one pixel".to_string(),
            ));
        }
        self.state.line_width = width;
        Ok(())
    }

    /// Plots one point in the point color. Points outside the frame are dropped.
    pub fn plot_point<L: Locate>(&mut self, p: &L) -> bool {
        let (x, y) = p.position();
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        let (px, py) = self.config.to_pixel(x, y);
        self.put_pixel(px, py, self.state.point_color)
    }

    /// Returns how many points landed inside the frame.
    pub fn plot_points<L: Locate>(&mut self, points: &[L]) -> usize {
        points.iter().filter(|p| self.plot_point(*p)).count()
    }

    fn stroke(&self) -> ShapeStyle {
        self.state.line_color.stroke_width(self.state.line_width)
    }

    /// Backend coordinate of a real point, `None` past the rasterizer's range.
    fn pixel_coord(&self, (x, y): Point) -> Option<BackendCoord> {
        let (px, py) = self.config.to_pixel(x, y);
        Some((i32::try_from(px).ok()?, i32::try_from(py).ok()?))
    }

    /// Backend coordinate of a point already clipped to the window. The far
    /// window edges floor onto column `w` and row `h`, so pull them back in.
    fn clipped_coord(&self, (x, y): Point) -> BackendCoord {
        let (px, py) = self.config.to_pixel(x, y);
        let max_x = self.width() as i64 - 1;
        let max_y = self.height() as i64 - 1;
        (px.max(0).min(max_x) as i32, py.max(0).min(max_y) as i32)
    }

    /// Straight line between two pixel coordinates, without clipping.
    pub fn line_px(&mut self, from: BackendCoord, to: BackendCoord) -> Result<(), CanvasError> {
        let style = self.stroke();
        let size = (self.width(), self.height());
        let mut backend = BitMapBackend::with_buffer(&mut self.buffer, size);
        backend
            .draw_line(from, to, &style)
            .map_err(|e| CanvasError::Backend(e.to_string()))
    }

    /// Line between two real points, clipped to the visible window.
    ///
    /// Returns the visible part that was drawn, if any.
    pub fn line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<Option<Segment>, CanvasError> {
        let clipped = self.config.window().clip((x1, y1), (x2, y2))?;
        trace!(?clipped, "clipped ({}, {})-({}, {})", x1, y1, x2, y2);
        if let Some((from, to)) = clipped {
            let (from_px, to_px) = (self.clipped_coord(from), self.clipped_coord(to));
            self.line_px(from_px, to_px)?;
        }
        Ok(clipped)
    }

    /// Line through `(x, y)` at `angle`, spanning the whole window.
    pub fn line_through(
        &mut self,
        x: f64,
        y: f64,
        angle: f64,
    ) -> Result<Option<Segment>, CanvasError> {
        let (dx, dy) = (LONG_LINE * angle.cos(), LONG_LINE * angle.sin());
        debug!(x1 = x + dx, y1 = y + dy, x2 = x - dx, y2 = y - dy, "long line");
        self.line(x + dx, y + dy, x - dx, y - dy)
    }

    /// Segment of `length` leaving `(x, y)` at `angle`.
    pub fn line_ra(
        &mut self,
        x: f64,
        y: f64,
        length: f64,
        angle: f64,
    ) -> Result<Option<Segment>, CanvasError> {
        self.line(x, y, x + length * angle.cos(), y + length * angle.sin())
    }

    pub fn circle(&mut self, x: f64, y: f64, r: f64, filled: bool) -> Result<(), CanvasError> {
        if !(x.is_finite() && y.is_finite() && r.is_finite()) {
            return Err(CanvasError::NonFiniteCoordinate);
        }
        let center = match self.pixel_coord((x, y)) {
            Some(center) => center,
            None => return Ok(()),
        };
        let radius = (r.abs() / self.config.resolution()).round() as u32;
        let style = self.stroke();
        let size = (self.width(), self.height());
        let mut backend = BitMapBackend::with_buffer(&mut self.buffer, size);
        backend
            .draw_circle(center, radius, &style, filled)
            .map_err(|e| CanvasError::Backend(e.to_string()))
    }

    /// Arc from `start` to `end` radians, counter-clockwise in world axes,
    /// drawn as a clipped polyline.
    pub fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64) -> Result<(), CanvasError> {
        let sweep = end - start;
        let span_px = r.abs() * sweep.abs() / self.config.resolution();
        let segments = if span_px.is_finite() {
            (span_px.ceil() as usize).max(MIN_ARC_SEGMENTS).min(MAX_ARC_SEGMENTS)
        } else {
            return Err(CanvasError::NonFiniteCoordinate);
        };

        let point = |i: usize| {
            let t = start + sweep * i as f64 / segments as f64;
            (x + r * t.cos(), y + r * t.sin())
        };
        let mut prev = point(0);
        for i in 1..=segments {
            let next = point(i);
            self.line(prev.0, prev.1, next.0, next.1)?;
            prev = next;
        }
        Ok(())
    }

    /// Robot glyph: body outline plus a stroke along the heading.
    pub fn robot(&mut self, x: f64, y: f64, r: f64, heading: f64) -> Result<(), CanvasError> {
        self.arc(x, y, r, 0.0, 2.0 * PI)?;
        self.line_ra(x, y, r, heading)?;
        Ok(())
    }

    /// Text anchored at a real coordinate, in the line color.
    ///
    /// The font family must have been registered with plotters beforehand.
    pub fn text(&mut self, x: f64, y: f64, s: &str) -> Result<(), CanvasError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(CanvasError::NonFiniteCoordinate);
        }
        let pos = match self.pixel_coord((x, y)) {
            Some(pos) => pos,
            None => return Ok(()),
        };
        let color = self.state.line_color;
        let style = ("sans-serif", TEXT_SIZE).into_font().color(&color);
        let size = (self.width(), self.height());
        let mut backend = BitMapBackend::with_buffer(&mut self.buffer, size);
        backend
            .draw_text(s, &style, pos)
            .map_err(|e| CanvasError::Backend(e.to_string()))
    }

    /// Top-left pixel for an image of `size` placed at real `(x, y)`,
    /// shifted back inside the buffer where it would overhang.
    fn placement(&self, x: f64, y: f64, (iw, ih): (u32, u32)) -> (u32, u32) {
        let (px, py) = self.config.to_pixel(x, y);
        let max_x = self.width().saturating_sub(iw) as i64;
        let max_y = self.height().saturating_sub(ih) as i64;
        (px.max(0).min(max_x) as u32, py.max(0).min(max_y) as u32)
    }

    /// Pastes `img` with its top-left corner at real `(x, y)`.
    pub fn include_image(&mut self, x: f64, y: f64, img: &RgbImage) {
        let (left, top) = self.placement(x, y, img.dimensions());
        let cols = img.width().min(self.width() - left);
        let rows = img.height().min(self.height() - top);
        for iy in 0..rows {
            for ix in 0..cols {
                let Rgb([r, g, b]) = *img.get_pixel(ix, iy);
                self.put_pixel((left + ix) as i64, (top + iy) as i64, RGBColor(r, g, b));
            }
        }
    }

    /// Like `include_image` but copies only pixels with non-zero alpha.
    pub fn overlay_masked(&mut self, x: f64, y: f64, img: &RgbaImage) {
        let (left, top) = self.placement(x, y, img.dimensions());
        let cols = img.width().min(self.width() - left);
        let rows = img.height().min(self.height() - top);
        for iy in 0..rows {
            for ix in 0..cols {
                let [r, g, b, a] = img.get_pixel(ix, iy).0;
                if a != 0 {
                    self.put_pixel((left + ix) as i64, (top + iy) as i64, RGBColor(r, g, b));
                }
            }
        }
    }

    /// Uncertainty indicator from the centroid along the dominant axis.
    pub fn draw_statistic(
        &mut self,
        stat: &SwarmStatistic,
    ) -> Result<Option<Segment>, CanvasError> {
        let (x2, y2) = stat.indicator_end();
        self.line(stat.xg, stat.yg, x2, y2)
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |px, py| {
            let i = self.index(px, py);
            Rgb([self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]])
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CanvasError> {
        let path = path.as_ref();
        self.to_image()
            .save(path)
            .map_err(|source| CanvasError::Export {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(?path, "canvas exported");
        Ok(())
    }
}

pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, CanvasError> {
    let path = path.as_ref();
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| CanvasError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage, CanvasError> {
    let path = path.as_ref();
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| CanvasError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}
