use plotters::style::RGBColor;

use crate::canvas::clip::Window;
use crate::error::CanvasError;

pub const BACKGROUND: RGBColor = RGBColor(182, 182, 182);
pub const AXIS_COLOR: RGBColor = RGBColor(0, 0, 0);

/// Largest buffer a configuration may describe, in pixels.
pub const MAX_PIXELS: u64 = 1 << 28;

/// Window geometry in metres, from which the pixel buffer is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
    resolution: f64,
    width: f64,
    height: f64,
    origin_left: f64,
    origin_bottom: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            resolution: 0.005,
            width: 3.0,
            height: 3.0,
            origin_left: 1.5,
            origin_bottom: 0.5,
        }
    }
}

impl CanvasConfig {
    pub fn new(
        resolution: f64,
        width: f64,
        height: f64,
        origin_left: f64,
        origin_bottom: f64,
    ) -> Result<Self, CanvasError> {
        let config = CanvasConfig {
            resolution,
            width,
            height,
            origin_left,
            origin_bottom,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolution(mut self, resolution: f64) -> Result<Self, CanvasError> {
        self.resolution = resolution;
        self.validate()?;
        Ok(self)
    }

    pub fn with_width(mut self, width: f64) -> Result<Self, CanvasError> {
        self.width = width;
        self.validate()?;
        Ok(self)
    }

    pub fn with_height(mut self, height: f64) -> Result<Self, CanvasError> {
        self.height = height;
        self.validate()?;
        Ok(self)
    }

    pub fn with_origin_from_left(mut self, left: f64) -> Result<Self, CanvasError> {
        self.origin_left = left;
        self.validate()?;
        Ok(self)
    }

    pub fn with_origin_from_bottom(mut self, bottom: f64) -> Result<Self, CanvasError> {
        self.origin_bottom = bottom;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), CanvasError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(CanvasError::InvalidConfig(
                "window extents must be finite".to_string(),
            ));
        }
        if !(self.origin_left.is_finite() && self.origin_bottom.is_finite()) {
            return Err(CanvasError::InvalidConfig(
                "origin offset must be finite".to_string(),
            ));
        }
        let (w, h) = (self.pixels(self.width), self.pixels(self.height));
        let unusable = || {
            CanvasError::InvalidConfig(format!(
                "window {}m x {}m at {}m/px gives an unusable {}x{} buffer",
                self.width, self.height, self.resolution, w, h
            ))
        };
        // the rasterizer addresses pixels with i32
        if w < 1.0 || h < 1.0 || w > i32::MAX as f64 || h > i32::MAX as f64 {
            return Err(unusable());
        }
        match (w as u64).checked_mul(h as u64) {
            Some(n) if n <= MAX_PIXELS => {}
            _ => return Err(unusable()),
        }
        let in_range = |metres: f64| self.pixels(metres).abs() < i32::MAX as f64;
        if !(in_range(self.origin_left) && in_range(self.origin_bottom)) {
            return Err(CanvasError::InvalidConfig(
                "origin offset is out of pixel range".to_string(),
            ));
        }
        Ok(())
    }

    fn pixels(&self, metres: f64) -> f64 {
        (metres / self.resolution).round()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn width_px(&self) -> u32 {
        self.pixels(self.width) as u32
    }

    pub fn height_px(&self) -> u32 {
        self.pixels(self.height) as u32
    }

    /// Origin offset in pixels from the top-left corner of the buffer.
    pub fn origin_px(&self) -> (i64, i64) {
        let x = self.pixels(self.origin_left) as i64;
        let y = self.height_px() as i64 - self.pixels(self.origin_bottom) as i64;
        (x, y)
    }

    pub fn to_pixel_f64(&self, x: f64, y: f64) -> (f64, f64) {
        let (ox, oy) = self.origin_px();
        (x / self.resolution + ox as f64, -y / self.resolution + oy as f64)
    }

    /// Pixel that contains the real point. May lie outside the buffer.
    pub fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let (px, py) = self.to_pixel_f64(x, y);
        (px.floor() as i64, py.floor() as i64)
    }

    pub fn to_real(&self, px: f64, py: f64) -> (f64, f64) {
        let (ox, oy) = self.origin_px();
        (
            (px - ox as f64) * self.resolution,
            -(py - oy as f64) * self.resolution,
        )
    }

    pub fn pixel_center(&self, px: i64, py: i64) -> (f64, f64) {
        self.to_real(px as f64 + 0.5, py as f64 + 0.5)
    }

    pub fn contains_pixel(&self, px: i64, py: i64) -> bool {
        px >= 0 && py >= 0 && px < self.width_px() as i64 && py < self.height_px() as i64
    }

    pub fn window(&self) -> Window {
        let (ox, oy) = self.origin_px();
        let (w, h) = (self.width_px() as i64, self.height_px() as i64);
        Window {
            x_min: self.resolution * (-ox) as f64,
            x_max: self.resolution * (w - ox) as f64,
            y_min: -self.resolution * (h - oy) as f64,
            y_max: -self.resolution * (-oy) as f64,
        }
    }
}

/// Colors and stroke width applied to subsequent drawing calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub point_color: RGBColor,
    pub line_color: RGBColor,
    pub line_width: u32,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            point_color: RGBColor(0, 0, 200),
            line_color: RGBColor(0, 0, 150),
            line_width: 1,
        }
    }
}
