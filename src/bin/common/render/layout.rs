//! Figure geometry. Pixel coordinates have their origin at the top-left
//! corner of the canvas, figure fractions at the bottom-left.

use wrfplot::constants::{FIGURE_DPI, FIGURE_SIZE};

/// default subplot box, fractions of the figure
pub const SUBPLOT_LEFT: f64 = 0.125;
pub const SUBPLOT_RIGHT: f64 = 0.9;
pub const SUBPLOT_BOTTOM: f64 = 0.11;
pub const SUBPLOT_TOP: f64 = 0.88;

pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / 72.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        PixelRect {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn pad(&self, amount: f64) -> PixelRect {
        PixelRect {
            x0: self.x0 - amount,
            y0: self.y0 - amount,
            x1: self.x1 + amount,
            y1: self.y1 + amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub dpi: f64,
}

impl Default for Figure {
    fn default() -> Self {
        Figure::new(FIGURE_SIZE, FIGURE_SIZE, FIGURE_DPI)
    }
}

impl Figure {
    /// figure of `width` x `height` inches
    pub fn new(width: f32, height: f32, dpi: f32) -> Self {
        Figure {
            width: (width * dpi).round() as u32,
            height: (height * dpi).round() as u32,
            dpi: dpi as f64,
        }
    }

    pub fn points(&self, points: f64) -> f64 {
        points_to_pixels(points, self.dpi)
    }

    /// `[left, bottom, width, height]` in figure fractions
    pub fn rect_from_fractions(&self, position: [f32; 4]) -> PixelRect {
        let [left, bottom, width, height] = position.map(|v| v as f64);
        let w = self.width as f64;
        let h = self.height as f64;
        PixelRect::new(
            left * w,
            h - (bottom + height) * h,
            (left + width) * w,
            h - bottom * h,
        )
    }

    /// y pixel row of a height measured from the bottom of the figure
    pub fn row_from_bottom(&self, y: f64) -> f64 {
        self.height as f64 - y
    }

    pub fn subplot_box(&self) -> PixelRect {
        self.rect_from_fractions([
            SUBPLOT_LEFT as f32,
            SUBPLOT_BOTTOM as f32,
            (SUBPLOT_RIGHT - SUBPLOT_LEFT) as f32,
            (SUBPLOT_TOP - SUBPLOT_BOTTOM) as f32,
        ])
    }
}

/// Largest rectangle with `data_width / data_height` aspect centered in `area`.
pub fn fit_axes(area: &PixelRect, data_width: f64, data_height: f64) -> PixelRect {
    if data_width <= 0.0 || data_height <= 0.0 {
        return *area;
    }
    let aspect = data_height / data_width;
    let (width, height) = if area.width() * aspect <= area.height() {
        (area.width(), area.width() * aspect)
    } else {
        (area.height() / aspect, area.height())
    };
    let cx = (area.x0 + area.x1) / 2.0;
    let cy = (area.y0 + area.y1) / 2.0;
    PixelRect::new(
        cx - width / 2.0,
        cy - height / 2.0,
        cx + width / 2.0,
        cy + height / 2.0,
    )
}
