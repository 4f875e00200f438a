use std::fs;

use image::RgbaImage;
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use wrfplot::{helpers::WrfPlotError, models::palette::Color};

use super::{canvas::rgba, layout::PixelRect};

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

pub struct Fonts {
    pub regular: Font<'static>,
    pub bold: Font<'static>,
}

fn load_font(path: &str) -> Result<Font<'static>, WrfPlotError> {
    let bytes = fs::read(path).map_err(|err| format!("Cannot read font {path}: {err}"))?;
    Font::try_from_vec(bytes).ok_or_else(|| format!("Invalid font file {path}").into())
}

impl Fonts {
    pub fn load(regular: &str, bold: &str) -> Result<Self, WrfPlotError> {
        Ok(Fonts {
            regular: load_font(regular)?,
            bold: load_font(bold)?,
        })
    }
}

/// rusttype scale whose em square is `em_px` pixels
pub fn em_scale(font: &Font, em_px: f64) -> Scale {
    let metrics = font.v_metrics_unscaled();
    let units_per_em = font.units_per_em() as f64;
    let line = (metrics.ascent - metrics.descent) as f64;
    if units_per_em <= 0.0 || line <= 0.0 {
        return Scale::uniform(em_px as f32);
    }
    Scale::uniform((em_px * line / units_per_em) as f32)
}

/// A single line of text ready to be placed.
pub struct TextBox<'a> {
    font: &'a Font<'static>,
    scale: Scale,
    text: &'a str,
    width: f64,
    height: f64,
}

impl<'a> TextBox<'a> {
    pub fn new(font: &'a Font<'static>, em_px: f64, text: &'a str) -> Self {
        let scale = em_scale(font, em_px);
        let (width, _) = text_size(scale, font, text);
        let metrics = font.v_metrics(scale);
        TextBox {
            font,
            scale,
            text,
            width: width.max(0) as f64,
            height: (metrics.ascent - metrics.descent) as f64,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// box of the text when anchored at (x, y) with the given alignment
    pub fn bounds(&self, x: f64, y: f64, halign: HAlign, valign: VAlign) -> PixelRect {
        let left = match halign {
            HAlign::Left => x,
            HAlign::Center => x - self.width / 2.0,
            HAlign::Right => x - self.width,
        };
        let top = match valign {
            VAlign::Top => y,
            VAlign::Center => y - self.height / 2.0,
            VAlign::Bottom => y - self.height,
        };
        PixelRect::new(left, top, left + self.width, top + self.height)
    }

    /// Draws the text and returns its box.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        color: Color,
        x: f64,
        y: f64,
        halign: HAlign,
        valign: VAlign,
    ) -> PixelRect {
        let bounds = self.bounds(x, y, halign, valign);
        draw_text_mut(
            image,
            rgba(color),
            bounds.x0.round() as i32,
            bounds.y0.round() as i32,
            self.scale,
            self.font,
            self.text,
        );
        bounds
    }
}
