use image::{imageops, Rgba, RgbaImage};

use wrfplot::models::palette::Color;

use super::layout::{Figure, PixelRect};

pub fn rgba(color: Color) -> Rgba<u8> {
    Rgba(color.rgba())
}

/// Figure raster that remembers the extent of everything drawn on it.
pub struct Canvas {
    pub image: RgbaImage,
    figure: Figure,
    content: Option<PixelRect>,
}

impl Canvas {
    pub fn new(figure: Figure, background: Color) -> Self {
        Canvas {
            image: RgbaImage::from_pixel(figure.width, figure.height, rgba(background)),
            figure,
            content: None,
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn content(&self) -> Option<PixelRect> {
        self.content
    }

    /// extends the drawn content by `rect`
    pub fn mark(&mut self, rect: PixelRect) {
        self.content = Some(match self.content {
            Some(content) => content.union(&rect),
            None => rect,
        });
    }

    /// alpha blends `layer` with its top-left corner at (x, y)
    pub fn overlay(&mut self, layer: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, layer, x, y);
        self.mark(PixelRect::new(
            x as f64,
            y as f64,
            x as f64 + layer.width() as f64,
            y as f64 + layer.height() as f64,
        ));
    }

    /// Crops the canvas to the drawn content plus `pad` pixels on every side.
    pub fn crop_tight(&self, pad: f64) -> RgbaImage {
        let Some(content) = self.content else {
            return self.image.clone();
        };
        let bounds = content.pad(pad);
        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = (bounds.x1.ceil() as u32).min(self.image.width());
        let y1 = (bounds.y1.ceil() as u32).min(self.image.height());
        if x1 <= x0 || y1 <= y0 {
            return self.image.clone();
        }
        imageops::crop_imm(&self.image, x0, y0, x1 - x0, y1 - y0).to_image()
    }
}
