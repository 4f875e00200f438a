use image::{imageops, imageops::FilterType, RgbaImage};

use wrfplot::{
    constants::{LOGO_MAX_HEIGHT, LOGO_MAX_WIDTH},
    helpers::WrfPlotError,
};

use super::canvas::Canvas;

/// size of a `width` x `height` logo scaled to fit the logo box
pub fn logo_size(width: u32, height: u32) -> (u32, u32) {
    let scale = f32::min(LOGO_MAX_WIDTH / width as f32, LOGO_MAX_HEIGHT / height as f32);
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}

pub fn load_logo(path: &str) -> Result<RgbaImage, WrfPlotError> {
    let logo = image::open(path)
        .map_err(|err| format!("Logo load failed for {path}: {err}"))?
        .to_rgba8();
    if logo.width() == 0 || logo.height() == 0 {
        return Err(format!("Logo {path} is empty").into());
    }
    let (width, height) = logo_size(logo.width(), logo.height());
    Ok(imageops::resize(&logo, width, height, FilterType::CatmullRom))
}

/// Places the logo with its lower-left corner at `position`,
/// pixels from the lower-left corner of the figure.
pub fn place_logo(canvas: &mut Canvas, logo: &RgbaImage, position: (u32, u32)) {
    let x = position.0 as i64;
    let y = canvas.figure().height as i64 - position.1 as i64 - logo.height() as i64;
    canvas.overlay(logo, x, y);
}
