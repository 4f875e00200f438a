use imageproc::{
    drawing::{draw_filled_rect_mut, draw_polygon_mut},
    point::Point,
    rect::Rect,
};

use wrfplot::{
    constants::TICK_FONT_SIZE,
    models::{
        palette::{Color, Colormap},
        plot::PlotKind,
    },
};

use super::{
    canvas::{rgba, Canvas},
    layout::PixelRect,
    text::{Fonts, HAlign, TextBox, VAlign},
};

/// length of the extension triangles relative to the bar
const EXTEND_FRACTION: f64 = 0.05;
/// tick length, tick width, tick label pad and axis label pad [pt]
const TICK_LENGTH: f64 = 3.5;
const TICK_WIDTH: f64 = 0.8;
const TICK_PAD: f64 = 3.5;
const LABEL_PAD: f64 = 8.0;

/// Position of `value` along a bar with one equal width segment per
/// boundary interval, as a fraction of the bar length.
pub fn tick_fraction(boundaries: &[f32], value: f32) -> Option<f64> {
    let n = boundaries.len().checked_sub(1)?;
    if n == 0 || value.is_nan() {
        return None;
    }
    if value < boundaries[0] || value > boundaries[n] {
        return None;
    }
    let k = boundaries
        .windows(2)
        .position(|w| value >= w[0] && value <= w[1])?;
    let (lo, hi) = (boundaries[k] as f64, boundaries[k + 1] as f64);
    let within = if hi > lo { (value as f64 - lo) / (hi - lo) } else { 0.0 };
    Some((k as f64 + within) / n as f64)
}

/// color of each segment, taken at the interval midpoint
pub fn segment_colors(colormap: &Colormap) -> Vec<Color> {
    colormap
        .norm
        .boundaries()
        .windows(2)
        .map(|w| colormap.color_for((w[0] + w[1]) / 2.0))
        .collect()
}

fn triangle(canvas: &mut Canvas, points: [(f64, f64); 3], color: Color) {
    let points: Vec<Point<i32>> = points
        .iter()
        .map(|(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    if points[0] == points[2] {
        return;
    }
    draw_polygon_mut(&mut canvas.image, &points, rgba(color));
}

/// Horizontal colorbar in `bar` with ticks and label below it.
/// Returns the area covered by the bar, its extensions and the text.
pub fn draw_colorbar(
    canvas: &mut Canvas,
    fonts: &Fonts,
    bar: PixelRect,
    colormap: &Colormap,
    kind: &dyn PlotKind,
) -> PixelRect {
    let figure = *canvas.figure();
    let boundaries = colormap.norm.boundaries();
    let colors = segment_colors(colormap);
    let n = colors.len().max(1) as f64;

    for (k, color) in colors.iter().enumerate() {
        let x0 = (bar.x0 + bar.width() * k as f64 / n).round();
        let x1 = (bar.x0 + bar.width() * (k + 1) as f64 / n).round();
        let width = (x1 - x0).max(1.0) as u32;
        let height = bar.height().round().max(1.0) as u32;
        let rect = Rect::at(x0 as i32, bar.y0.round() as i32).of_size(width, height);
        draw_filled_rect_mut(&mut canvas.image, rect, rgba(*color));
    }

    let mut covered = bar;
    let extension = bar.width() * EXTEND_FRACTION;
    let y_mid = (bar.y0 + bar.y1) / 2.0;
    let extend = colormap.norm.extend();
    if extend.low() {
        let tip = bar.x0 - extension;
        triangle(
            canvas,
            [(bar.x0, bar.y0), (tip, y_mid), (bar.x0, bar.y1)],
            colormap.cmap.under(),
        );
        covered = covered.union(&PixelRect::new(tip, bar.y0, bar.x0, bar.y1));
    }
    if extend.high() {
        let tip = bar.x1 + extension;
        triangle(
            canvas,
            [(bar.x1, bar.y0), (tip, y_mid), (bar.x1, bar.y1)],
            colormap.cmap.over(),
        );
        covered = covered.union(&PixelRect::new(bar.x1, bar.y0, tip, bar.y1));
    }

    let tick_length = figure.points(TICK_LENGTH);
    let tick_width = figure.points(TICK_WIDTH).round().max(1.0) as u32;
    let label_top = bar.y1 + tick_length + figure.points(TICK_PAD);
    let em = figure.points(TICK_FONT_SIZE as f64);
    let mut labels_bottom = label_top;

    for tick in &colormap.ticks {
        let Some(fraction) = tick_fraction(boundaries, *tick) else {
            continue;
        };
        let x = bar.x0 + fraction * bar.width();
        let mark = Rect::at((x - tick_width as f64 / 2.0).round() as i32, bar.y1.round() as i32)
            .of_size(tick_width, tick_length.round().max(1.0) as u32);
        draw_filled_rect_mut(&mut canvas.image, mark, rgba(Color::BLACK));

        let text = kind.format_tick(*tick);
        let label = TextBox::new(&fonts.regular, em, &text);
        let bounds = label.draw(
            &mut canvas.image,
            Color::WHITE,
            x,
            label_top,
            HAlign::Center,
            VAlign::Top,
        );
        labels_bottom = labels_bottom.max(bounds.y1);
        covered = covered.union(&bounds);
    }

    let title = TextBox::new(&fonts.bold, em, kind.colorbar_label());
    let bounds = title.draw(
        &mut canvas.image,
        Color::WHITE,
        (bar.x0 + bar.x1) / 2.0,
        labels_bottom + figure.points(LABEL_PAD),
        HAlign::Center,
        VAlign::Top,
    );
    covered.union(&bounds)
}

#[cfg(test)]
mod tests {
    use wrfplot::{
        models::{palette::Extend, plot::ReflectivityTable},
        modules::{
            max_dbz::{
                constants::LIGHT_GRAY,
                models::{detailed_colormap, standard_colormap, MaxDbz},
            },
            precipitation::models::precipitation_colormap,
            temperature::models::temperature_colormap,
        },
    };

    use super::*;

    #[test]
    fn ticks_sit_inside_their_interval() {
        let boundaries = [0.0, 15.0, 18.0, 21.0];
        assert_eq!(tick_fraction(&boundaries, 0.0), Some(0.0));
        assert_eq!(tick_fraction(&boundaries, 15.0), Some(1.0 / 3.0));
        assert_eq!(tick_fraction(&boundaries, 19.5), Some(2.5 / 3.0));
        assert_eq!(tick_fraction(&boundaries, 21.0), Some(1.0));
        assert_eq!(tick_fraction(&boundaries, 22.0), None);
        assert_eq!(tick_fraction(&boundaries, -1.0), None);
        assert_eq!(tick_fraction(&[1.0], 1.0), None);
    }

    #[test]
    fn every_tick_is_on_the_bar() {
        for colormap in [
            standard_colormap().unwrap(),
            temperature_colormap().unwrap(),
            precipitation_colormap().unwrap(),
        ] {
            for tick in &colormap.ticks {
                assert!(tick_fraction(colormap.norm.boundaries(), *tick).is_some(), "{tick}");
            }
        }
    }

    #[test]
    fn segments_follow_the_mesh_colors() {
        let colormap = standard_colormap().unwrap();
        let colors = segment_colors(&colormap);
        assert_eq!(colors.len(), 19);
        assert_eq!(colors[0], colormap.color_for(5.0));
        assert_eq!(colors[18], colormap.color_for(68.0));
    }

    #[test]
    fn detailed_reflectivity_bar() {
        let kind = MaxDbz::new(ReflectivityTable::Detailed).unwrap();
        let colormap = kind.colormap();
        let boundaries = colormap.norm.boundaries();

        let labels: Vec<String> = colormap.ticks.iter().map(|t| kind.format_tick(*t)).collect();
        let expected: Vec<String> = (10..=70).step_by(5).map(|t| t.to_string()).collect();
        assert_eq!(labels, expected);

        // 0, 2, 4, 6 and then one segment per dBZ
        let colors = segment_colors(colormap);
        assert_eq!(colors.len(), 67);
        assert_eq!(colors[0], Color::from_hex(LIGHT_GRAY).unwrap());
        assert_eq!(tick_fraction(boundaries, 10.0), Some(7.0 / 67.0));
        assert_eq!(tick_fraction(boundaries, 70.0), Some(1.0));
        assert_eq!(colormap.norm.extend(), Extend::Max);
        assert_eq!(detailed_colormap().unwrap().ticks, colormap.ticks);
    }
}
