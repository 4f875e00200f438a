use image::RgbaImage;
use ndarray::Array2;

use wrfplot::models::{palette::Color, plot::PlotKind, region::Region};

use super::{
    map::MapView,
    text::{Fonts, HAlign, TextBox, VAlign},
};

#[derive(Debug, Clone, PartialEq)]
pub struct GridLabel {
    pub lon: f64,
    pub lat: f64,
    pub text: String,
}

/// Prints the field value at every `stride`-th grid point.
pub struct GridLabeler {
    stride: Option<usize>,
}

impl GridLabeler {
    pub fn new(stride: Option<usize>) -> Self {
        GridLabeler {
            stride: stride.filter(|s| *s > 0),
        }
    }

    pub fn enabled(&self) -> bool {
        self.stride.is_some()
    }

    pub fn select(
        &self,
        values: &Array2<f32>,
        lats: &Array2<f32>,
        lons: &Array2<f32>,
        region: &Region,
        kind: &dyn PlotKind,
    ) -> Vec<GridLabel> {
        let Some(stride) = self.stride else {
            return vec![];
        };
        let (nrows, ncols) = values.dim();

        let mut labels = vec![];
        for i in (0..nrows).step_by(stride) {
            for j in (0..ncols).step_by(stride) {
                let lat = lats[[i, j]] as f64;
                let lon = lons[[i, j]] as f64;
                if !region.contains_label_point(lon, lat) {
                    continue;
                }
                let Some(value) = kind.label_value(values[[i, j]]) else {
                    continue;
                };
                labels.push(GridLabel {
                    lon,
                    lat,
                    text: format!("{}", value.round_ties_even() as i64),
                });
            }
        }
        labels
    }

    /// draws the labels on the map raster, text beyond the axes is clipped
    pub fn annotate(
        &self,
        image: &mut RgbaImage,
        view: &MapView,
        fonts: &Fonts,
        em_px: f64,
        labels: &[GridLabel],
    ) {
        for label in labels {
            let (x, y) = view.to_pixel(label.lon, label.lat);
            TextBox::new(&fonts.regular, em_px, &label.text).draw(
                image,
                Color::BLACK,
                x,
                y,
                HAlign::Center,
                VAlign::Center,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wrfplot::models::plot::{KindOptions, PlotType};

    use super::*;

    fn grid() -> (Array2<f32>, Array2<f32>, Array2<f32>) {
        let lats = Array2::from_shape_fn((12, 12), |(i, _)| 45.0 + 0.2 * i as f32);
        let lons = Array2::from_shape_fn((12, 12), |(_, j)| 13.0 + 0.3 * j as f32);
        let values = Array2::from_shape_fn((12, 12), |(i, j)| (i + j) as f32 + 0.5);
        (values, lats, lons)
    }

    #[test]
    fn disabled_without_stride() {
        let (values, lats, lons) = grid();
        let region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        let kind = PlotType::Temperature.build(&KindOptions::default()).unwrap();
        for stride in [None, Some(0)] {
            let labeler = GridLabeler::new(stride);
            assert!(!labeler.enabled());
            assert!(labeler.select(&values, &lats, &lons, &region, kind.as_ref()).is_empty());
        }
    }

    #[test]
    fn strided_points_inside_the_padded_region() {
        let (values, lats, lons) = grid();
        let region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        let kind = PlotType::Temperature.build(&KindOptions::default()).unwrap();
        let labels = GridLabeler::new(Some(3)).select(&values, &lats, &lons, &region, kind.as_ref());

        // rows 3, 6, 9 (lat 45.6, 46.2, 46.8), columns 3, 6, 9 (lon 13.9, 14.8, 15.7)
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[0].text, "6");
        assert!((labels[0].lat - 45.6).abs() < 1e-5);
        // halves round to even
        assert_eq!(labels[4].text, "12");
        assert_eq!(labels[5].text, "16");
        assert_eq!(labels[8].text, "18");
    }

    #[test]
    fn precipitation_labels_need_rain() {
        let (mut values, lats, lons) = grid();
        values.fill(0.5);
        values[[6, 6]] = 3.4;
        values[[9, 3]] = f32::NAN;
        let region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        let kind = PlotType::AccPrecip.build(&KindOptions::default()).unwrap();
        let labels = GridLabeler::new(Some(3)).select(&values, &lats, &lons, &region, kind.as_ref());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "3");
    }
}
