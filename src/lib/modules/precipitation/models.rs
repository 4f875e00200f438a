use ndarray::Array2;

use crate::{
    helpers::WrfPlotError,
    models::{
        palette::{hex_colors, BoundaryNorm, Color, Colormap, Extend, ListedColormap},
        plot::{Accumulation, PlotKind, PlotType},
        source::DataSource,
    },
};

use super::{
    constants::*,
    functions::{accumulate, total_precipitation},
};

pub fn precipitation_colormap() -> Result<Colormap, WrfPlotError> {
    let cmap = ListedColormap::new(hex_colors(&COLORS)?)?;
    let norm = BoundaryNorm::new(LEVELS.to_vec(), cmap.len(), Extend::Neither)?;
    Ok(Colormap::new(cmap, norm, LEVELS.to_vec()))
}

/// Precipitation fallen since the previous file (or since the first one).
/// The first file only seeds the state and is never plotted.
pub struct AccPrecip {
    colormap: Colormap,
    accumulation: Accumulation,
    previous: Option<Array2<f32>>,
}

impl AccPrecip {
    pub fn new(accumulation: Accumulation) -> Result<Self, WrfPlotError> {
        Ok(AccPrecip {
            colormap: precipitation_colormap()?,
            accumulation,
            previous: None,
        })
    }
}

impl PlotKind for AccPrecip {
    fn plot_type(&self) -> PlotType {
        PlotType::AccPrecip
    }

    fn variable_folder(&self) -> &str {
        VARIABLE_FOLDER
    }

    fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
    }

    fn colorbar_label(&self) -> &str {
        COLORBAR_LABEL
    }

    fn friendly_name(&self) -> &str {
        FRIENDLY_NAME
    }

    fn boundary_color(&self) -> Color {
        Color::BLACK
    }

    fn format_tick(&self, tick: f32) -> String {
        if tick < 1.0 {
            format!("{:.1}", tick)
        } else {
            format!("{}", tick.trunc() as i64)
        }
    }

    fn labels_enabled(&self) -> bool {
        true
    }

    fn label_value(&self, value: f32) -> Option<f32> {
        if value > LABEL_THRESHOLD {
            Some(value)
        } else {
            None
        }
    }

    fn extract(&self, source: &dyn DataSource) -> Result<Array2<f32>, WrfPlotError> {
        let rainnc = source.variable(RAINNC)?;
        let rainc = if source.has_variable(RAINC) {
            Some(source.variable(RAINC)?)
        } else {
            None
        };
        total_precipitation(rainnc, rainc)
    }

    fn prepare(&mut self, values: Array2<f32>) -> Result<Option<Array2<f32>>, WrfPlotError> {
        let Some(previous) = &self.previous else {
            self.previous = Some(values);
            return Ok(None);
        };

        let amount = accumulate(&values, previous)?;
        if self.accumulation == Accumulation::Interval {
            self.previous = Some(values);
        }
        Ok(Some(amount))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::models::source::memory::MemorySource;

    #[test]
    fn interval_accumulation() {
        let mut kind = AccPrecip::new(Accumulation::Interval).unwrap();
        assert!(kind.prepare(array![[1.0, 2.0]]).unwrap().is_none());
        assert_eq!(kind.prepare(array![[3.0, 2.5]]).unwrap(), Some(array![[2.0, 0.5]]));
        assert_eq!(kind.prepare(array![[4.0, 2.5]]).unwrap(), Some(array![[1.0, 0.0]]));
    }

    #[test]
    fn total_accumulation() {
        let mut kind = AccPrecip::new(Accumulation::Total).unwrap();
        assert!(kind.prepare(array![[1.0]]).unwrap().is_none());
        assert_eq!(kind.prepare(array![[3.0]]).unwrap(), Some(array![[2.0]]));
        assert_eq!(kind.prepare(array![[4.0]]).unwrap(), Some(array![[3.0]]));
    }

    #[test]
    fn reset_becomes_missing() {
        let mut kind = AccPrecip::new(Accumulation::Interval).unwrap();
        kind.prepare(array![[10.0]]).unwrap();
        let amount = kind.prepare(array![[0.0]]).unwrap().unwrap();
        assert!(amount[[0, 0]].is_nan());
    }

    #[test]
    fn ticks_and_labels() {
        let kind = AccPrecip::new(Accumulation::Interval).unwrap();
        assert_eq!(kind.format_tick(0.1), "0.1");
        assert_eq!(kind.format_tick(0.5), "0.5");
        assert_eq!(kind.format_tick(1.0), "1");
        assert_eq!(kind.format_tick(250.0), "250");
        assert_eq!(kind.label_value(0.9), None);
        assert_eq!(kind.label_value(1.2), Some(1.2));
        assert_eq!(kind.label_value(f32::NAN), None);
        assert_eq!(kind.boundary_color(), Color::BLACK);
    }

    #[test]
    fn colors_stretch_over_levels() {
        let colormap = precipitation_colormap().unwrap();
        assert_eq!(colormap.color_for(0.05), Color::from_hex("#ffffff").unwrap());
        assert_eq!(colormap.color_for(0.2), Color::from_hex("#ffffff").unwrap());
        assert_eq!(colormap.color_for(190.0), Color::from_hex("#d87fdd").unwrap());
        assert_eq!(colormap.color_for(299.0), Color::from_hex("#f5d9fc").unwrap());
        assert_eq!(colormap.color_for(300.0), Color::from_hex("#f5d9fc").unwrap());
    }

    #[test]
    fn sums_convective_rain() {
        let source = MemorySource::default()
            .with_2d(RAINNC, array![[1.0, 2.0]])
            .with_2d(RAINC, array![[0.5, 0.5]]);
        let kind = AccPrecip::new(Accumulation::Interval).unwrap();
        assert_eq!(kind.extract(&source).unwrap(), array![[1.5, 2.5]]);

        let source = MemorySource::default().with_2d(RAINNC, array![[1.0, 2.0]]);
        assert_eq!(kind.extract(&source).unwrap(), array![[1.0, 2.0]]);
    }
}
