use ndarray::Array2;

use crate::{
    helpers::WrfPlotError,
    models::{
        palette::{hex_colors, BoundaryNorm, Colormap, Extend, ListedColormap},
        plot::{PlotKind, PlotType},
        source::DataSource,
    },
};

use super::{constants::*, functions::kelvin_to_celsius};

pub fn temperature_colormap() -> Result<Colormap, WrfPlotError> {
    let (first, last, step) = LEVELS;
    let levels: Vec<f32> = (first..=last).step_by(step).map(|l| l as f32).collect();

    let cmap = ListedColormap::new(hex_colors(&COLORS)?)?;
    let norm = BoundaryNorm::new(levels.clone(), cmap.len(), Extend::Both)?;
    Ok(Colormap::new(cmap, norm, levels))
}

/// 2 m temperature in °C
pub struct Temperature {
    colormap: Colormap,
}

impl Temperature {
    pub fn new() -> Result<Self, WrfPlotError> {
        Ok(Temperature {
            colormap: temperature_colormap()?,
        })
    }
}

impl PlotKind for Temperature {
    fn plot_type(&self) -> PlotType {
        PlotType::Temperature
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

    fn labels_enabled(&self) -> bool {
        true
    }

    fn extract(&self, source: &dyn DataSource) -> Result<Array2<f32>, WrfPlotError> {
        Ok(kelvin_to_celsius(&source.variable(T2)?))
    }
}
