use ndarray::Array2;

use crate::{
    helpers::WrfPlotError,
    models::{
        palette::{hex_colors, BoundaryNorm, Color, Colormap, Extend, ListedColormap},
        plot::{PlotKind, PlotType, ReflectivityTable},
        source::DataSource,
    },
};

use super::{constants::*, functions::max_reflectivity};

fn ticks((first, last, step): (i32, i32, usize)) -> Vec<f32> {
    (first..=last).step_by(step).map(|t| t as f32).collect()
}

/// Light gray below 15 dBZ, then 3 dBZ bins up to 70 dBZ.
pub fn standard_colormap() -> Result<Colormap, WrfPlotError> {
    let mut colors = vec![Color::from_hex(LIGHT_GRAY)?];
    colors.extend(hex_colors(&STANDARD_COLORS)?);

    let cmap = ListedColormap::new(colors)?;
    let norm = BoundaryNorm::new(
        STANDARD_BIN_EDGES.to_vec(),
        STANDARD_COLORS.len(),
        Extend::Neither,
    )?;
    Ok(Colormap::new(cmap, norm, ticks(STANDARD_TICKS)))
}

/// 0, 2, 4, 6 and then 1 dBZ bins up to 70 dBZ, open ended above.
pub fn detailed_colormap() -> Result<Colormap, WrfPlotError> {
    let mut colors = vec![Color::from_hex(LIGHT_GRAY)?];
    colors.extend(hex_colors(&DETAILED_COLORS)?);

    let mut edges: Vec<f32> = vec![0.0, 2.0, 4.0];
    edges.extend((6..=70).map(|e| e as f32));

    let ncolors = colors.len();
    let cmap = ListedColormap::new(colors)?;
    let norm = BoundaryNorm::new(edges, ncolors, Extend::Max)?;
    Ok(Colormap::new(cmap, norm, ticks(DETAILED_TICKS)))
}

pub struct MaxDbz {
    colormap: Colormap,
}

impl MaxDbz {
    pub fn new(table: ReflectivityTable) -> Result<Self, WrfPlotError> {
        let colormap = match table {
            ReflectivityTable::Standard => standard_colormap()?,
            ReflectivityTable::Detailed => detailed_colormap()?,
        };
        Ok(MaxDbz { colormap })
    }
}

impl PlotKind for MaxDbz {
    fn plot_type(&self) -> PlotType {
        PlotType::MaxDbz
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

    fn extract(&self, source: &dyn DataSource) -> Result<Array2<f32>, WrfPlotError> {
        max_reflectivity(source)
    }
}
