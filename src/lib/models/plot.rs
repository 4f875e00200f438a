use ndarray::Array2;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    helpers::WrfPlotError,
    models::{
        palette::{Color, Colormap},
        source::DataSource,
    },
    modules::{
        max_dbz::models::MaxDbz, precipitation::models::AccPrecip,
        temperature::models::Temperature,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
pub enum PlotType {
    #[strum(serialize = "mdbz")]
    MaxDbz,
    #[strum(serialize = "temp")]
    Temperature,
    #[strum(serialize = "precip")]
    AccPrecip,
}

/// color table used for reflectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectivityTable {
    /// 19 bins of 3 dBZ above 15 dBZ
    #[default]
    Standard,
    /// 1 dBZ bins
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accumulation {
    /// amount fallen since the previous file
    #[default]
    Interval,
    /// amount fallen since the first file
    Total,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KindOptions {
    pub reflectivity_table: ReflectivityTable,
    pub accumulation: Accumulation,
}

/// Field specific part of a plot: what to read, how to transform it and
/// how to color and annotate it.
pub trait PlotKind: Send {
    fn plot_type(&self) -> PlotType;

    /// name of the output folder and file prefix
    fn variable_folder(&self) -> &str;

    fn colormap(&self) -> &Colormap;

    fn set_colormap(&mut self, colormap: Colormap);

    fn colorbar_label(&self) -> &str;

    fn friendly_name(&self) -> &str;

    /// color of coastlines and borders
    fn boundary_color(&self) -> Color {
        Color::WHITE
    }

    fn format_tick(&self, tick: f32) -> String {
        format!("{:.0}", tick)
    }

    fn labels_enabled(&self) -> bool {
        false
    }

    /// value to print at a labelled grid point, `None` to skip it
    fn label_value(&self, value: f32) -> Option<f32> {
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    /// reads the field in display units
    fn extract(&self, source: &dyn DataSource) -> Result<Array2<f32>, WrfPlotError>;

    /// Turns the extracted field into the plotted one. `None` skips the frame.
    fn prepare(&mut self, values: Array2<f32>) -> Result<Option<Array2<f32>>, WrfPlotError> {
        Ok(Some(values))
    }
}

impl PlotType {
    pub fn build(&self, options: &KindOptions) -> Result<Box<dyn PlotKind>, WrfPlotError> {
        let kind: Box<dyn PlotKind> = match self {
            PlotType::MaxDbz => Box::new(MaxDbz::new(options.reflectivity_table)?),
            PlotType::Temperature => Box::new(Temperature::new()?),
            PlotType::AccPrecip => Box::new(AccPrecip::new(options.accumulation)?),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn plot_type_names() {
        assert_eq!(PlotType::from_str("mdbz").unwrap(), PlotType::MaxDbz);
        assert_eq!(PlotType::from_str("temp").unwrap(), PlotType::Temperature);
        assert_eq!(PlotType::from_str("precip").unwrap(), PlotType::AccPrecip);
        assert!(PlotType::from_str("wind").is_err());
        assert_eq!(PlotType::AccPrecip.to_string(), "precip");
    }

    #[test]
    fn every_type_builds() {
        for plot_type in PlotType::iter() {
            let kind = plot_type.build(&KindOptions::default()).unwrap();
            assert_eq!(kind.plot_type(), plot_type);
            assert!(!kind.colormap().ticks.is_empty());
        }
    }

    #[test]
    fn folders() {
        let options = KindOptions::default();
        let folders: Vec<String> = PlotType::iter()
            .map(|t| t.build(&options).unwrap().variable_folder().to_string())
            .collect();
        assert_eq!(folders, vec!["max_dbz", "temperature", "accumulated_precipitation"]);
    }
}
