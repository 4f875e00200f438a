use std::path::PathBuf;

use chrono_tz::Tz;

use wrfplot::{
    helpers::{parse_timezone, WrfPlotError},
    models::{
        palette::Colormap,
        plot::{KindOptions, PlotType},
        region::Region,
    },
};

use super::builder::ConfigContainer;

/// command line part of the settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_dir: String,
    pub output_dir: String,
    pub logo_path: String,
    pub region: String,
    pub stride: Option<usize>,
    pub plot_type: PlotType,
    pub weather_model: String,
}

/// Everything a plotter needs, resolved from the command line and the
/// configuration file.
#[derive(Debug, Clone)]
pub struct PlotSettings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub logo_path: String,
    pub region_name: String,
    pub region: Region,
    pub stride: Option<usize>,
    pub plot_type: PlotType,
    pub weather_model: String,
    pub font_path: String,
    pub bold_font_path: String,
    pub coastline_path: Option<String>,
    pub borders_path: Option<String>,
    pub data_source: String,
    pub timezone: Tz,
    pub file_pattern: String,
    pub kind_options: KindOptions,
    pub smooth_sigma: Option<f32>,
    pub zoom_factor: f32,
    pub palette: Option<Colormap>,
}

impl PlotSettings {
    pub fn new(options: RunOptions, config: &ConfigContainer) -> Result<Self, WrfPlotError> {
        let region = Region::lookup(&options.region, &config.regions)?;
        region.validate()?;

        Ok(PlotSettings {
            data_dir: PathBuf::from(&options.data_dir),
            output_dir: PathBuf::from(&options.output_dir),
            logo_path: options.logo_path,
            region_name: options.region,
            region,
            stride: options.stride.filter(|s| *s > 0),
            plot_type: options.plot_type,
            weather_model: options.weather_model,
            font_path: config.font_path.clone(),
            bold_font_path: config.bold_font_path.clone(),
            coastline_path: config.coastline_path.clone(),
            borders_path: config.borders_path.clone(),
            data_source: config.data_source.clone(),
            timezone: parse_timezone(&config.timezone)?,
            file_pattern: config.file_pattern.clone(),
            kind_options: KindOptions {
                reflectivity_table: config.reflectivity_table,
                accumulation: config.accumulation,
            },
            smooth_sigma: config.smooth_sigma.filter(|s| *s > 0.0),
            zoom_factor: config.zoom_factor,
            palette: config.palette_for(options.plot_type)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use wrfplot::models::plot::ReflectivityTable;

    use super::*;

    fn options(region: &str) -> RunOptions {
        RunOptions {
            data_dir: "data".into(),
            output_dir: "outputs".into(),
            logo_path: "logo_512_39.webp".into(),
            region: region.into(),
            stride: Some(0),
            plot_type: PlotType::MaxDbz,
            weather_model: "icon".into(),
        }
    }

    #[test]
    fn resolves_defaults() {
        let settings = PlotSettings::new(options("slovenia"), &ConfigContainer::default()).unwrap();
        assert_eq!(settings.region.lon_max, 16.45);
        assert_eq!(settings.stride, None);
        assert_eq!(settings.timezone, chrono_tz::Europe::Ljubljana);
        assert_eq!(settings.kind_options.reflectivity_table, ReflectivityTable::Standard);
        assert!(settings.palette.is_none());
    }

    #[test]
    fn rejects_unknown_region_and_timezone() {
        let err = PlotSettings::new(options("mars"), &ConfigContainer::default()).unwrap_err();
        assert_eq!(err.to_string(), "Region 'mars' is not defined");

        let config = ConfigContainer {
            timezone: "Mars/Olympus".into(),
            ..ConfigContainer::default()
        };
        assert!(PlotSettings::new(options("slovenia"), &config).is_err());
    }
}
