use std::{collections::HashMap, fs::File, io::Read};

use serde_derive::{Deserialize, Serialize};

use wrfplot::{
    constants::{DEFAULT_DATA_SOURCE, DEFAULT_FILE_PATTERN, DEFAULT_TIMEZONE, ZOOM_FACTOR},
    helpers::WrfPlotError,
    models::{
        palette::Colormap,
        plot::{Accumulation, PlotType, ReflectivityTable},
        region::Region,
    },
};

pub const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
pub const DEFAULT_BOLD_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Optional YAML configuration, every key has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigContainer {
    /// regions added to (or shadowing) the built-in ones
    pub regions: HashMap<String, Region>,
    pub font_path: String,
    pub bold_font_path: String,
    /// GeoJSON coastlines, skipped when unset
    pub coastline_path: Option<String>,
    /// GeoJSON country borders, skipped when unset
    pub borders_path: Option<String>,
    pub data_source: String,
    pub timezone: String,
    pub file_pattern: String,
    /// palette file per plot type name ("mdbz", "temp", "precip")
    pub palettes: HashMap<String, String>,
    pub reflectivity_table: ReflectivityTable,
    pub accumulation: Accumulation,
    /// Gaussian smoothing before zooming, disabled when unset
    pub smooth_sigma: Option<f32>,
    pub zoom_factor: f32,
}

impl Default for ConfigContainer {
    fn default() -> Self {
        ConfigContainer {
            regions: HashMap::new(),
            font_path: DEFAULT_FONT.to_string(),
            bold_font_path: DEFAULT_BOLD_FONT.to_string(),
            coastline_path: None,
            borders_path: None,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            palettes: HashMap::new(),
            reflectivity_table: ReflectivityTable::default(),
            accumulation: Accumulation::default(),
            smooth_sigma: None,
            zoom_factor: ZOOM_FACTOR,
        }
    }
}

impl ConfigContainer {
    pub fn from_file(config_file: &str) -> Result<ConfigContainer, WrfPlotError> {
        if config_file.ends_with(".yaml") || config_file.ends_with(".yml") {
            Self::from_yaml(config_file)
        } else {
            Err(WrfPlotError::from(format!(
                "Unsupported config file format: {}",
                config_file
            )))
        }
    }

    pub fn from_yaml(config_file: &str) -> Result<Self, WrfPlotError> {
        let mut file = File::open(config_file)
            .map_err(|err| format!("Cannot open config file {}: {}", config_file, err))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| format!("Cannot read config file {}: {}", config_file, err))?;

        Self::from_yaml_str(&contents)
            .map_err(|err| format!("Cannot parse config file {}: {}", config_file, err).into())
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, WrfPlotError> {
        let conf: ConfigContainer =
            serde_yaml::from_str(contents).map_err(|err| format!("{err}"))?;
        if conf.zoom_factor <= 0.0 {
            return Err(format!("zoom_factor must be positive, got {}", conf.zoom_factor).into());
        }
        if let Some(sigma) = conf.smooth_sigma {
            if sigma < 0.0 {
                return Err(format!("smooth_sigma must not be negative, got {sigma}").into());
            }
        }
        Ok(conf)
    }

    /// palette override configured for `plot_type`
    pub fn palette_for(&self, plot_type: PlotType) -> Result<Option<Colormap>, WrfPlotError> {
        match self.palettes.get(&plot_type.to_string()) {
            Some(path) => Ok(Some(Colormap::from_palette_file(path)?)),
            None => Ok(None),
        }
    }
}
