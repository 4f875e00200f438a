use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::DateTime;
use chrono_tz::Tz;
use image::RgbaImage;
use log::debug;
use serde_derive::{Deserialize, Serialize};

use wrfplot::{helpers::file_time, helpers::WrfPlotError, models::region::Region};

/// JSON sidecar written next to every image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
    pub variable: String,
    pub valid_time: String,
    pub run_time: String,
}

impl GeoReference {
    pub fn new(region: &Region, variable: &str, valid: &DateTime<Tz>, run: &DateTime<Tz>) -> Self {
        GeoReference {
            west: region.lon_min,
            east: region.lon_max,
            south: region.lat_min,
            north: region.lat_max,
            variable: variable.to_string(),
            valid_time: valid.to_rfc3339(),
            run_time: run.to_rfc3339(),
        }
    }
}

/// `<output_dir>/<weather_model>/<region>/<folder>`
pub fn output_dir(base: &Path, weather_model: &str, region: &str, folder: &str) -> PathBuf {
    base.join(weather_model).join(region).join(folder)
}

pub struct PngWriter {
    path: PathBuf,
    name: String,
}

impl PngWriter {
    /// Creates the output directory if needed.
    pub fn new(path: PathBuf, name: &str) -> Result<Self, WrfPlotError> {
        fs::create_dir_all(&path)
            .map_err(|err| format!("Cannot create output directory {}: {err}", path.display()))?;
        Ok(PngWriter {
            path,
            name: name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<name>_<YYYYmmdd_HHMM>.png` for the local valid time
    pub fn file_for(&self, valid: &DateTime<Tz>) -> PathBuf {
        self.path
            .join(format!("{}_{}.png", self.name, file_time(valid)))
    }

    pub fn write(
        &self,
        file: &Path,
        image: &RgbaImage,
        georef: &GeoReference,
    ) -> Result<(), WrfPlotError> {
        debug!("[PNG] Writing {}", file.display());
        write_png(file, image)
            .map_err(|err| format!("Cannot write file {}: error {err}", file.display()))?;

        let json_file = file.with_extension("json");
        let json = serde_json::to_string_pretty(georef)
            .map_err(|err| format!("Cannot serialize georeference: {err}"))?;
        let mut output = File::create(&json_file)
            .map_err(|err| format!("Cannot create {}: {err}", json_file.display()))?;
        output
            .write_all(json.as_bytes())
            .map_err(|err| format!("Cannot write {}: {err}", json_file.display()))?;

        debug!("[PNG] Done writing {}", file.display());
        Ok(())
    }
}

fn write_png(file: &Path, image: &RgbaImage) -> Result<(), Box<dyn std::error::Error>> {
    let output = File::create(file)?;
    let w = BufWriter::new(output);

    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    encoder.set_filter(png::FilterType::NoFilter);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(())
}
