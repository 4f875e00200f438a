use std::{error::Error, ops::Range, path::Path};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use ndarray::{Array2, Array3};
use netcdf::{extent::Extents, AttrValue};

use wrfplot::{
    helpers::{decode_cf_time, parse_wrf_file_time, WrfPlotError},
    models::source::DataSource,
    projection::MapProjection,
};

const LAT_NAME: &str = "XLAT";
const LON_NAME: &str = "XLONG";
const TIME_NAME: &str = "XTIME";
const TIME_DIM: &str = "Time";

/// One WRF output file, read at its first time index
pub struct WrfNetCdfSource {
    path: String,
    file: netcdf::File,
}

fn attribute_as_f64(file: &netcdf::File, name: &str) -> Result<f64, WrfPlotError> {
    let value = file
        .attribute(name)
        .ok_or_else(|| format!("Could not find attribute {name}"))?
        .value()
        .map_err(|err| format!("Could not read attribute {name}: {err}"))?;

    match value {
        AttrValue::Int(v) => Ok(v as f64),
        AttrValue::Short(v) => Ok(v as f64),
        AttrValue::Float(v) => Ok(v as f64),
        AttrValue::Double(v) => Ok(v),
        AttrValue::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("Invalid attribute {name} '{s}': {err}").into()),
        other => Err(format!("Unsupported type for attribute {name}: {other:?}").into()),
    }
}

impl WrfNetCdfSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = netcdf::open(path)?;
        Ok(WrfNetCdfSource {
            path: path.to_string_lossy().into_owned(),
            file,
        })
    }

    /// Reads the first time index of `name`, all other dimensions in full.
    /// Returns the values and the shape without the time dimension.
    fn read_first_time(&self, name: &str) -> Result<(Vec<f32>, Vec<usize>), WrfPlotError> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| format!("Could not find variable {name} in {}", self.path))?;

        let dimensions = var.dimensions();
        let mut ranges: Vec<Range<usize>> = Vec::with_capacity(dimensions.len());
        let mut shape = Vec::with_capacity(dimensions.len());
        for dim in dimensions {
            if dim.name() == TIME_DIM {
                if dim.len() == 0 {
                    return Err(format!("Variable {name} has no time steps").into());
                }
                ranges.push(0..1);
            } else {
                ranges.push(0..dim.len());
                shape.push(dim.len());
            }
        }

        let extents: Extents = ranges.as_slice().into();
        let values = var
            .values::<f32, _>(&extents)
            .map_err(|err| format!("Could not read variable {name}: {err}"))?
            .into_iter()
            .collect::<Vec<f32>>();

        Ok((values, shape))
    }

    fn time_from_xtime(&self) -> Result<DateTime<Utc>, WrfPlotError> {
        let var = self
            .file
            .variable(TIME_NAME)
            .ok_or_else(|| format!("Could not find variable {TIME_NAME}"))?;

        let units = match var.attribute("units").map(|attr| attr.value()) {
            Some(Ok(AttrValue::Str(units))) => units,
            _ => return Err(format!("Variable {TIME_NAME} has no units").into()),
        };

        let value = var
            .values::<f64, _>(Extents::All)
            .map_err(|err| format!("Could not read {TIME_NAME}: {err}"))?
            .into_iter()
            .next()
            .ok_or_else(|| format!("{TIME_NAME} is empty"))?;

        decode_cf_time(value, &units)
    }
}

impl DataSource for WrfNetCdfSource {
    fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    fn variable(&self, name: &str) -> Result<Array2<f32>, WrfPlotError> {
        let (values, shape) = self.read_first_time(name)?;
        match shape.as_slice() {
            [nrows, ncols] => Array2::from_shape_vec((*nrows, *ncols), values)
                .map_err(|err| format!("Could not shape {name}: {err}").into()),
            _ => Err(format!("Variable {name} is not 2-D, shape {shape:?}").into()),
        }
    }

    fn variable_3d(&self, name: &str) -> Result<Array3<f32>, WrfPlotError> {
        let (values, shape) = self.read_first_time(name)?;
        match shape.as_slice() {
            [nlev, nrows, ncols] => Array3::from_shape_vec((*nlev, *nrows, *ncols), values)
                .map_err(|err| format!("Could not shape {name}: {err}").into()),
            _ => Err(format!("Variable {name} is not 3-D, shape {shape:?}").into()),
        }
    }

    fn coordinates(&self) -> Result<(Array2<f32>, Array2<f32>), WrfPlotError> {
        let lats = self.variable(LAT_NAME)?;
        let lons = self.variable(LON_NAME)?;
        if lats.dim() != lons.dim() {
            return Err(format!(
                "{LAT_NAME} {:?} and {LON_NAME} {:?} differ in shape",
                lats.dim(),
                lons.dim()
            )
            .into());
        }
        Ok((lats, lons))
    }

    fn projection(&self) -> Result<MapProjection, WrfPlotError> {
        let map_proj = attribute_as_f64(&self.file, "MAP_PROJ")? as i32;
        let truelat1 = attribute_as_f64(&self.file, "TRUELAT1")?;
        let truelat2 = attribute_as_f64(&self.file, "TRUELAT2")?;
        let stand_lon = attribute_as_f64(&self.file, "STAND_LON")?;
        let cen_lat = attribute_as_f64(&self.file, "MOAD_CEN_LAT")?;
        debug!(
            "MAP_PROJ={map_proj} TRUELAT1={truelat1} TRUELAT2={truelat2} STAND_LON={stand_lon} MOAD_CEN_LAT={cen_lat}"
        );
        Ok(MapProjection::from_wrf(
            map_proj, truelat1, truelat2, stand_lon, cen_lat,
        ))
    }

    fn valid_time(&self) -> Result<DateTime<Utc>, WrfPlotError> {
        match self.time_from_xtime() {
            Ok(time) => Ok(time),
            Err(err) => {
                warn!("{}: {err}, using the file name", self.path);
                let file_name = Path::new(&self.path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                parse_wrf_file_time(&file_name)
                    .ok_or_else(|| format!("Could not determine the valid time of {}", self.path).into())
            }
        }
    }
}
