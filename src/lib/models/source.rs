use chrono::{DateTime, Utc};
use ndarray::{Array2, Array3};

use crate::{helpers::WrfPlotError, projection::MapProjection};

/// Read access to one model output file at its first time index
pub trait DataSource {
    fn has_variable(&self, name: &str) -> bool;

    /// 2-D (south_north, west_east) variable
    fn variable(&self, name: &str) -> Result<Array2<f32>, WrfPlotError>;

    /// 3-D (bottom_top, south_north, west_east) variable
    fn variable_3d(&self, name: &str) -> Result<Array3<f32>, WrfPlotError>;

    /// (lats, lons) of the mass grid
    fn coordinates(&self) -> Result<(Array2<f32>, Array2<f32>), WrfPlotError>;

    fn projection(&self) -> Result<MapProjection, WrfPlotError>;

    fn valid_time(&self) -> Result<DateTime<Utc>, WrfPlotError>;
}
