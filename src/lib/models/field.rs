use chrono::{DateTime, Utc};
use ndarray::Array2;
use ndarray_stats::QuantileExt;

use crate::helpers::WrfPlotError;

/// One 2-D field on the curvilinear model grid
#[derive(Debug, Clone)]
pub struct Field {
    pub values: Array2<f32>,
    pub lats: Array2<f32>,
    pub lons: Array2<f32>,
    pub valid_time: DateTime<Utc>,
}

impl Field {
    pub fn new(
        values: Array2<f32>,
        lats: Array2<f32>,
        lons: Array2<f32>,
        valid_time: DateTime<Utc>,
    ) -> Result<Self, WrfPlotError> {
        if values.dim() != lats.dim() || values.dim() != lons.dim() {
            return Err(format!(
                "Field shape {:?} does not match coordinates {:?} / {:?}",
                values.dim(),
                lats.dim(),
                lons.dim()
            )
            .into());
        }
        if values.is_empty() {
            return Err("Field is empty".into());
        }
        Ok(Field {
            values,
            lats,
            lons,
            valid_time,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// maximum ignoring missing values, NaN when everything is missing
    pub fn max(&self) -> f32 {
        *self.values.max_skipnan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn shape_mismatch_is_rejected() {
        let values = Array2::<f32>::zeros((2, 3));
        let coords = Array2::<f32>::zeros((3, 2));
        assert!(Field::new(values, coords.clone(), coords, Utc::now()).is_err());
    }

    #[test]
    fn max_skips_missing() {
        let values = array![[1.0, f32::NAN], [4.5, 2.0]];
        let coords = Array2::<f32>::zeros((2, 2));
        let field = Field::new(values, coords.clone(), coords, Utc::now()).unwrap();
        assert_eq!(field.max(), 4.5);
        assert_eq!(field.shape(), (2, 2));
    }
}
