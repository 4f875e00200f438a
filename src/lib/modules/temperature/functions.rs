use ndarray::Array2;

use crate::constants::KELVIN_OFFSET;

pub fn kelvin_to_celsius(values: &Array2<f32>) -> Array2<f32> {
    values.mapv(|k| k - KELVIN_OFFSET)
}
