use ndarray::{Array2, Zip};

use crate::helpers::WrfPlotError;

/// grid scale plus (when available) convective precipitation
pub fn total_precipitation(
    rainnc: Array2<f32>,
    rainc: Option<Array2<f32>>,
) -> Result<Array2<f32>, WrfPlotError> {
    match rainc {
        Some(rainc) if rainc.dim() != rainnc.dim() => Err(format!(
            "RAINC shape {:?} does not match RAINNC shape {:?}",
            rainc.dim(),
            rainnc.dim()
        )
        .into()),
        Some(rainc) => Ok(rainnc + &rainc),
        None => Ok(rainnc),
    }
}

/// Precipitation fallen between two cumulative snapshots. Negative
/// differences (model restarts, bucket resets) become missing.
pub fn accumulate(
    current: &Array2<f32>,
    previous: &Array2<f32>,
) -> Result<Array2<f32>, WrfPlotError> {
    if current.dim() != previous.dim() {
        return Err(format!(
            "Cannot accumulate fields of shape {:?} and {:?}",
            current.dim(),
            previous.dim()
        )
        .into());
    }
    let mut amount = Array2::<f32>::zeros(current.dim());
    Zip::from(&mut amount)
        .and(current)
        .and(previous)
        .for_each(|amount, &current, &previous| {
            let diff = current - previous;
            *amount = if diff >= 0.0 { diff } else { f32::NAN };
        });
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn adds_convective_rain() {
        let total = total_precipitation(array![[1.0, 2.0]], Some(array![[0.5, 0.0]])).unwrap();
        assert_eq!(total, array![[1.5, 2.0]]);
        assert_eq!(total_precipitation(array![[1.0]], None).unwrap(), array![[1.0]]);
        assert!(total_precipitation(array![[1.0]], Some(array![[1.0, 2.0]])).is_err());
    }

    #[test]
    fn negative_differences_are_missing() {
        let amount = accumulate(&array![[5.0, 1.0, 3.0]], &array![[2.0, 4.0, 3.0]]).unwrap();
        assert_eq!(amount[[0, 0]], 3.0);
        assert!(amount[[0, 1]].is_nan());
        assert_eq!(amount[[0, 2]], 0.0);
    }

    #[test]
    fn shape_mismatch() {
        assert!(accumulate(&array![[1.0]], &array![[1.0, 2.0]]).is_err());
    }
}
