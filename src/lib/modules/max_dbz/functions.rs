use std::f64::consts::PI;

use ndarray::{Array2, Array3, Axis, Zip};

use crate::{helpers::WrfPlotError, models::source::DataSource};

use super::constants::*;

fn factor_rain() -> f64 {
    GAMMA_SEVEN * 1e18 * (1.0 / (PI * RHOWAT)).powf(1.75)
}

fn factor_ice(density: f64) -> f64 {
    factor_rain() * (density / RHOWAT).powi(2) * ALPHA
}

/// temperature [K] from perturbation potential temperature [K] and pressure [Pa]
pub fn temperature_from_theta(theta_pert: f32, pressure: f32) -> f32 {
    let theta = theta_pert as f64 + THETA_BASE;
    (theta * (pressure as f64 / P1000MB).powf(RD_CP)) as f32
}

/// Simulated reflectivity [dBZ] of one cell with constant intercept parameters.
/// Without a snow field (`qsnow == None`) rain below freezing counts as snow.
pub fn dbz(
    pressure: f32,
    temperature: f32,
    qvapor: f32,
    qrain: f32,
    qsnow: Option<f32>,
    qgraup: f32,
) -> f32 {
    let pressure = pressure as f64;
    let temperature = temperature as f64;
    let qvapor = (qvapor as f64).max(0.0);
    let mut qrain = (qrain as f64).max(0.0);
    let qgraup = (qgraup as f64).max(0.0);
    let qsnow = match qsnow {
        Some(q) => (q as f64).max(0.0),
        None if temperature < CELKEL => {
            let q = qrain;
            qrain = 0.0;
            q
        }
        None => 0.0,
    };

    let virtual_t = temperature * (EPS + qvapor) / (EPS * (1.0 + qvapor));
    let rho_air = pressure / (RD * virtual_t);

    let z_e = factor_rain() * (rho_air * qrain).powf(1.75) / RN0_R.powf(0.75)
        + factor_ice(RHO_SNOW) * (rho_air * qsnow).powf(1.75) / RN0_S.powf(0.75)
        + factor_ice(RHO_GRAUPEL) * (rho_air * qgraup).powf(1.75) / RN0_G.powf(0.75);

    (10.0 * z_e.max(MIN_ZE).log10()) as f32
}

/// maximum over the vertical axis, missing values are ignored
pub fn column_max(values: &Array3<f32>) -> Array2<f32> {
    values.fold_axis(Axis(0), f32::NAN, |acc, v| acc.max(*v))
}

fn check_shape(name: &str, values: &Array3<f32>, shape: (usize, usize, usize)) -> Result<(), WrfPlotError> {
    if values.dim() != shape {
        return Err(format!("{name} has shape {:?}, expected {:?}", values.dim(), shape).into());
    }
    Ok(())
}

/// 3-D reflectivity from pressure, temperature and mixing ratios
pub fn reflectivity(
    pressure: &Array3<f32>,
    temperature: &Array3<f32>,
    qvapor: &Array3<f32>,
    qrain: &Array3<f32>,
    qsnow: Option<&Array3<f32>>,
    qgraup: Option<&Array3<f32>>,
) -> Result<Array3<f32>, WrfPlotError> {
    let shape = pressure.dim();
    check_shape(QVAPOR, qvapor, shape)?;
    check_shape(QRAIN, qrain, shape)?;
    check_shape("temperature", temperature, shape)?;
    if let Some(qsnow) = qsnow {
        check_shape(QSNOW, qsnow, shape)?;
    }
    if let Some(qgraup) = qgraup {
        check_shape(QGRAUP, qgraup, shape)?;
    }

    let mut out = Array3::<f32>::zeros(shape);
    Zip::indexed(&mut out).par_for_each(|idx, value| {
        *value = dbz(
            pressure[idx],
            temperature[idx],
            qvapor[idx],
            qrain[idx],
            qsnow.map(|q| q[idx]),
            qgraup.map_or(0.0, |q| q[idx]),
        );
    });
    Ok(out)
}

/// Column maximum reflectivity. Uses the model's own `REFL_10CM` when
/// present, the hydrometeor diagnostic otherwise.
pub fn max_reflectivity(source: &dyn DataSource) -> Result<Array2<f32>, WrfPlotError> {
    if source.has_variable(REFL_10CM) {
        return Ok(column_max(&source.variable_3d(REFL_10CM)?));
    }

    let pressure_pert = source.variable_3d(PRESSURE_PERT)?;
    let pressure_base = source.variable_3d(PRESSURE_BASE)?;
    check_shape(PRESSURE_BASE, &pressure_base, pressure_pert.dim())?;
    let pressure = pressure_pert + &pressure_base;

    let theta_pert = source.variable_3d(THETA_PERT)?;
    check_shape(THETA_PERT, &theta_pert, pressure.dim())?;
    let mut temperature = Array3::<f32>::zeros(pressure.dim());
    Zip::from(&mut temperature)
        .and(&theta_pert)
        .and(&pressure)
        .for_each(|t, &theta, &p| *t = temperature_from_theta(theta, p));

    let qvapor = source.variable_3d(QVAPOR)?;
    let qrain = source.variable_3d(QRAIN)?;
    let qsnow = if source.has_variable(QSNOW) {
        Some(source.variable_3d(QSNOW)?)
    } else {
        None
    };
    let qgraup = if source.has_variable(QGRAUP) {
        Some(source.variable_3d(QGRAUP)?)
    } else {
        None
    };

    let dbz = reflectivity(
        &pressure,
        &temperature,
        &qvapor,
        &qrain,
        qsnow.as_ref(),
        qgraup.as_ref(),
    )?;
    Ok(column_max(&dbz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn clear_air_is_minus_thirty() {
        assert_eq!(dbz(90000.0, 280.0, 0.005, 0.0, Some(0.0), 0.0), -30.0);
        // negative mixing ratios are clamped
        assert_eq!(dbz(90000.0, 280.0, 0.005, -1e-4, Some(-1e-4), -1e-4), -30.0);
    }

    #[test]
    fn rain_increases_reflectivity() {
        let light = dbz(90000.0, 285.0, 0.008, 1e-4, Some(0.0), 0.0);
        let heavy = dbz(90000.0, 285.0, 0.008, 1e-3, Some(0.0), 0.0);
        assert!(light > 10.0 && light < 40.0, "{light}");
        assert!(heavy > light);
        // 1.75 power law: ten times the mixing ratio adds 17.5 dBZ
        assert!((heavy - light - 17.5).abs() < 1e-3);
    }

    #[test]
    fn cold_rain_counts_as_snow_without_snow_field() {
        let as_snow = dbz(70000.0, 265.0, 0.002, 0.0, Some(5e-4), 0.0);
        let cold_rain = dbz(70000.0, 265.0, 0.002, 5e-4, None, 0.0);
        assert!((as_snow - cold_rain).abs() < 1e-4);

        let warm_rain = dbz(70000.0, 275.0, 0.002, 5e-4, None, 0.0);
        let warm_rain_with_snow = dbz(70000.0, 275.0, 0.002, 5e-4, Some(0.0), 0.0);
        assert!((warm_rain - warm_rain_with_snow).abs() < 1e-4);
    }

    #[test]
    fn theta_to_temperature() {
        assert!((temperature_from_theta(0.0, 100_000.0) - 300.0).abs() < 1e-4);
        assert!(temperature_from_theta(0.0, 85_000.0) < 300.0);
    }

    #[test]
    fn column_max_skips_missing() {
        let values = array![[[1.0, f32::NAN]], [[3.0, f32::NAN]], [[2.0, 5.0]]];
        let max = column_max(&values);
        assert_eq!(max, array![[3.0, 5.0]]);
    }

    #[test]
    fn reflectivity_checks_shapes() {
        let a = Array3::<f32>::zeros((2, 2, 2));
        let b = Array3::<f32>::zeros((1, 2, 2));
        assert!(reflectivity(&a, &a, &a, &b, None, None).is_err());
        let dbz = reflectivity(&a.mapv(|_| 90000.0), &a.mapv(|_| 280.0), &a, &a, None, None).unwrap();
        assert!(dbz.iter().all(|v| *v == -30.0));
    }
}
