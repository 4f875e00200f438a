use ndarray::{Array2, Axis, Zip};

/// output length of an axis of `len` cells zoomed by `factor`
fn zoomed_len(len: usize, factor: f32) -> usize {
    usize::max(1, (len as f32 * factor).round_ties_even() as usize)
}

/// fractional source coordinate of output cell `i`, first and last cells aligned
fn source_coordinate(i: usize, len_in: usize, len_out: usize) -> f32 {
    if len_out <= 1 {
        0.0
    } else {
        i as f32 * (len_in - 1) as f32 / (len_out - 1) as f32
    }
}

/// (lower index, upper index, weight of the upper index)
fn bracket(coord: f32, len: usize) -> (usize, usize, f32) {
    let lower = (coord.floor() as usize).min(len - 1);
    let upper = (lower + 1).min(len - 1);
    (lower, upper, coord - lower as f32)
}

fn lerp(a: f32, b: f32, w: f32) -> f32 {
    if w == 0.0 {
        a
    } else if w == 1.0 {
        b
    } else {
        a * (1.0 - w) + b * w
    }
}

/// Bilinear upsampling. The output has `round(n * factor)` cells per axis
/// and the corner cells of input and output coincide.
pub fn zoom(values: &Array2<f32>, factor: f32) -> Array2<f32> {
    let (rows, cols) = values.dim();
    if rows == 0 || cols == 0 {
        return values.clone();
    }
    let out_rows = zoomed_len(rows, factor);
    let out_cols = zoomed_len(cols, factor);

    let mut out = Array2::<f32>::zeros((out_rows, out_cols));
    Zip::indexed(&mut out).par_for_each(|(i, j), value| {
        let (i0, i1, wi) = bracket(source_coordinate(i, rows, out_rows), rows);
        let (j0, j1, wj) = bracket(source_coordinate(j, cols, out_cols), cols);

        let top = lerp(values[[i0, j0]], values[[i0, j1]], wj);
        let bottom = lerp(values[[i1, j0]], values[[i1, j1]], wj);
        *value = lerp(top, bottom, wi);
    });
    out
}

/// index of `i` mirrored into `0..len` (d c b a | a b c d | d c b a)
fn reflect(i: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let mut i = i.rem_euclid(period);
    if i >= len {
        i = period - i - 1;
    }
    i as usize
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma + 0.5) as isize;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f32 / sigma).powi(2)).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

fn convolve_axis(values: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let radius = (kernel.len() / 2) as isize;
    let len = values.len_of(axis);
    let mut out = Array2::<f32>::zeros(values.dim());

    Zip::from(out.lanes_mut(axis))
        .and(values.lanes(axis))
        .par_for_each(|mut out_lane, lane| {
            for i in 0..len {
                out_lane[i] = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * lane[reflect(i as isize + k as isize - radius, len)])
                    .sum();
            }
        });
    out
}

/// Separable gaussian smoothing with mirrored borders, the kernel is
/// truncated at 4 sigma.
pub fn gaussian_filter(values: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 || values.is_empty() {
        return values.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let rows_smoothed = convolve_axis(values, &kernel, Axis(0));
    convolve_axis(&rows_smoothed, &kernel, Axis(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn zoom_shape_and_corners() {
        let values = array![[0.0, 1.0], [2.0, 3.0]];
        let zoomed = zoom(&values, 4.0);
        assert_eq!(zoomed.dim(), (8, 8));
        assert_eq!(zoomed[[0, 0]], 0.0);
        assert_eq!(zoomed[[0, 7]], 1.0);
        assert_eq!(zoomed[[7, 0]], 2.0);
        assert_eq!(zoomed[[7, 7]], 3.0);
    }

    #[test]
    fn zoom_is_linear_along_rows() {
        let values = array![[0.0, 7.0]];
        let zoomed = zoom(&values, 4.0);
        assert_eq!(zoomed.dim(), (4, 8));
        for j in 0..8 {
            assert!((zoomed[[0, j]] - j as f32).abs() < 1e-5);
            assert!((zoomed[[3, j]] - j as f32).abs() < 1e-5);
        }
    }

    #[test]
    fn zoom_rounds_output_shape() {
        let values = Array2::<f32>::ones((3, 5));
        // 4.5 rounds to even
        assert_eq!(zoom(&values, 1.5).dim(), (4, 8));
        assert_eq!(zoom(&values, 0.1).dim(), (1, 1));
    }

    #[test]
    fn zoom_keeps_missing_values_local() {
        let values = array![[1.0, 1.0, f32::NAN], [1.0, 1.0, 1.0]];
        let zoomed = zoom(&values, 2.0);
        assert_eq!(zoomed[[0, 0]], 1.0);
        assert!(zoomed[[0, 5]].is_nan());
        assert_eq!(zoomed[[3, 0]], 1.0);
    }

    #[test]
    fn reflect_mirrors_borders() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
        assert_eq!(reflect(-3, 1), 0);
    }

    #[test]
    fn gaussian_kernel_is_normalized() {
        let kernel = gaussian_kernel(0.8);
        // radius int(4 * 0.8 + 0.5) = 3
        assert_eq!(kernel.len(), 7);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(kernel[3] > kernel[2]);
    }

    #[test]
    fn gaussian_filter_preserves_constant_fields() {
        let values = Array2::<f32>::from_elem((5, 6), 3.5);
        let smoothed = gaussian_filter(&values, 0.8);
        for v in smoothed.iter() {
            assert!((v - 3.5).abs() < 1e-5);
        }
    }

    #[test]
    fn gaussian_filter_spreads_peaks() {
        let mut values = Array2::<f32>::zeros((7, 7));
        values[[3, 3]] = 1.0;
        let smoothed = gaussian_filter(&values, 1.0);
        assert!(smoothed[[3, 3]] < 1.0);
        assert!(smoothed[[3, 4]] > 0.0);
        assert!((smoothed.sum() - 1.0).abs() < 1e-4);
        assert_eq!(gaussian_filter(&values, 0.0), values);
    }
}
