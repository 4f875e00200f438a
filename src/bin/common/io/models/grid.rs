use ndarray::Array2;

/// Curvilinear grid with a nearest cell search by hill climbing
#[derive(Debug)]
pub struct IrregularGrid {
    pub nrows: usize,
    pub ncols: usize,
    pub lats: Vec<f32>,
    pub lons: Vec<f32>,
}

impl IrregularGrid {
    pub fn new(lats: &Array2<f32>, lons: &Array2<f32>) -> IrregularGrid {
        let (nrows, ncols) = lats.dim();
        IrregularGrid {
            nrows,
            ncols,
            lats: lats.iter().copied().collect(),
            lons: lons.iter().copied().collect(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn center(&self) -> (usize, usize) {
        (self.nrows / 2, self.ncols / 2)
    }

    fn error(&self, i: usize, j: usize, lat: f32, lon: f32) -> f32 {
        let idx = i * self.ncols + j;
        f32::powf(self.lons[idx] - lon, 2.0) + f32::powf(self.lats[idx] - lat, 2.0)
    }

    /// Nearest cell to (lat, lon), walking downhill from `start`.
    pub fn index_from(&self, lat: f32, lon: f32, start: (usize, usize)) -> (usize, usize) {
        let mut min_i = usize::min(start.0, self.nrows - 1);
        let mut min_j = usize::min(start.1, self.ncols - 1);
        let mut minerr = self.error(min_i, min_j, lat, lon);

        loop {
            let mut found = false;
            let (i, j) = (min_i, min_j);
            for ii in i.saturating_sub(1)..=usize::min(i + 1, self.nrows - 1) {
                for jj in j.saturating_sub(1)..=usize::min(j + 1, self.ncols - 1) {
                    let err = self.error(ii, jj, lat, lon);
                    if err < minerr {
                        minerr = err;
                        min_i = ii;
                        min_j = jj;
                        found = true;
                    }
                }
            }
            if !found {
                break;
            }
        }
        (min_i, min_j)
    }

    pub fn index(&self, lat: f32, lon: f32) -> (usize, usize) {
        self.index_from(lat, lon, self.center())
    }

    /// True when the point lies more than half a cell beyond the border
    /// cell (i, j) along `axis_step` = (di, dj) pointing inwards.
    fn beyond_border(&self, i: usize, j: usize, inner: (usize, usize), lat: f32, lon: f32) -> bool {
        let idx = i * self.ncols + j;
        let inner_idx = inner.0 * self.ncols + inner.1;
        let out_lon = self.lons[idx] - self.lons[inner_idx];
        let out_lat = self.lats[idx] - self.lats[inner_idx];
        let spacing = out_lon * out_lon + out_lat * out_lat;
        if spacing == 0.0 {
            return false;
        }
        let along = (lon - self.lons[idx]) * out_lon + (lat - self.lats[idx]) * out_lat;
        along > 0.5 * spacing
    }

    /// Nearest cell, or `None` when the point falls outside the grid.
    pub fn lookup(&self, lat: f32, lon: f32, start: (usize, usize)) -> Option<(usize, usize)> {
        let (i, j) = self.index_from(lat, lon, start);

        if self.nrows > 1 {
            if i == 0 && self.beyond_border(i, j, (1, j), lat, lon) {
                return None;
            }
            let last = self.nrows - 1;
            if i == last && self.beyond_border(i, j, (last - 1, j), lat, lon) {
                return None;
            }
        }
        if self.ncols > 1 {
            if j == 0 && self.beyond_border(i, j, (i, 1), lat, lon) {
                return None;
            }
            let last = self.ncols - 1;
            if j == last && self.beyond_border(i, j, (i, last - 1), lat, lon) {
                return None;
            }
        }
        Some((i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// regular 0.1° grid rotated by a small shear, rows go north
    fn sheared_grid(nrows: usize, ncols: usize) -> IrregularGrid {
        let lats = Array2::from_shape_fn((nrows, ncols), |(i, j)| 45.0 + 0.1 * i as f32 + 0.01 * j as f32);
        let lons = Array2::from_shape_fn((nrows, ncols), |(i, j)| 13.0 + 0.1 * j as f32 - 0.01 * i as f32);
        IrregularGrid::new(&lats, &lons)
    }

    #[test]
    fn finds_nearest_cell_from_any_start() {
        let grid = sheared_grid(20, 30);
        let (lat, lon) = (grid.lats[7 * 30 + 12], grid.lons[7 * 30 + 12]);
        assert_eq!(grid.index(lat + 0.02, lon - 0.02), (7, 12));
        assert_eq!(grid.index_from(lat, lon, (0, 0)), (7, 12));
        assert_eq!(grid.index_from(lat, lon, (19, 29)), (7, 12));
        // out of range start is clamped
        assert_eq!(grid.index_from(lat, lon, (100, 100)), (7, 12));
    }

    #[test]
    fn walks_to_the_corner() {
        let grid = sheared_grid(10, 10);
        assert_eq!(grid.index(44.0, 12.0), (0, 0));
        assert_eq!(grid.index(50.0, 20.0), (9, 9));
    }

    #[test]
    fn points_outside_have_no_cell() {
        let grid = sheared_grid(10, 10);
        let start = grid.center();
        assert_eq!(grid.lookup(45.0, 13.0, start), Some((0, 0)));
        // a quarter cell beyond the south-west corner still belongs to it
        assert_eq!(grid.lookup(44.975, 13.0, start), Some((0, 0)));
        assert_eq!(grid.lookup(44.0, 13.0, start), None);
        assert_eq!(grid.lookup(45.3, 12.0, start), None);
        assert_eq!(grid.lookup(45.3, 15.0, start), None);
        assert_eq!(grid.lookup(47.0, 13.3, start), None);
        assert!(grid.lookup(45.4, 13.4, start).is_some());
    }
}
