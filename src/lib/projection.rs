use std::f64::consts::PI;

/// sphere radius used by WRF [m]
pub const WRF_EARTH_RADIUS: f64 = 6_370_000.0;

/// WRF `MAP_PROJ` code of the Lambert conformal projection
pub const MAP_PROJ_LAMBERT: i32 = 1;

const EDGE_SAMPLES: usize = 50;

/// Lambert conformal conic on a sphere, centered on (`lon0`, `lat0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformal {
    lon0: f64,
    radius: f64,
    n: f64,
    f: f64,
    rho0: f64,
}

impl LambertConformal {
    pub fn new(truelat1: f64, truelat2: f64, stand_lon: f64, cen_lat: f64, radius: f64) -> Self {
        let to_rad = PI / 180.0;
        let lat1 = truelat1 * to_rad;
        let lat2 = truelat2 * to_rad;
        let lat0 = cen_lat * to_rad;

        let n = if (lat1 - lat2).abs() < 1e-10 {
            // tangent cone
            lat1.sin()
        } else {
            let ln_ratio = (lat1.cos() / lat2.cos()).ln();
            let tan_ratio = ((PI / 4.0 + lat2 / 2.0).tan() / (PI / 4.0 + lat1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (lat1.cos() * (PI / 4.0 + lat1 / 2.0).tan().powf(n)) / n;
        let rho0 = radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        LambertConformal {
            lon0: stand_lon * to_rad,
            radius,
            n,
            f,
            rho0,
        }
    }

    /// (lon, lat) [deg] -> (x, y) [m]
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;

        let mut dlon = lon_deg * to_rad - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    /// (x, y) [m] -> (lon, lat) [deg]
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;
        let sign = self.n.signum();

        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();
        let theta = (sign * x).atan2(sign * dy);

        let lat = if rho == 0.0 {
            sign * PI / 2.0
        } else {
            2.0 * (self.radius * self.f / rho).powf(1.0 / self.n).atan() - PI / 2.0
        };
        let lon = self.lon0 + theta / self.n;

        (lon * to_deg, lat * to_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjection {
    /// projected coordinates are (lon, lat) in degrees
    PlateCarree,
    LambertConformal(LambertConformal),
}

impl MapProjection {
    /// projection described by the WRF global attributes
    pub fn from_wrf(
        map_proj: i32,
        truelat1: f64,
        truelat2: f64,
        stand_lon: f64,
        cen_lat: f64,
    ) -> Self {
        if map_proj == MAP_PROJ_LAMBERT {
            MapProjection::LambertConformal(LambertConformal::new(
                truelat1,
                truelat2,
                stand_lon,
                cen_lat,
                WRF_EARTH_RADIUS,
            ))
        } else {
            MapProjection::PlateCarree
        }
    }

    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            MapProjection::PlateCarree => (lon, lat),
            MapProjection::LambertConformal(lcc) => lcc.forward(lon, lat),
        }
    }

    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            MapProjection::PlateCarree => (x, y),
            MapProjection::LambertConformal(lcc) => lcc.inverse(x, y),
        }
    }

    /// Projects a lon/lat box by sampling its edges.
    /// Returns (x_min, x_max, y_min, y_max).
    pub fn project_extent(
        &self,
        lon_min: f64,
        lon_max: f64,
        lat_min: f64,
        lat_max: f64,
    ) -> (f64, f64, f64, f64) {
        let mut x_min = f64::MAX;
        let mut x_max = f64::MIN;
        let mut y_min = f64::MAX;
        let mut y_max = f64::MIN;

        for t in 0..=EDGE_SAMPLES {
            let frac = t as f64 / EDGE_SAMPLES as f64;
            let lon = lon_min + frac * (lon_max - lon_min);
            let lat = lat_min + frac * (lat_max - lat_min);
            for (lon, lat) in [(lon, lat_min), (lon, lat_max), (lon_min, lat), (lon_max, lat)] {
                let (x, y) = self.forward(lon, lat);
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }

        (x_min, x_max, y_min, y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slovenia_lambert() -> MapProjection {
        MapProjection::from_wrf(1, 46.0, 46.0, 14.5, 46.0)
    }

    #[test]
    fn center_maps_to_origin() {
        let proj = slovenia_lambert();
        let (x, y) = proj.forward(14.5, 46.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn lambert_round_trip() {
        let proj = MapProjection::from_wrf(1, 30.0, 60.0, 10.0, 45.0);
        for (lon, lat) in [(12.4, 44.7), (16.45, 47.2), (-3.0, 38.0), (25.0, 55.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-6, "{lon} != {lon2}");
            assert!((lat - lat2).abs() < 1e-6, "{lat} != {lat2}");
        }
    }

    #[test]
    fn north_is_up() {
        let proj = slovenia_lambert();
        let (_, y_south) = proj.forward(14.5, 45.0);
        let (_, y_north) = proj.forward(14.5, 47.0);
        let (x_west, _) = proj.forward(13.0, 46.0);
        let (x_east, _) = proj.forward(16.0, 46.0);
        assert!(y_north > y_south);
        assert!(x_east > x_west);
    }

    #[test]
    fn extent_covers_the_box_edges() {
        let proj = slovenia_lambert();
        let (x_min, x_max, y_min, y_max) = proj.project_extent(13.3, 16.45, 45.4, 47.2);
        for (lon, lat) in [(13.3, 45.4), (16.45, 47.2), (14.8, 47.2), (14.8, 45.4)] {
            let (x, y) = proj.forward(lon, lat);
            assert!(x >= x_min - 1e-6 && x <= x_max + 1e-6);
            assert!(y >= y_min - 1e-6 && y <= y_max + 1e-6);
        }
        // parallels sag between the corners
        let (_, y_corner) = proj.forward(13.3, 45.4);
        assert!(y_min < y_corner);
    }

    #[test]
    fn plate_carree_is_identity() {
        let proj = MapProjection::from_wrf(6, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(proj, MapProjection::PlateCarree);
        assert_eq!(proj.forward(14.0, 46.0), (14.0, 46.0));
        let (x_min, x_max, y_min, y_max) = proj.project_extent(13.3, 16.45, 45.4, 47.2);
        assert!((x_min - 13.3).abs() < 1e-9);
        assert!((x_max - 16.45).abs() < 1e-9);
        assert!((y_min - 45.4).abs() < 1e-9);
        assert!((y_max - 47.2).abs() < 1e-9);
    }
}
