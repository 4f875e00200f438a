use std::collections::HashMap;

use geo::{coord, Contains, Point, Polygon, Rect};
use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};

use crate::helpers::WrfPlotError;

fn default_padding() -> f64 {
    0.08
}

fn default_logo_position() -> (u32, u32) {
    (32, 1551)
}

fn default_cbar_position() -> [f32; 4] {
    [0.13, 0.11, 0.77, 0.025]
}

/// extra room [deg] around the region where grid labels are still drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPadding {
    #[serde(default = "default_padding")]
    pub left: f64,
    #[serde(default = "default_padding")]
    pub right: f64,
    #[serde(default = "default_padding")]
    pub top: f64,
    #[serde(default = "default_padding")]
    pub bottom: f64,
}

impl Default for LabelPadding {
    fn default() -> Self {
        LabelPadding {
            left: default_padding(),
            right: default_padding(),
            top: default_padding(),
            bottom: default_padding(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// lower-left corner of the logo, pixels from the lower-left corner of the figure
    #[serde(default = "default_logo_position")]
    pub logo_position: (u32, u32),
    /// [left, bottom, width, height] as figure fractions
    #[serde(default = "default_cbar_position")]
    pub cbar_position: [f32; 4],
    #[serde(default)]
    pub label_padding: LabelPadding,
}

lazy_static! {
    pub static ref REGIONS: HashMap<&'static str, Region> = {
        let mut regions = HashMap::new();
        regions.insert(
            "slovenia_istria",
            Region {
                lat_min: 44.7,
                lat_max: 47.2,
                lon_min: 12.4,
                lon_max: 16.45,
                logo_position: (32, 1551),
                cbar_position: [0.13, 0.11, 0.77, 0.025],
                label_padding: LabelPadding { left: 0.06, right: 0.3, top: 0.07, bottom: 0.06 },
            },
        );
        regions.insert(
            "slovenia",
            Region {
                lat_min: 45.4,
                lat_max: 47.2,
                lon_min: 13.3,
                lon_max: 16.45,
                logo_position: (25, 1465),
                cbar_position: [0.13, 0.13, 0.77, 0.025],
                label_padding: LabelPadding { left: 0.08, right: 0.16, top: 0.06, bottom: 0.08 },
            },
        );
        regions.insert(
            "slovenia_centered",
            Region {
                lat_min: 45.18,
                lat_max: 46.98,
                lon_min: 13.3,
                lon_max: 16.45,
                logo_position: (25, 1465),
                cbar_position: [0.13, 0.13, 0.77, 0.025],
                label_padding: LabelPadding { left: 0.08, right: 0.16, top: 0.015, bottom: 0.08 },
            },
        );
        regions
    };
}

impl Region {
    /// Resolves a region, configured regions shadow the built-in ones.
    pub fn lookup(name: &str, extra: &HashMap<String, Region>) -> Result<Region, WrfPlotError> {
        if let Some(region) = extra.get(name) {
            return Ok(region.clone());
        }
        REGIONS
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Region '{name}' is not defined").into())
    }

    pub fn validate(&self) -> Result<(), WrfPlotError> {
        if self.lat_min >= self.lat_max || self.lon_min >= self.lon_max {
            return Err(format!(
                "Invalid region bounds: lat {}..{}, lon {}..{}",
                self.lat_min, self.lat_max, self.lon_min, self.lon_max
            )
            .into());
        }
        if self.cbar_position[2] <= 0.0 || self.cbar_position[3] <= 0.0 {
            return Err("Colorbar width and height must be positive".into());
        }
        Ok(())
    }

    /// (lon_min, lon_max, lat_min, lat_max)
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (self.lon_min, self.lon_max, self.lat_min, self.lat_max)
    }

    pub fn label_polygon(&self) -> Polygon<f64> {
        let pad = &self.label_padding;
        Rect::new(
            coord! { x: self.lon_min - pad.left, y: self.lat_min - pad.bottom },
            coord! { x: self.lon_max + pad.right, y: self.lat_max + pad.top },
        )
        .to_polygon()
    }

    pub fn contains_label_point(&self, lon: f64, lat: f64) -> bool {
        self.label_polygon().contains(&Point::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        assert_eq!(region.lat_min, 45.4);
        assert_eq!(region.logo_position, (25, 1465));
        assert_eq!(region.label_padding.top, 0.06);

        let istria = Region::lookup("slovenia_istria", &HashMap::new()).unwrap();
        assert_eq!(istria.cbar_position, [0.13, 0.11, 0.77, 0.025]);
        assert_eq!(istria.label_padding.right, 0.3);
    }

    #[test]
    fn unknown_region() {
        let err = Region::lookup("atlantis", &HashMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "Region 'atlantis' is not defined");
    }

    #[test]
    fn configured_region_shadows_builtin() {
        let json = r#"{"lat_min": 40.0, "lat_max": 41.0, "lon_min": 10.0, "lon_max": 11.0}"#;
        let custom: Region = serde_json::from_str(json).unwrap();
        assert_eq!(custom.logo_position, (32, 1551));
        assert_eq!(custom.label_padding, LabelPadding::default());

        let mut extra = HashMap::new();
        extra.insert("slovenia".to_string(), custom.clone());
        assert_eq!(Region::lookup("slovenia", &extra).unwrap(), custom);
    }

    #[test]
    fn label_polygon_is_padded() {
        let region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        // inside the padding on the right side, outside the bare box
        assert!(region.contains_label_point(16.5, 46.0));
        assert!(!region.contains_label_point(16.7, 46.0));
        assert!(region.contains_label_point(14.5, 45.35));
        assert!(!region.contains_label_point(14.5, 45.3));
    }

    #[test]
    fn validation() {
        let mut region = Region::lookup("slovenia", &HashMap::new()).unwrap();
        assert!(region.validate().is_ok());
        region.lat_max = region.lat_min;
        assert!(region.validate().is_err());
    }
}
