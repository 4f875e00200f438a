use std::io::Read;

use serde_derive::{Deserialize, Serialize};

use crate::helpers::WrfPlotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// parses `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Result<Self, WrfPlotError> {
        let digits = hex.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(format!("Invalid color '{hex}'").into());
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|err| WrfPlotError::from(format!("Invalid color '{hex}': {err}")))
        };
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Builds a color list out of hex literals known at compile time.
pub fn hex_colors(hex: &[&str]) -> Result<Vec<Color>, WrfPlotError> {
    hex.iter().map(|h| Color::from_hex(h)).collect()
}

/// which side of the boundaries gets an extra open-ended bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    #[default]
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn low(&self) -> bool {
        matches!(self, Extend::Min | Extend::Both)
    }

    pub fn high(&self) -> bool {
        matches!(self, Extend::Max | Extend::Both)
    }
}

/// Maps values to color indices through discrete bins.
///
/// Values below the first boundary map to -1 (under), values at or above the
/// last boundary map to `ncolors` (over). When there are more colors than
/// bins the bin index is stretched over the whole color range.
#[derive(Debug, Clone)]
pub struct BoundaryNorm {
    boundaries: Vec<f32>,
    ncolors: usize,
    extend: Extend,
    n_regions: usize,
    offset: i64,
}

impl BoundaryNorm {
    pub fn new(boundaries: Vec<f32>, ncolors: usize, extend: Extend) -> Result<Self, WrfPlotError> {
        if boundaries.len() < 2 {
            return Err("At least two boundaries are needed".into());
        }
        if boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err("Boundaries must be strictly increasing".into());
        }

        let mut n_regions = boundaries.len() - 1;
        let mut offset = 0;
        if extend.low() {
            n_regions += 1;
            offset = 1;
        }
        if extend.high() {
            n_regions += 1;
        }
        if n_regions > ncolors {
            return Err(format!(
                "There are {n_regions} color bins including extensions, but ncolors = {ncolors}"
            )
            .into());
        }

        Ok(BoundaryNorm {
            boundaries,
            ncolors,
            extend,
            n_regions,
            offset,
        })
    }

    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    pub fn ncolors(&self) -> usize {
        self.ncolors
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    pub fn vmin(&self) -> f32 {
        self.boundaries[0]
    }

    pub fn vmax(&self) -> f32 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// color index for `value`, `None` for NaN
    pub fn index(&self, value: f32) -> Option<i64> {
        if value.is_nan() {
            return None;
        }
        if value < self.vmin() {
            return Some(-1);
        }
        if value >= self.vmax() {
            return Some(self.ncolors as i64);
        }

        let bin = self.boundaries.partition_point(|b| *b <= value) as i64 - 1 + self.offset;
        if self.ncolors <= self.n_regions {
            return Some(bin);
        }
        if self.n_regions == 1 {
            return Some(((self.ncolors - 1) / 2) as i64);
        }
        let scale = (self.ncolors - 1) as f64 / (self.n_regions - 1) as f64;
        Some((scale * bin as f64) as i64)
    }
}

#[derive(Debug, Clone)]
pub struct ListedColormap {
    colors: Vec<Color>,
    under: Option<Color>,
    over: Option<Color>,
    bad: Color,
}

impl ListedColormap {
    pub fn new(colors: Vec<Color>) -> Result<Self, WrfPlotError> {
        if colors.is_empty() {
            return Err("A colormap needs at least one color".into());
        }
        Ok(ListedColormap {
            colors,
            under: None,
            over: None,
            bad: Color::TRANSPARENT,
        })
    }

    pub fn with_under(mut self, color: Color) -> Self {
        self.under = Some(color);
        self
    }

    pub fn with_over(mut self, color: Color) -> Self {
        self.over = Some(color);
        self
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn under(&self) -> Color {
        self.under.unwrap_or(self.colors[0])
    }

    pub fn over(&self) -> Color {
        self.over.unwrap_or(self.colors[self.colors.len() - 1])
    }

    pub fn bad(&self) -> Color {
        self.bad
    }

    pub fn color_for_index(&self, index: i64) -> Color {
        if index < 0 {
            self.under()
        } else if index as usize >= self.colors.len() {
            self.over()
        } else {
            self.colors[index as usize]
        }
    }
}

/// Colors, bins and colorbar ticks of one plot
#[derive(Debug, Clone)]
pub struct Colormap {
    pub cmap: ListedColormap,
    pub norm: BoundaryNorm,
    pub ticks: Vec<f32>,
}

impl Colormap {
    pub fn new(cmap: ListedColormap, norm: BoundaryNorm, ticks: Vec<f32>) -> Self {
        Colormap { cmap, norm, ticks }
    }

    pub fn color_for(&self, value: f32) -> Color {
        match self.norm.index(value) {
            Some(index) => self.cmap.color_for_index(index),
            None => self.cmap.bad(),
        }
    }

    /// Loads a palette file, one `value r g b a` line per lower bound and
    /// `#` for comments. Values past the last bound take its color, values
    /// below the first bound are transparent.
    pub fn from_palette_file(palette_file: &str) -> Result<Self, WrfPlotError> {
        let file = std::fs::File::open(palette_file)
            .map_err(|err| format!("cannot open palette file {palette_file}: {err}."))?;

        let mut reader = std::io::BufReader::new(file);
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|err| format!("cannot read palette file {palette_file}: {err}."))?;

        Self::parse_palette(&contents)
            .map_err(|err| format!("invalid palette file {palette_file}: {err}").into())
    }

    pub fn parse_palette(contents: &str) -> Result<Self, WrfPlotError> {
        let mut bounds: Vec<f32> = Vec::new();
        let mut colors: Vec<Color> = Vec::new();

        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 5 {
                return Err(format!("line {}: expected 'value r g b a'", line_no + 1).into());
            }
            let val: f32 = parts[0]
                .parse()
                .map_err(|err| format!("line {}: {err}", line_no + 1))?;
            let mut channels = [0u8; 4];
            for (channel, part) in channels.iter_mut().zip(&parts[1..]) {
                *channel = part
                    .parse()
                    .map_err(|err| format!("line {}: {err}", line_no + 1))?;
            }
            bounds.push(val);
            colors.push(Color::new(channels[0], channels[1], channels[2], channels[3]));
        }

        let ncolors = colors.len();
        let ticks = bounds.clone();
        let norm = BoundaryNorm::new(bounds, ncolors, Extend::Max)?;
        let cmap = ListedColormap::new(colors)?.with_under(Color::TRANSPARENT);
        Ok(Colormap::new(cmap, norm, ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_ramp(n: usize) -> Vec<Color> {
        (0..n).map(|i| Color::new(i as u8, i as u8, i as u8, 255)).collect()
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#626262").unwrap(), Color::new(0x62, 0x62, 0x62, 255));
        assert_eq!(Color::from_hex("#7C3AED").unwrap(), Color::new(0x7c, 0x3a, 0xed, 255));
        assert_eq!(Color::from_hex("#00000080").unwrap().a, 0x80);
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn norm_without_extension() {
        let norm = BoundaryNorm::new(vec![0.0, 1.0, 2.0, 3.0], 3, Extend::Neither).unwrap();
        assert_eq!(norm.index(-0.5), Some(-1));
        assert_eq!(norm.index(0.0), Some(0));
        assert_eq!(norm.index(0.99), Some(0));
        assert_eq!(norm.index(1.0), Some(1));
        assert_eq!(norm.index(2.5), Some(2));
        assert_eq!(norm.index(3.0), Some(3));
        assert_eq!(norm.index(f32::NAN), None);
    }

    #[test]
    fn norm_extended_both_sides() {
        // 31 levels -> 30 bins + 2 extensions = 32 colors
        let levels: Vec<f32> = (-20..=40).step_by(2).map(|v| v as f32).collect();
        let norm = BoundaryNorm::new(levels, 32, Extend::Both).unwrap();
        assert_eq!(norm.index(-25.0), Some(-1));
        assert_eq!(norm.index(-20.0), Some(1));
        assert_eq!(norm.index(38.5), Some(30));
        assert_eq!(norm.index(40.0), Some(32));
    }

    #[test]
    fn norm_stretches_over_extra_colors() {
        let norm = BoundaryNorm::new(vec![0.0, 1.0, 2.0], 5, Extend::Neither).unwrap();
        assert_eq!(norm.index(0.5), Some(0));
        assert_eq!(norm.index(1.5), Some(4));

        let single = BoundaryNorm::new(vec![0.0, 1.0], 5, Extend::Neither).unwrap();
        assert_eq!(single.index(0.5), Some(2));
    }

    #[test]
    fn norm_rejects_invalid_boundaries() {
        assert!(BoundaryNorm::new(vec![1.0], 1, Extend::Neither).is_err());
        assert!(BoundaryNorm::new(vec![1.0, 0.0], 1, Extend::Neither).is_err());
        assert!(BoundaryNorm::new(vec![0.0, 1.0, 2.0], 2, Extend::Max).is_err());
    }

    #[test]
    fn colormap_under_over_and_bad() {
        let cmap = ListedColormap::new(gray_ramp(3)).unwrap();
        let norm = BoundaryNorm::new(vec![0.0, 1.0, 2.0], 2, Extend::Neither).unwrap();
        let colormap = Colormap::new(cmap, norm, vec![0.0, 1.0, 2.0]);

        // under -> first color, over -> index 2 is still in the list
        assert_eq!(colormap.color_for(-1.0), gray_ramp(3)[0]);
        assert_eq!(colormap.color_for(1.5), gray_ramp(3)[1]);
        assert_eq!(colormap.color_for(5.0), gray_ramp(3)[2]);
        assert_eq!(colormap.color_for(f32::NAN), Color::TRANSPARENT);
    }

    #[test]
    fn palette_file_format() {
        let contents = "# value r g b a\n0 0 0 255 255\n\n10 0 255 0 255\n20 255 0 0 255\n";
        let colormap = Colormap::parse_palette(contents).unwrap();
        assert_eq!(colormap.ticks, vec![0.0, 10.0, 20.0]);
        assert_eq!(colormap.color_for(-1.0), Color::TRANSPARENT);
        assert_eq!(colormap.color_for(5.0), Color::new(0, 0, 255, 255));
        assert_eq!(colormap.color_for(15.0), Color::new(0, 255, 0, 255));
        assert_eq!(colormap.color_for(25.0), Color::new(255, 0, 0, 255));

        assert!(Colormap::parse_palette("0 0 0 255\n").is_err());
        assert!(Colormap::parse_palette("0 0 0 255 300\n1 0 0 0 0\n").is_err());
    }
}
