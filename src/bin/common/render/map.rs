use image::RgbaImage;
use ndarray::Array2;
use rayon::prelude::*;

use wrfplot::{
    helpers::WrfPlotError,
    models::{palette::Colormap, region::Region},
    projection::MapProjection,
};

use crate::common::io::models::grid::IrregularGrid;

use super::layout::{fit_axes, Figure, PixelRect};

/// Map axes: the projected region extent fitted into the figure.
#[derive(Debug, Clone)]
pub struct MapView {
    pub projection: MapProjection,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// top-left corner of the axes on the canvas
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl MapView {
    pub fn new(figure: &Figure, projection: MapProjection, region: &Region) -> Self {
        let (lon_min, lon_max, lat_min, lat_max) = region.extent();
        let (x_min, x_max, y_min, y_max) =
            projection.project_extent(lon_min, lon_max, lat_min, lat_max);
        let rect = fit_axes(&figure.subplot_box(), x_max - x_min, y_max - y_min);
        MapView {
            projection,
            x_min,
            x_max,
            y_min,
            y_max,
            left: rect.x0.round() as u32,
            top: rect.y0.round() as u32,
            width: (rect.width().round() as u32).max(1),
            height: (rect.height().round() as u32).max(1),
        }
    }

    /// axes rectangle on the canvas
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(
            self.left as f64,
            self.top as f64,
            (self.left + self.width) as f64,
            (self.top + self.height) as f64,
        )
    }

    /// (lon, lat) -> pixel position inside the axes
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.projection.forward(lon, lat);
        let px = (x - self.x_min) / (self.x_max - self.x_min) * self.width as f64;
        let py = (self.y_max - y) / (self.y_max - self.y_min) * self.height as f64;
        (px, py)
    }

    /// (lon, lat) at the center of the axes pixel (col, row)
    pub fn pixel_to_geo(&self, col: u32, row: u32) -> (f64, f64) {
        let fx = (col as f64 + 0.5) / self.width as f64;
        let fy = (row as f64 + 0.5) / self.height as f64;
        let x = self.x_min + fx * (self.x_max - self.x_min);
        let y = self.y_max - fy * (self.y_max - self.y_min);
        self.projection.inverse(x, y)
    }

    /// Shades every axes pixel with the color of its nearest grid cell.
    /// Pixels outside the grid stay transparent.
    pub fn render_mesh(
        &self,
        grid: &IrregularGrid,
        values: &Array2<f32>,
        colormap: &Colormap,
    ) -> Result<RgbaImage, WrfPlotError> {
        if values.dim() != grid.shape() {
            return Err(format!(
                "Values {:?} do not match the grid {:?}",
                values.dim(),
                grid.shape()
            )
            .into());
        }

        let row_len = self.width as usize * 4;
        let mut buffer = vec![0u8; row_len * self.height as usize];

        buffer
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, pixels)| {
                let mut start = grid.center();
                for col in 0..self.width {
                    let (lon, lat) = self.pixel_to_geo(col, row as u32);
                    let Some(cell) = grid.lookup(lat as f32, lon as f32, start) else {
                        continue;
                    };
                    start = cell;
                    let color = colormap.color_for(values[[cell.0, cell.1]]);
                    let offset = col as usize * 4;
                    pixels[offset..offset + 4].copy_from_slice(&color.rgba());
                }
            });

        RgbaImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| "Could not build the map raster".into())
    }
}
