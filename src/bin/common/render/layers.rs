use std::fs;

use geo::{coord, BoundingRect, Geometry, Intersects, LineString, Rect};
use geojson::GeoJson;
use image::RgbaImage;
use imageproc::drawing::draw_line_segment_mut;

use wrfplot::{
    helpers::WrfPlotError,
    models::{palette::Color, region::Region},
};

use super::{canvas::rgba, map::MapView};

/// margin [deg] around the region within which lines are kept
const REGION_MARGIN: f64 = 1.0;

fn collect_lines(geometry: Geometry<f64>, lines: &mut Vec<LineString<f64>>) {
    match geometry {
        Geometry::LineString(line) => lines.push(line),
        Geometry::MultiLineString(multi) => lines.extend(multi.0),
        Geometry::Polygon(polygon) => {
            let (exterior, interiors) = polygon.into_inner();
            lines.push(exterior);
            lines.extend(interiors);
        }
        Geometry::MultiPolygon(multi) => {
            for polygon in multi.0 {
                collect_lines(Geometry::Polygon(polygon), lines);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for geometry in collection.0 {
                collect_lines(geometry, lines);
            }
        }
        Geometry::Line(line) => lines.push(LineString::from(vec![line.start, line.end])),
        Geometry::Rect(rect) => lines.push(rect.to_polygon().exterior().clone()),
        Geometry::Triangle(triangle) => lines.push(triangle.to_polygon().exterior().clone()),
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// Outline features (coastlines, borders) read from GeoJSON.
pub struct BoundaryLayer {
    pub lines: Vec<LineString<f64>>,
    /// line width [pt]
    pub width: f32,
}

impl BoundaryLayer {
    pub fn parse(contents: &str, width: f32) -> Result<Self, WrfPlotError> {
        let geojson = contents
            .parse::<GeoJson>()
            .map_err(|err| format!("Invalid GeoJSON: {err}"))?;
        let collection: geo::GeometryCollection<f64> = geojson::quick_collection(&geojson)
            .map_err(|err| format!("Unsupported GeoJSON: {err}"))?;

        let mut lines = Vec::new();
        for geometry in collection.0 {
            collect_lines(geometry, &mut lines);
        }
        Ok(BoundaryLayer { lines, width })
    }

    pub fn load(path: &str, width: f32) -> Result<Self, WrfPlotError> {
        let contents =
            fs::read_to_string(path).map_err(|err| format!("Cannot read {path}: {err}"))?;
        Self::parse(&contents, width).map_err(|err| format!("{path}: {err}").into())
    }

    /// keeps only the lines near `region`
    pub fn clip_to(&self, region: &Region) -> BoundaryLayer {
        let area = Rect::new(
            coord! { x: region.lon_min - REGION_MARGIN, y: region.lat_min - REGION_MARGIN },
            coord! { x: region.lon_max + REGION_MARGIN, y: region.lat_max + REGION_MARGIN },
        );
        let lines = self
            .lines
            .iter()
            .filter(|line| {
                line.bounding_rect()
                    .map(|bounds| bounds.intersects(&area))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        BoundaryLayer {
            lines,
            width: self.width,
        }
    }

    /// Draws the lines on the map raster of `view`, `width_px` wide.
    pub fn draw(&self, image: &mut RgbaImage, view: &MapView, color: Color, width_px: f64) {
        for line in &self.lines {
            let points: Vec<(f32, f32)> = line
                .coords()
                .map(|c| {
                    let (x, y) = view.to_pixel(c.x, c.y);
                    (x as f32, y as f32)
                })
                .collect();
            for segment in points.windows(2) {
                draw_thick_segment(image, segment[0], segment[1], width_px, color);
            }
        }
    }
}

/// parallel one pixel strokes spread across `width` pixels
pub fn draw_thick_segment(
    image: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    width: f64,
    color: Color,
) {
    let strokes = width.round().max(1.0) as i32;
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 {
        (-dy / len, dx / len)
    } else {
        (0.0, 0.0)
    };
    let color = rgba(color);
    for k in 0..strokes {
        let offset = k as f32 - (strokes - 1) as f32 / 2.0;
        draw_line_segment_mut(
            image,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
    }
}
