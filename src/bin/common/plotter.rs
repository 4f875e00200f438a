use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use image::RgbaImage;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use ndarray::Array2;

use wrfplot::{
    constants::{
        BORDER_WIDTH, CAPTION_FONT_SIZE, COASTLINE_WIDTH, FIGURE_BACKGROUND, LABEL_FONT_SIZE,
        PAD_INCHES, RUN_CAPTION_PREFIX, TITLE_FONT_SIZE,
    },
    helpers::{human_time, to_local, WrfPlotError},
    models::{
        field::Field,
        palette::Color,
        plot::PlotKind,
        region::Region,
        source::DataSource,
    },
    modules::functions::{gaussian_filter, zoom},
    projection::MapProjection,
};

use crate::common::{
    config::models::PlotSettings,
    io::{
        models::grid::IrregularGrid,
        readers::netcdf::WrfNetCdfSource,
        writers::png::{output_dir, GeoReference, PngWriter},
    },
    render::{
        canvas::Canvas,
        colorbar::draw_colorbar,
        labels::GridLabeler,
        layers::BoundaryLayer,
        layout::Figure,
        logo::{load_logo, place_logo},
        map::MapView,
        text::{Fonts, HAlign, TextBox, VAlign},
    },
};

/// caption offsets, fractions of the map axes
const TITLE_OFFSET: f64 = 0.01;
const FOOTER_OFFSET: f64 = 0.12;
const FOOTER_INSET: f64 = 0.01;

/// Files in `data_dir` matching `pattern`, sorted by name.
pub fn discover_files(data_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, WrfPlotError> {
    let full_pattern = data_dir.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    let files: Vec<PathBuf> = glob::glob(&full_pattern)
        .map_err(|err| format!("Invalid file pattern {full_pattern}: {err}"))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("Cannot read {}: {err}", err.path().display());
                None
            }
        })
        .filter(|path| path.is_file())
        .sorted()
        .collect();

    if files.is_empty() {
        return Err("No WRF files found.".into());
    }
    Ok(files)
}

/// Valid time of the first readable file, taken as the model run time.
fn model_run_time(files: &[PathBuf]) -> Option<DateTime<Utc>> {
    for file in files {
        let time = WrfNetCdfSource::open(file)
            .map_err(|err| WrfPlotError::from(err.to_string()))
            .and_then(|source| source.valid_time());
        match time {
            Ok(time) => return Some(time),
            Err(err) => warn!("Cannot read the model run time from {}: {err}", file.display()),
        }
    }
    None
}

fn load_layer(path: &Option<String>, width: f32, region: &Region) -> Option<BoundaryLayer> {
    let path = path.as_ref()?;
    match BoundaryLayer::load(path, width) {
        Ok(layer) => Some(layer.clip_to(region)),
        Err(err) => {
            warn!("Skipping map layer: {err}");
            None
        }
    }
}

/// Field ready to be drawn: the prepared values on the model grid plus
/// their upsampled copy.
struct PreparedField {
    field: Field,
    projection: MapProjection,
    zoomed: Array2<f32>,
    grid: IrregularGrid,
}

pub struct WrfPlotter {
    settings: PlotSettings,
    kind: Box<dyn PlotKind>,
    writer: PngWriter,
    labeler: GridLabeler,
    fonts: Fonts,
    logo: Option<RgbaImage>,
    coastlines: Option<BoundaryLayer>,
    borders: Option<BoundaryLayer>,
    figure: Figure,
    background: Color,
    run_time: Option<DateTime<Utc>>,
}

impl WrfPlotter {
    pub fn new(settings: PlotSettings) -> Result<Self, WrfPlotError> {
        settings.region.validate()?;

        let mut kind = settings.plot_type.build(&settings.kind_options)?;
        if let Some(palette) = &settings.palette {
            info!("Using configured palette for {}", settings.plot_type);
            kind.set_colormap(palette.clone());
        }

        let dir = output_dir(
            &settings.output_dir,
            &settings.weather_model,
            &settings.region_name,
            kind.variable_folder(),
        );
        let writer = PngWriter::new(dir, kind.variable_folder())?;

        let fonts = Fonts::load(&settings.font_path, &settings.bold_font_path)?;
        let logo = match load_logo(&settings.logo_path) {
            Ok(logo) => Some(logo),
            Err(err) => {
                warn!("{err}");
                None
            }
        };
        let coastlines = load_layer(&settings.coastline_path, COASTLINE_WIDTH, &settings.region);
        let borders = load_layer(&settings.borders_path, BORDER_WIDTH, &settings.region);

        Ok(WrfPlotter {
            labeler: GridLabeler::new(settings.stride),
            settings,
            kind,
            writer,
            fonts,
            logo,
            coastlines,
            borders,
            figure: Figure::default(),
            background: Color::from_hex(FIGURE_BACKGROUND)?,
            run_time: None,
        })
    }

    pub fn output_path(&self) -> &Path {
        self.writer.path()
    }

    fn timezone(&self) -> &Tz {
        &self.settings.timezone
    }

    /// Plots every file in the data directory. A failing file is logged and
    /// skipped. Returns the number of images written.
    pub fn run_all(&mut self) -> Result<usize, WrfPlotError> {
        let files = discover_files(&self.settings.data_dir, &self.settings.file_pattern)?;
        info!(
            "Plotting {} files from {} into {}",
            files.len(),
            self.settings.data_dir.display(),
            self.output_path().display()
        );

        self.run_time = model_run_time(&files);

        let mut written = 0;
        for file in &files {
            match self.plot_file(file) {
                Ok(Some(path)) => {
                    written += 1;
                    info!("Saved {}", path.display());
                }
                Ok(None) => debug!("Nothing to plot for {}", file.display()),
                Err(err) => warn!("Failed to process {}: {err}", file.display()),
            }
        }

        info!("Done: {} images written for {} files", written, files.len());
        Ok(written)
    }

    /// Renders one file. Returns the written image, `None` when the plot
    /// kind skipped the frame.
    pub fn plot_file(&mut self, path: &Path) -> Result<Option<PathBuf>, WrfPlotError> {
        info!("Processing {}", path.display());
        let c = Utc::now();
        let source = WrfNetCdfSource::open(path)
            .map_err(|err| format!("Cannot open {}: {err}", path.display()))?;
        trace!("Opening took {} seconds", Utc::now() - c);

        let Some(prepared) = self.prepare(&source)? else {
            return Ok(None);
        };

        let valid = to_local(&prepared.field.valid_time, self.timezone());
        let run_time = match self.run_time {
            Some(run_time) => run_time,
            None => {
                warn!(
                    "Model run time unknown, using the valid time of {}",
                    path.display()
                );
                prepared.field.valid_time
            }
        };
        let run = to_local(&run_time, self.timezone());

        let c = Utc::now();
        let image = self.render(&prepared, &valid, &run)?;
        trace!("Rendering took {} seconds", Utc::now() - c);

        let c = Utc::now();
        let file = self.writer.file_for(&valid);
        let georef = GeoReference::new(
            &self.settings.region,
            self.kind.variable_folder(),
            &valid,
            &run,
        );
        self.writer.write(&file, &image, &georef)?;
        trace!("Writing took {} seconds", Utc::now() - c);

        Ok(Some(file))
    }

    /// extract, transform and upsample the field of `source`
    fn prepare(&mut self, source: &dyn DataSource) -> Result<Option<PreparedField>, WrfPlotError> {
        let c = Utc::now();
        let values = self.kind.extract(source)?;
        let (lats, lons) = source.coordinates()?;
        let valid_time = source.valid_time()?;
        let projection = source.projection()?;
        trace!("Reading took {} seconds", Utc::now() - c);

        let Some(values) = self.kind.prepare(values)? else {
            debug!("{} skipped the frame at {}", self.kind.plot_type(), valid_time);
            return Ok(None);
        };
        let field = Field::new(values, lats, lons, valid_time)?;
        debug!(
            "{} {:?} at {}, max {}",
            self.kind.plot_type(),
            field.shape(),
            field.valid_time,
            field.max()
        );

        let c = Utc::now();
        let smoothed = match self.settings.smooth_sigma {
            Some(sigma) => gaussian_filter(&field.values, sigma),
            None => field.values.clone(),
        };
        let factor = self.settings.zoom_factor;
        let zoomed = zoom(&smoothed, factor);
        let grid = IrregularGrid::new(&zoom(&field.lats, factor), &zoom(&field.lons, factor));
        trace!("Interpolation took {} seconds", Utc::now() - c);

        Ok(Some(PreparedField {
            field,
            projection,
            zoomed,
            grid,
        }))
    }

    fn render(
        &self,
        prepared: &PreparedField,
        valid: &DateTime<Tz>,
        run: &DateTime<Tz>,
    ) -> Result<RgbaImage, WrfPlotError> {
        let figure = self.figure;
        let region = &self.settings.region;
        let colormap = self.kind.colormap();
        let mut canvas = Canvas::new(figure, self.background);

        let view = MapView::new(&figure, prepared.projection, region);
        let mut map = view.render_mesh(&prepared.grid, &prepared.zoomed, colormap)?;

        let line_color = self.kind.boundary_color();
        for layer in [&self.coastlines, &self.borders].into_iter().flatten() {
            layer.draw(&mut map, &view, line_color, figure.points(layer.width as f64));
        }

        if self.kind.labels_enabled() && self.labeler.enabled() {
            let field = &prepared.field;
            let labels =
                self.labeler
                    .select(&field.values, &field.lats, &field.lons, region, self.kind.as_ref());
            debug!("Drawing {} grid labels", labels.len());
            let em = figure.points(LABEL_FONT_SIZE as f64);
            self.labeler.annotate(&mut map, &view, &self.fonts, em, &labels);
        }

        canvas.overlay(&map, view.left as i64, view.top as i64);

        let bar = figure.rect_from_fractions(region.cbar_position);
        let covered = draw_colorbar(&mut canvas, &self.fonts, bar, colormap, self.kind.as_ref());
        canvas.mark(covered);

        if let Some(logo) = &self.logo {
            place_logo(&mut canvas, logo, region.logo_position);
        }

        self.draw_captions(&mut canvas, &view, valid, run);

        Ok(canvas.crop_tight(figure.points(PAD_INCHES as f64 * 72.0)))
    }

    fn draw_captions(
        &self,
        canvas: &mut Canvas,
        view: &MapView,
        valid: &DateTime<Tz>,
        run: &DateTime<Tz>,
    ) {
        let figure = *canvas.figure();
        let axes = view.rect();
        let title_em = figure.points(TITLE_FONT_SIZE as f64);
        let caption_em = figure.points(CAPTION_FONT_SIZE as f64);
        let title_y = axes.y0 - TITLE_OFFSET * axes.height();
        let footer_y = axes.y1 + FOOTER_OFFSET * axes.height();

        let time_text = human_time(valid);
        let run_text = format!("{}: {}", RUN_CAPTION_PREFIX, human_time(run));

        let captions = [
            (
                time_text.as_str(),
                title_em,
                (axes.x0 + axes.x1) / 2.0,
                title_y,
                HAlign::Center,
                VAlign::Bottom,
            ),
            (
                self.kind.friendly_name(),
                title_em,
                axes.x1,
                title_y,
                HAlign::Right,
                VAlign::Bottom,
            ),
            (
                run_text.as_str(),
                caption_em,
                axes.x0 + FOOTER_INSET * axes.width(),
                footer_y,
                HAlign::Left,
                VAlign::Top,
            ),
            (
                self.settings.data_source.as_str(),
                caption_em,
                axes.x1 - FOOTER_INSET * axes.width(),
                footer_y,
                HAlign::Right,
                VAlign::Top,
            ),
        ];

        for (text, em, x, y, halign, valign) in captions {
            if text.is_empty() {
                continue;
            }
            let bounds = TextBox::new(&self.fonts.bold, em, text).draw(
                &mut canvas.image,
                Color::WHITE,
                x,
                y,
                halign,
                valign,
            );
            canvas.mark(bounds);
        }
    }
}
