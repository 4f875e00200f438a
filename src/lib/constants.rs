/// Kelvin to Celsius offset
pub const KELVIN_OFFSET: f32 = 273.15;

/// upsampling factor applied to data and coordinates before drawing
pub const ZOOM_FACTOR: f32 = 4.0;

/// figure size [in]
pub const FIGURE_SIZE: f32 = 12.0;
/// figure resolution [dots per inch]
pub const FIGURE_DPI: f32 = 160.0;
/// padding around the tight bounding box [in]
pub const PAD_INCHES: f32 = 0.15;
pub const FIGURE_BACKGROUND: &str = "#333333";

/// logo bounding box [px], the logo is scaled to fit inside it
pub const LOGO_MAX_WIDTH: f32 = 330.0;
pub const LOGO_MAX_HEIGHT: f32 = 30.0;

pub const DEFAULT_TIMEZONE: &str = "Europe/Ljubljana";
pub const DEFAULT_FILE_PATTERN: &str = "wrfout*_d01_*";
pub const DEFAULT_DATA_SOURCE: &str = "Vir podatkov: TempoQuest - ICON-D2";
pub const RUN_CAPTION_PREFIX: &str = "Zagon modela";

/// display format of valid and run times, e.g. "3. 5. 2024 ob 14:00"
pub const HUMAN_TIME_FORMAT: &str = "%-d. %-m. %Y ob %H:%M";
/// time stamp used in output file names
pub const FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M";

// font sizes [pt]
pub const TITLE_FONT_SIZE: f32 = 13.0;
pub const CAPTION_FONT_SIZE: f32 = 10.0;
pub const TICK_FONT_SIZE: f32 = 10.0;
pub const LABEL_FONT_SIZE: f32 = 8.0;

// line widths [pt]
pub const COASTLINE_WIDTH: f32 = 0.4;
pub const BORDER_WIDTH: f32 = 1.0;
