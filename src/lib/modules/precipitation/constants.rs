/// accumulated grid scale precipitation [mm]
pub const RAINNC: &str = "RAINNC";
/// accumulated convective precipitation [mm]
pub const RAINC: &str = "RAINC";

pub const VARIABLE_FOLDER: &str = "accumulated_precipitation";
pub const COLORBAR_LABEL: &str = "padavine [mm]";
pub const FRIENDLY_NAME: &str = "padavine";

/// grid values are only labelled above this amount [mm]
pub const LABEL_THRESHOLD: f32 = 0.9;

pub const LEVELS: [f32; 21] = [
    0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 120.0, 140.0,
    160.0, 180.0, 200.0, 250.0, 300.0,
];

pub const COLORS: [&str; 23] = [
    "#ffffff", "#e3f0ff", "#cce1ff", "#8fbdff", "#529bdd", "#2876b5", "#208e91",
    "#04aa8a", "#2cc469", "#98d344", "#d7e205", "#ffea92", "#ffd03b", "#ff9124",
    "#e55028", "#ce2715", "#ad0800", "#aa3c90", "#cc52c6", "#d87fdd", "#e89ef2",
    "#f2bdff", "#f5d9fc",
];
