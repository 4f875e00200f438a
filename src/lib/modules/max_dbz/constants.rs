pub const REFL_10CM: &str = "REFL_10CM";
pub const PRESSURE_PERT: &str = "P";
pub const PRESSURE_BASE: &str = "PB";
pub const THETA_PERT: &str = "T";
pub const QVAPOR: &str = "QVAPOR";
pub const QRAIN: &str = "QRAIN";
pub const QSNOW: &str = "QSNOW";
pub const QGRAUP: &str = "QGRAUP";

/// base state potential temperature [K]
pub const THETA_BASE: f64 = 300.0;
/// reference pressure of the Exner function [Pa]
pub const P1000MB: f64 = 100_000.0;
/// Rd / cp
pub const RD_CP: f64 = 0.2857;
/// gas constant of dry air [J kg-1 K-1]
pub const RD: f64 = 287.04;
pub const CELKEL: f64 = 273.15;
pub const EPS: f64 = 0.622;

pub const GAMMA_SEVEN: f64 = 720.0;
/// densities [kg m-3]
pub const RHOWAT: f64 = 1000.0;
pub const RHO_SNOW: f64 = 100.0;
pub const RHO_GRAUPEL: f64 = 400.0;
/// dielectric factor of ice relative to water
pub const ALPHA: f64 = 0.224;
/// intercept parameters [m-4]
pub const RN0_R: f64 = 8e6;
pub const RN0_S: f64 = 2e7;
pub const RN0_G: f64 = 4e6;
/// floor of the equivalent reflectivity factor [mm6 m-3]
pub const MIN_ZE: f64 = 0.001;

pub const VARIABLE_FOLDER: &str = "max_dbz";
pub const COLORBAR_LABEL: &str = "radarska odbojnost [dBZ]";
pub const FRIENDLY_NAME: &str = "maksimalna radarska odbojnost";

/// color below the first reflectivity bin
pub const LIGHT_GRAY: &str = "#626262";

pub const STANDARD_BIN_EDGES: [f32; 20] = [
    0.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0, 33.0, 36.0, 39.0, 42.0, 45.0, 48.0, 51.0, 54.0,
    57.0, 60.0, 63.0, 66.0, 70.0,
];

pub const STANDARD_COLORS: [&str; 19] = [
    "#0E6B9D", "#068093", "#089E94", "#05C1A0", "#04D883",
    "#5AE65A", "#A9F848", "#F0FF50", "#FFEB19", "#FFC71F",
    "#FF9F32", "#FF7D4A", "#FF6262", "#FF8FC4", "#E3D9FF",
    "#C4B5FD", "#A78BFA", "#8B5CF6", "#7C3AED",
];

/// (first, last, step) of the standard colorbar ticks
pub const STANDARD_TICKS: (i32, i32, usize) = (15, 66, 3);

pub const DETAILED_COLORS: [&str; 67] = [
    "#626262", "#656565", "#507D80", "#3A979E", "#29ACB6", "#14C7D4", "#00E2EE", "#00CEF0",
    "#01BEF2", "#01AFF4", "#01A0F6", "#018CF6", "#0178F6", "#0150F6", "#0028F6", "#0000F6",
    "#00FF00", "#00F700", "#00EF00", "#00E700", "#00DF00", "#00D700", "#00CF00", "#00C700",
    "#00BF00", "#00B700", "#00AF00", "#00A700", "#009F00", "#009700", "#008F00", "#FFFF00",
    "#F9F000", "#F3E100", "#EDD200", "#E7C300", "#E7B400", "#EDA400", "#F39400", "#F98400",
    "#FF7400", "#FF6400", "#FF5000", "#FF3C00", "#FF2800", "#FF1400", "#FF0000", "#F50000",
    "#EB0000", "#E10000", "#D70000", "#CD0000", "#C20000", "#B70000", "#AB0000", "#9E0000",
    "#FFC8FF", "#F4B4F4", "#E8A0E8", "#DD8CDD", "#D178D1", "#C664C6", "#BA50BA", "#AF3CAF",
    "#A328A3", "#981498", "#E0E0E0",
];

pub const DETAILED_TICKS: (i32, i32, usize) = (10, 70, 5);
