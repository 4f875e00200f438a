pub const T2: &str = "T2";

pub const VARIABLE_FOLDER: &str = "temperature";
pub const COLORBAR_LABEL: &str = "temperatura [°C]";
pub const FRIENDLY_NAME: &str = "temperatura";

/// (first, last, step) of the levels [°C], also used as ticks
pub const LEVELS: (i32, i32, usize) = (-20, 40, 2);

pub const COLORS: [&str; 32] = [
    "#dba1cf", "#c180bc", "#a779ba", "#896db5", "#6d66ad", "#6c7bc4", "#6091d8", "#4ba7f1",
    "#56bbfe", "#6cc9fe", "#84d4fe", "#6199a2", "#74ad83", "#75bd6c", "#a0c969", "#cad778",
    "#e7ea7f", "#fff683", "#fef9ce", "#fee4a6", "#fed67c", "#febb5b", "#fea24f", "#f88438",
    "#f36a36", "#e24f2c", "#e13027", "#bf2b25", "#962727", "#a03937", "#b55757", "#ba8080",
];
