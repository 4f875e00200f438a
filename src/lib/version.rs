pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nrenders maximum reflectivity, 2 m temperature and accumulated precipitation from WRF output"
);
