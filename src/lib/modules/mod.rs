pub mod functions;
pub mod max_dbz;
pub mod precipitation;
pub mod temperature;
