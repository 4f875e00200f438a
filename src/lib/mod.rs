pub mod constants;
pub mod helpers;
pub mod models;
pub mod modules;
pub mod projection;
pub mod version;
