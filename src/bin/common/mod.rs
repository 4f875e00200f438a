pub mod config;
pub mod io;
pub mod plotter;
pub mod render;
