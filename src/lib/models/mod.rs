pub mod field;
pub mod palette;
pub mod plot;
pub mod region;
pub mod source;
