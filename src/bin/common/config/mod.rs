pub mod builder;
pub mod models;
