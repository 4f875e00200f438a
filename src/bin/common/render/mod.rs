pub mod canvas;
pub mod colorbar;
pub mod labels;
pub mod layers;
pub mod layout;
pub mod logo;
pub mod map;
pub mod text;
