pub mod overlay;
pub mod seq;
