pub mod overlay;
pub mod sequence;
pub mod split;
