pub mod bbox;
pub mod color;
