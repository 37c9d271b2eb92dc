pub mod normalize;
pub mod shape;
pub mod state;
