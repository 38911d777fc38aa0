mod image;
mod node;
mod registration;

pub use image::*;
pub use node::*;
pub use registration::*;
