//! The palette pipeline, one module per step:
//! load and cluster the image, derive the palette, then check contrast and
//! map the result onto an existing stylesheet.

pub mod contrast;
pub mod extract;
pub mod generate;
pub mod mapping;
