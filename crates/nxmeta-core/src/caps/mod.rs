//! Kernel capability descriptors and their decoder

pub mod decoder;
pub mod descriptor;

pub use decoder::{bitcount, decode, decode_bytes, PADDING};
pub use descriptor::*;
