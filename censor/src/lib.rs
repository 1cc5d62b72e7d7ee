pub mod error;
pub mod bits;
pub mod header;
pub mod image;
pub mod raster;
pub mod grid;
pub mod censor;
pub mod mask;
pub mod layout;
pub mod restore;
#[cfg(feature = "serde")]
pub mod config;
