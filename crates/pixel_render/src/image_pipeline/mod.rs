pub mod adjust;
pub mod downsample;
pub mod loader;
pub mod resize;
