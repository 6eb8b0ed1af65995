//! Estimates the compression ratio several lossless pixel-prediction schemes
//! would reach on an RGB image, without producing a bitstream.

pub mod estimation;
pub mod grid;
pub mod scan;
