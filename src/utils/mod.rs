pub mod bitstream;
pub mod error;
pub mod iter;
