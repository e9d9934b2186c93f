pub mod bit_buffer;
pub mod log_setup;

pub use bit_buffer::{BitBuffer, BITS_PER_WORD};
