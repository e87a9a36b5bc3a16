//! Wall-clock time windows for exam placement.

mod window;

pub use window::{InvalidWindow, TimeWindow};
