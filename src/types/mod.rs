//! Reply content types shared with the host.

pub mod segment;

pub use segment::*;
