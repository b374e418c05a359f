//! Control/utility nodes

mod delay;

pub use delay::DelayNode;
