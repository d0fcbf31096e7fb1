pub mod ring;

pub use ring::{ConsistentHashRing, RingError};

#[cfg(test)]
mod ring_test;
