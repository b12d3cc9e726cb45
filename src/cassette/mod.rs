//! Cassettes: recorded HTTP traffic for offline replay and tests.

pub mod format;
pub mod recorder;
pub mod replayer;
