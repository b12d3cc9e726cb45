//! Implementations of the port traits.
//!
//! - `live`: real network calls.
//! - `recording`: wraps another adapter and writes what it did to a cassette.
//! - `replaying`: answers from a cassette without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
