//! Cassettes: recorded tracker and change-supplier traffic.
//!
//! A recording run wraps the live adapters and writes every call to a
//! YAML cassette; a replaying run serves the same calls back in order, so
//! an update can be reproduced without a tracker or a repository.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
