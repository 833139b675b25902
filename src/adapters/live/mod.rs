//! Live adapters for real external interactions.

pub mod browser;
pub mod filesystem;
pub mod mantis;
pub mod scm;
