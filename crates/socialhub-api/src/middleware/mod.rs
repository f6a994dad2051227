//! Tower middleware configuration.

pub mod cors;
