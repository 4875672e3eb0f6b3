//! Tokenboard Library
//!
//! Cached USD price feed for the staking and rewards dashboard

pub mod config;
pub mod logging;
pub mod oracle;
pub mod types;

#[cfg(feature = "dashboard")]
pub mod dashboard;
