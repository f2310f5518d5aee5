//! Logging setup for the signal agent.

mod logging;

pub use logging::setup_logging;
