//! # Cardock Observability
//!
//! Console logging setup shared by Cardock service binaries and test
//! harnesses.

pub mod logging;

pub use logging::init_console_logging;
