//! System-level modules
//!
//! - Logging initialization (tracing subscriber + appender)

pub mod logging;
