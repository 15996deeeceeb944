//! Application lifecycle: startup wiring, server mode, graceful shutdown

pub mod lifetime;
pub mod modes;
