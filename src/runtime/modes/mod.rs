//! Mode routing
//!
//! threadline has a single long-running mode, the HTTP server. The
//! `config` subcommand runs before any of this and never reaches here.

pub mod server;

pub use server::run_server;
