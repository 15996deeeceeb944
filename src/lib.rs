//! threadline - users, posts and threaded comments
//!
//! # Architecture
//! - `storage`: domain models, the `Storage` trait, SeaORM and in-memory backends
//! - `services`: validation, auth and the nested view resolver
//! - `api`: actix-web handlers, JWT and middleware
//! - `config`: configuration management
//! - `runtime`: application lifecycle and server mode
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
