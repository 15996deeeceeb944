//! HTTP surface: JWT issuing, auth/timing middleware and the JSON API

pub mod jwt;
pub mod middleware;
pub mod services;
