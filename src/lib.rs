//! PC Doctor server library
//!
//! Exposed as a library so the integration tests can assemble the router
//! with mock providers and an in-memory store.

#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod middleware;
pub mod server;
