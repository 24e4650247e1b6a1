//! Back-office API server library.
//!
//! Exposes config, state, error handling, routes and the WebSocket change
//! feed so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
pub mod storage;
pub mod ws;
