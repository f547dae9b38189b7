//! Bazaar storefront library.
//!
//! Server-rendered shop front: product listing, a session-held cart and a
//! simulated checkout. Exposed as a library so the router can be booted
//! in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
