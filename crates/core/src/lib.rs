//! Functional core for the gamestore project.
//!
//! Domain types, storage and cache ports, and the pure functions the
//! server builds on. Nothing in this crate performs I/O.

#[cfg(feature = "auth")]
pub mod auth;
pub mod cache;
pub mod service;
pub mod storage;
pub mod store;
