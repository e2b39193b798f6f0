//! Core types and trait definitions for the Trailhead trip-planning backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod geo;
pub mod place;
pub mod risk;
pub mod similarity;
pub mod store;
pub mod trek;

pub use error::{Error, Result};
