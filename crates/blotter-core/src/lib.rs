//! Core types and trait definitions for the Blotter record store.
//!
//! This crate is deliberately free of HTTP, filesystem and database
//! dependencies. Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod incident;
pub mod report;
pub mod store;
pub mod subject;

pub use error::{Result, ValidationError};
