//! Core types and trait definitions for Leadline.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store backend and the HTTP layer both depend on it.

pub mod admin;
pub mod error;
pub mod feed;
pub mod filter;
pub mod gate;
pub mod lead;
pub mod store;
pub mod view;
pub mod workbench;

pub use error::{Error, Result};
