//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`: the
//! reqwest-backed session API client, plus config loading and data
//! directory resolution.

pub mod config;
pub mod filesystem;
pub mod remote;
