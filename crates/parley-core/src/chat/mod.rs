//! Chat session cache and remote API abstractions for Parley.
//!
//! This module defines the `SessionApi` trait that the infrastructure
//! layer implements, and the `SessionCache` that keeps sessions and the
//! active conversation's messages in memory.

pub mod api;
pub mod cache;
