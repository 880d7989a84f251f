//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley client:
//! Session, Message, Route, their error types, and client configuration.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod route;
pub mod session;
