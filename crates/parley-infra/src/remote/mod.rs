//! HTTP client for the chat backend's session API.

pub mod client;
pub mod types;

pub use client::HttpSessionApi;
