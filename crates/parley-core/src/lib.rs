//! Session/message cache and remote API port for Parley.
//!
//! This crate defines the "port" (the `SessionApi` trait) that the
//! infrastructure layer implements, plus the `SessionCache` state container
//! that mediates every read and write against it. It depends only on
//! `parley-types` -- never on `parley-infra` or any HTTP crate.

pub mod chat;
pub mod event;
