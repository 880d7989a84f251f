//! Cache event distribution.

pub mod bus;
