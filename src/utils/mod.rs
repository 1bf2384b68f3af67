//! Utilities Module
//!
//! Common utilities used across the crate.

pub(crate) mod codec;
pub mod logging;
