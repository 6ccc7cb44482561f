//! # Interface Layer
//!
//! User-facing command handlers, packaged as modules.

pub mod modules;
