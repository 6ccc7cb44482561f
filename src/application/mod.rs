//! # Application Layer
//!
//! The bot framework: configuration, module registration and routing, lifecycle,
//! logging, and identity-keyed settings.

pub mod app;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod modules;
pub mod router;
pub mod settings;
