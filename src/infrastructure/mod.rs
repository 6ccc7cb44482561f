//! # Infrastructure Layer
//!
//! Handles interactions with external systems (Matrix, OS signals).
//! Implements the traits defined in the Domain layer (e.g., ChatProvider, Stoppable).

pub mod direct;
pub mod matrix;
pub mod signals;
