//! # Identity-Keyed Values
//!
//! Hardcoded values that differ between the production server and a maintainer's
//! development setup. The production value is mandatory; the alternate is picked
//! only when `CFG` names the alternate identity.

use std::fmt;

use crate::domain::env::Identity;

type Producer<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A value with a required primary producer and an optional alternate.
pub struct ConfigValue<T> {
    primary: Producer<T>,
    alternate: Option<Producer<T>>,
}

impl<T> ConfigValue<T> {
    pub fn new(primary: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            alternate: None,
        }
    }

    pub fn with_alternate(mut self, alternate: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.alternate = Some(Box::new(alternate));
        self
    }

    /// Invokes exactly one producer. Nothing is cached.
    pub fn resolve(&self, identity: &Identity) -> T {
        match &self.alternate {
            Some(alternate) if identity.is_alternate() => alternate(),
            _ => (self.primary)(),
        }
    }
}

impl<T> fmt::Debug for ConfigValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValue")
            .field("has_alternate", &self.alternate.is_some())
            .finish()
    }
}

pub fn define_value<T>(identity: &Identity, value: &ConfigValue<T>) -> T {
    value.resolve(identity)
}
