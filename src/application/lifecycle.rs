//! # Lifecycle State
//!
//! `Configured -> Running -> Stopping -> Stopped`, stored in a single atomic.
//! `Configured` may also jump straight to `Stopped` when a stop arrives before `run`.
//! The transition into `Stopped` happens exactly once.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Configured = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Configured,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Configured as u8),
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `Configured -> Running`. False if the application was stopped or already running.
    pub fn start(&self) -> bool {
        self.transition(LifecycleState::Configured, LifecycleState::Running)
    }

    /// Claims the right to perform shutdown work.
    ///
    /// Returns true for exactly one caller over the lifetime of the value;
    /// that caller must follow up with [`Lifecycle::finish_stop`].
    pub fn begin_stop(&self) -> bool {
        self.transition(LifecycleState::Running, LifecycleState::Stopping)
            || self.transition(LifecycleState::Configured, LifecycleState::Stopping)
    }

    pub fn finish_stop(&self) {
        self.state
            .store(LifecycleState::Stopped as u8, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
