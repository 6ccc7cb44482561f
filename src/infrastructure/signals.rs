//! # Signal Handling
//!
//! Maps SIGINT, SIGTERM and normal exit onto a single stop action.
//! Every trigger calls `stop` again; the target is responsible for idempotence.
//! Nothing here waits for the stop to complete.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::domain::traits::Stoppable;
use crate::strings::logs;

/// What caused a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Interrupt,
    Terminate,
    Exit,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Exit => "exit",
        }
    }
}

#[derive(Clone)]
pub struct SignalHandler {
    target: Arc<dyn Stoppable>,
}

impl SignalHandler {
    pub fn new(target: Arc<dyn Stoppable>) -> Self {
        Self { target }
    }

    /// Direct call-through to the stop action.
    pub fn trigger(&self, trigger: Trigger) {
        tracing::info!("{}", logs::signal_received(trigger.as_str()));
        self.target.stop();
    }

    /// Spawns a task that keeps listening for SIGINT/SIGTERM and stops on each one.
    pub fn install(&self) -> JoinHandle<()> {
        let handler = self.clone();
        tokio::spawn(async move { handler.listen().await })
    }

    /// Guard that triggers [`Trigger::Exit`] when dropped.
    pub fn exit_guard(&self) -> ExitGuard {
        ExitGuard {
            handler: self.clone(),
        }
    }

    #[cfg(unix)]
    async fn listen(self) {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("{}", logs::shutdown_fail(&e.to_string()));
                return;
            }
        };
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("{}", logs::shutdown_fail(&e.to_string()));
                return;
            }
        };

        loop {
            let trigger = tokio::select! {
                received = sigint.recv() => received.map(|_| Trigger::Interrupt),
                received = sigterm.recv() => received.map(|_| Trigger::Terminate),
            };
            match trigger {
                Some(trigger) => self.trigger(trigger),
                None => break,
            }
        }
    }

    #[cfg(not(unix))]
    async fn listen(self) {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => self.trigger(Trigger::Interrupt),
                Err(e) => {
                    tracing::warn!("{}", logs::shutdown_fail(&e.to_string()));
                    break;
                }
            }
        }
    }
}

/// Stops the target when the process leaves `main` normally.
pub struct ExitGuard {
    handler: SignalHandler,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.handler.trigger(Trigger::Exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStop {
        calls: AtomicUsize,
    }

    impl Stoppable for CountingStop {
        fn stop(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_each_trigger_calls_stop() {
        let target = Arc::new(CountingStop::default());
        let handler = SignalHandler::new(target.clone());

        handler.trigger(Trigger::Interrupt);
        handler.trigger(Trigger::Interrupt);

        assert_eq!(target.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exit_guard_stops_on_drop() {
        let target = Arc::new(CountingStop::default());
        let handler = SignalHandler::new(target.clone());

        {
            let _guard = handler.exit_guard();
            handler.trigger(Trigger::Terminate);
        }

        assert_eq!(target.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_application_survives_repeated_triggers() {
        use crate::application::app::Application;
        use crate::application::catalog::ModuleCatalog;
        use crate::application::lifecycle::LifecycleState;
        use crate::domain::config::AppOptions;
        use crate::domain::env::Stage;

        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions::for_stage(dir.path(), &Stage::new("prod"));
        let app = Arc::new(Application::with_catalog(options, ModuleCatalog::empty()).unwrap());
        let handler = SignalHandler::new(app.clone());

        handler.trigger(Trigger::Terminate);
        handler.trigger(Trigger::Interrupt);
        drop(handler.exit_guard());

        assert_eq!(app.state(), LifecycleState::Stopped);
        app.wait().await;
    }
}
