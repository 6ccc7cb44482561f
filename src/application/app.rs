//! # Application
//!
//! The framework the bootstrap drives: `configure`, `register_module`, `run`, `stop`.
//! Registration only records names. `run` closes registration, turns the names into
//! modules through the [`ModuleCatalog`], connects to Matrix and starts syncing.
//! `stop` is safe to call from anywhere, any number of times.

use anyhow::{Context, Result};
use matrix_sdk::config::SyncSettings;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::RoomId;
use matrix_sdk::ruma::events::room::member::{MembershipState, StrippedRoomMemberEvent};
use matrix_sdk::ruma::events::room::message::SyncRoomMessageEvent;
use matrix_sdk::Client;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::catalog::ModuleCatalog;
use crate::application::error::AppError;
use crate::application::lifecycle::{Lifecycle, LifecycleState};
use crate::application::logging::RemoteLogs;
use crate::application::router::ModuleRouter;
use crate::domain::config::{AppOptions, BotConfig};
use crate::domain::env::Environment;
use crate::domain::traits::{ChatProvider, Module, Stoppable};
use crate::domain::types::ModuleContext;
use crate::infrastructure::matrix::{self, MatrixService};
use crate::strings::logs;

/// Name the bot answers to when the config does not set a display name.
pub const DEFAULT_BOT_NAME: &str = "Canni";

pub struct Application {
    options: AppOptions,
    config: BotConfig,
    catalog: ModuleCatalog,
    registered: Mutex<Vec<String>>,
    modules: OnceLock<Arc<[Arc<dyn Module>]>>,
    lifecycle: Lifecycle,
    sync_task: Mutex<Option<JoinHandle<()>>>,
    stopped: watch::Sender<bool>,
}

impl Application {
    /// Validates the options and loads `config/<stage>.yaml`.
    pub fn configure(options: AppOptions) -> Result<Self, AppError> {
        Self::with_catalog(options, ModuleCatalog::builtin())
    }

    pub fn with_catalog(options: AppOptions, catalog: ModuleCatalog) -> Result<Self, AppError> {
        if !options.knows_stage() {
            return Err(AppError::UnknownStage {
                stage: options.stage.to_string(),
                known: options.stages.clone(),
            });
        }
        let config = load_config(&options)?;
        let (stopped, _) = watch::channel(false);

        tracing::info!(
            "{}",
            logs::configured(
                options.stage.as_str(),
                &options.root_dir.display().to_string(),
                &options.modules_path.display().to_string(),
            )
        );

        Ok(Self {
            options,
            config,
            catalog,
            registered: Mutex::new(Vec::new()),
            modules: OnceLock::new(),
            lifecycle: Lifecycle::new(),
            sync_task: Mutex::new(None),
            stopped,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Names registered so far, in registration order.
    pub fn registered(&self) -> Vec<String> {
        self.registered
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    pub fn register_module(&self, name: &str) -> Result<(), AppError> {
        if self.lifecycle.state() != LifecycleState::Configured {
            return Err(AppError::RegistrationClosed(name.to_string()));
        }
        let mut registered = self
            .registered
            .lock()
            .map_err(|_| AppError::RegistrationClosed(name.to_string()))?;

        if registered.iter().any(|m| m == name) {
            tracing::warn!("{}", logs::module_already_registered(name));
        } else {
            tracing::debug!("{}", logs::module_registered(name));
            registered.push(name.to_string());
        }
        Ok(())
    }

    /// Starts the bot: loads modules, logs in and spawns the sync loop.
    ///
    /// Returns once the connection is up; use [`Application::wait`] to block until stop.
    pub async fn run(
        self: &Arc<Self>,
        env: &Environment,
        remote_logs: Option<RemoteLogs>,
    ) -> Result<()> {
        let Some(router) = self.launch(env).await? else {
            tracing::warn!("{}", logs::RUN_AFTER_STOP);
            return Ok(());
        };

        let credentials = self
            .config
            .matrix
            .as_ref()
            .ok_or_else(|| AppError::MissingCredentials(self.options.stage_config_file()))?;

        let client = tokio::select! {
            client = matrix::login_with_password(credentials) => client?,
            _ = self.wait() => {
                tracing::info!("{}", logs::LOGIN_ABORTED);
                return Ok(());
            }
        };
        tracing::info!("{}", logs::login_success(&credentials.username));

        if let (Some(room), Some(rx)) = (&self.config.remote_log_room, remote_logs) {
            self.forward_logs(&client, room, rx).await;
        }

        self.install_handlers(&client, Arc::new(router));

        let app = Arc::downgrade(self);
        let sync_client = client.clone();
        let handle = tokio::spawn(async move {
            tracing::info!("{}", logs::SYNC_LOOP_START);
            if let Err(e) = sync_client.sync(SyncSettings::default()).await {
                tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
            }
            if let Some(app) = app.upgrade() {
                app.stop();
            }
        });

        if let Ok(mut task) = self.sync_task.lock() {
            *task = Some(handle);
        }
        // A stop that raced with startup never saw the handle.
        if !self.lifecycle.is_running() {
            self.abort_sync();
        }
        Ok(())
    }

    /// Closes registration and loads the registered modules in order.
    ///
    /// `None` if the application was started before, or stopped before or during startup.
    pub async fn launch(&self, env: &Environment) -> Result<Option<ModuleRouter>> {
        if !self.lifecycle.start() {
            return Ok(None);
        }

        let names = self.registered();
        let mut modules: Vec<Arc<dyn Module>> = Vec::with_capacity(names.len());
        for name in &names {
            match self.catalog.instantiate(name) {
                Some(module) => modules.push(module),
                None => tracing::warn!("{}", logs::module_unavailable(name)),
            }
        }

        let loaded: Vec<String> = modules.iter().map(|m| m.name().to_string()).collect();
        let ctx = ModuleContext {
            loaded: loaded.into(),
            identity: env.identity.clone(),
            runtime: env.runtime,
            bot_name: self.bot_name(),
            settings: Arc::new(self.config.modules.clone()),
        };

        // Visible to stop before any on_start runs.
        let modules: Arc<[Arc<dyn Module>]> = modules.into();
        let _ = self.modules.set(modules.clone());

        for module in modules.iter() {
            module
                .on_start(&ctx)
                .await
                .with_context(|| logs::module_start_fail(module.name()))?;
        }
        if !self.lifecycle.is_running() {
            return Ok(None);
        }
        tracing::info!("{}", logs::modules_loaded(&ctx.loaded));

        Ok(Some(ModuleRouter::new(modules, ctx)))
    }

    /// Resolves once the application has stopped.
    pub async fn wait(&self) {
        let mut rx = self.stopped.subscribe();
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    fn bot_name(&self) -> String {
        self.config
            .matrix
            .as_ref()
            .map(|m| m.display_name.clone().unwrap_or_else(|| m.username.clone()))
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string())
    }

    fn install_handlers(&self, client: &Client, router: Arc<ModuleRouter>) {
        let start_time = SystemTime::now();

        client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
            let router = router.clone();
            async move {
                let Some(message) = matrix::incoming_text(&ev, &room, start_time) else {
                    return;
                };
                tracing::debug!("Received message from {}: \n{}", message.sender, message.body);
                let chat = MatrixService::new(room);
                router.route(&chat, &message).await;
            }
        });

        client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
            if ev.content.membership == MembershipState::Invite {
                tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
                if let Err(e) = room.join().await {
                    tracing::warn!("{}", logs::join_invite_fail(&e.to_string()));
                }
            }
        });
    }

    async fn forward_logs(&self, client: &Client, room: &str, mut rx: RemoteLogs) {
        let room_id = match <&RoomId>::try_from(room) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("{}", logs::remote_room_invalid(room, &e.to_string()));
                return;
            }
        };
        let room = match client.join_room_by_id(room_id).await {
            Ok(room) => room,
            Err(e) => {
                tracing::warn!("{}", logs::remote_room_join_fail(room, &e.to_string()));
                return;
            }
        };

        tokio::spawn(async move {
            let chat = MatrixService::new(room);
            forward_remote_lines(&chat, &mut rx).await;
        });
    }

    fn abort_sync(&self) {
        if let Ok(mut task) = self.sync_task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}

impl Stoppable for Application {
    fn stop(&self) {
        if !self.lifecycle.begin_stop() {
            tracing::debug!("{}", logs::ALREADY_STOPPED);
            return;
        }
        tracing::info!("{}", logs::SHUTDOWN);

        if let Some(modules) = self.modules.get() {
            for module in modules.iter() {
                module.on_stop();
            }
        }
        self.abort_sync();

        self.lifecycle.finish_stop();
        self.stopped.send_replace(true);
    }
}

/// Sends every queued log line to `chat`. Returns how many could not be sent.
///
/// The first failure goes to stderr: a tracing event would come back through
/// the remote sink.
async fn forward_remote_lines(chat: &dyn ChatProvider, rx: &mut RemoteLogs) -> usize {
    let mut dropped = 0;
    while let Some(line) = rx.recv().await {
        if let Err(e) = chat.send_notification(&line).await {
            if dropped == 0 {
                eprintln!("{}", logs::remote_log_send_fail(&e));
            }
            dropped += 1;
        }
    }
    if dropped > 0 {
        eprintln!("{}", logs::remote_logs_dropped(dropped));
    }
    dropped
}

/// Reads the stage config. A missing file means defaults; an empty one too.
pub fn load_config(options: &AppOptions) -> Result<BotConfig, AppError> {
    let path = options.stage_config_file();
    if !path.exists() {
        tracing::warn!("{}", logs::config_missing(&path.display().to_string()));
        return Ok(BotConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| AppError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(BotConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|source| AppError::ConfigParse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::env::Stage;
    use crate::domain::types::{Handled, IncomingMessage};
    use async_trait::async_trait;
    use crate::testing::RecordingChat;
    use std::sync::Weak;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Counted {
        name: String,
        started: Arc<AtomicUsize>,
        stopped: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Module for Counted {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_start(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_message(
            &self,
            _ctx: &ModuleContext,
            _message: &IncomingMessage,
            _chat: &dyn ChatProvider,
        ) -> anyhow::Result<Handled> {
            Ok(Handled::No)
        }

        fn on_stop(&self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        app: Arc<Application>,
        started: Arc<AtomicUsize>,
        stopped: Arc<AtomicUsize>,
    }

    fn fixture(names: &[&str]) -> Fixture {
        fixture_with_config(names, None)
    }

    fn fixture_with_config(names: &[&str], config: Option<&str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions::for_stage(dir.path(), &Stage::new("dev"));
        if let Some(config) = config {
            std::fs::create_dir_all(&options.config_path).unwrap();
            std::fs::write(options.stage_config_file(), config).unwrap();
        }
        let started = Arc::new(AtomicUsize::new(0));
        let stopped = Arc::new(AtomicUsize::new(0));

        let mut catalog = ModuleCatalog::empty();
        for name in names {
            let (s, t) = (started.clone(), stopped.clone());
            let name = name.to_string();
            catalog.register(&name.clone(), move || {
                Arc::new(Counted {
                    name: name.clone(),
                    started: s.clone(),
                    stopped: t.clone(),
                }) as Arc<dyn Module>
            });
        }

        let app = Arc::new(Application::with_catalog(options, catalog).unwrap());
        Fixture {
            _dir: dir,
            app,
            started,
            stopped,
        }
    }

    fn env() -> Environment {
        Environment::from_vars([("CFG", "autumn")])
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions::for_stage(dir.path(), &Stage::new("staging"));
        let err = Application::configure(options).err().unwrap();
        assert!(matches!(err, AppError::UnknownStage { .. }));
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let f = fixture(&["A", "B"]);
        f.app.register_module("A").unwrap();
        f.app.register_module("B").unwrap();
        f.app.register_module("A").unwrap();
        assert_eq!(f.app.registered(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_launch_loads_in_registration_order() {
        let f = fixture(&["A", "B", "C"]);
        for name in ["C", "Missing", "A"] {
            f.app.register_module(name).unwrap();
        }

        let router = f.app.launch(&env()).await.unwrap().unwrap();
        let names: Vec<&str> = router.modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(&*router.context().loaded, &["C".to_string(), "A".to_string()]);
        assert!(router.context().identity.is_alternate());
        assert_eq!(f.started.load(Ordering::SeqCst), 2);
        assert_eq!(f.app.state(), LifecycleState::Running);
    }

    #[tokio::test]
    async fn test_registration_closed_after_launch() {
        let f = fixture(&["A"]);
        f.app.register_module("A").unwrap();
        f.app.launch(&env()).await.unwrap();

        let err = f.app.register_module("B").unwrap_err();
        assert!(matches!(err, AppError::RegistrationClosed(name) if name == "B"));
        assert!(f.app.launch(&env()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let f = fixture(&["A", "B"]);
        f.app.register_module("A").unwrap();
        f.app.register_module("B").unwrap();
        f.app.launch(&env()).await.unwrap();

        f.app.stop();
        f.app.stop();
        f.app.stop();

        assert_eq!(f.app.state(), LifecycleState::Stopped);
        assert_eq!(f.stopped.load(Ordering::SeqCst), 2);
        // Already stopped: resolves immediately
        f.app.wait().await;
    }

    #[tokio::test]
    async fn test_stop_before_run() {
        let f = fixture(&["A"]);
        f.app.stop();
        assert_eq!(f.app.state(), LifecycleState::Stopped);
        assert!(f.app.register_module("A").is_err());
        assert!(f.app.launch(&env()).await.unwrap().is_none());
        // run bails out before touching the network
        f.app.run(&env(), None).await.unwrap();
        assert_eq!(f.started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stop_interrupts_pending_login() {
        // Accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = format!(
            "matrix:\n  homeserver: http://127.0.0.1:{port}\n  username: canni\n  password: pw\n"
        );
        let f = fixture_with_config(&["A"], Some(&config));
        f.app.register_module("A").unwrap();

        let env = env();
        let stopper = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            f.app.stop();
        };
        let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(f.app.run(&env, None), stopper)
        })
        .await
        .expect("run kept waiting on the login after stop");

        result.unwrap();
        assert_eq!(f.app.state(), LifecycleState::Stopped);
        assert_eq!(f.stopped.load(Ordering::SeqCst), 1);
        drop(listener);
    }

    struct StopsOnStart {
        app: Arc<OnceLock<Weak<Application>>>,
    }

    #[async_trait]
    impl Module for StopsOnStart {
        fn name(&self) -> &str {
            "StopsOnStart"
        }

        async fn on_start(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
            if let Some(app) = self.app.get().and_then(Weak::upgrade) {
                app.stop();
            }
            Ok(())
        }

        async fn on_message(
            &self,
            _ctx: &ModuleContext,
            _message: &IncomingMessage,
            _chat: &dyn ChatProvider,
        ) -> anyhow::Result<Handled> {
            Ok(Handled::No)
        }
    }

    #[tokio::test]
    async fn test_stop_during_launch_reaches_started_modules() {
        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions::for_stage(dir.path(), &Stage::new("dev"));
        let started = Arc::new(AtomicUsize::new(0));
        let stopped = Arc::new(AtomicUsize::new(0));
        let handle = Arc::new(OnceLock::new());

        let mut catalog = ModuleCatalog::empty();
        let (s, t) = (started.clone(), stopped.clone());
        catalog.register("A", move || {
            Arc::new(Counted {
                name: "A".to_string(),
                started: s.clone(),
                stopped: t.clone(),
            }) as Arc<dyn Module>
        });
        let h = handle.clone();
        catalog.register("StopsOnStart", move || {
            Arc::new(StopsOnStart { app: h.clone() }) as Arc<dyn Module>
        });

        let app = Arc::new(Application::with_catalog(options, catalog).unwrap());
        handle.set(Arc::downgrade(&app)).unwrap();
        app.register_module("A").unwrap();
        app.register_module("StopsOnStart").unwrap();

        assert!(app.launch(&env()).await.unwrap().is_none());
        assert_eq!(app.state(), LifecycleState::Stopped);
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    struct BrokenRoom;

    #[async_trait]
    impl ChatProvider for BrokenRoom {
        async fn send_message(&self, _content: &str) -> Result<String, String> {
            Err("M_FORBIDDEN".to_string())
        }

        async fn send_notification(&self, _content: &str) -> Result<(), String> {
            Err("M_FORBIDDEN".to_string())
        }

        async fn reply(&self, _sender: &str, _content: &str) -> Result<(), String> {
            Err("M_FORBIDDEN".to_string())
        }

        fn room_id(&self) -> String {
            "!logs:example.org".to_string()
        }
    }

    #[tokio::test]
    async fn test_forward_remote_lines_counts_failures() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        tx.send("one".to_string()).await.unwrap();
        tx.send("two".to_string()).await.unwrap();
        drop(tx);
        assert_eq!(forward_remote_lines(&BrokenRoom, &mut rx).await, 2);

        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        tx.send("three".to_string()).await.unwrap();
        drop(tx);
        let chat = RecordingChat::default();
        assert_eq!(forward_remote_lines(&chat, &mut rx).await, 0);
        assert_eq!(chat.sent(), vec!["three"]);
    }

    #[tokio::test]
    async fn test_run_without_credentials_fails() {
        let f = fixture(&[]);
        let err = f.app.run(&env(), None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_load_config_variants() {
        let dir = tempfile::tempdir().unwrap();
        let options = AppOptions::for_stage(dir.path(), &Stage::new("prod"));

        // Missing
        let config = load_config(&options).unwrap();
        assert!(config.matrix.is_none());

        std::fs::create_dir_all(&options.config_path).unwrap();

        // Empty
        std::fs::write(options.stage_config_file(), "\n").unwrap();
        assert!(load_config(&options).unwrap().modules.is_empty());

        // Present
        std::fs::write(
            options.stage_config_file(),
            "matrix:\n  homeserver: https://h\n  username: canni\n  password: pw\n  display_name: Canni Soda\n",
        )
        .unwrap();
        let config = load_config(&options).unwrap();
        assert_eq!(config.matrix.unwrap().display_name.as_deref(), Some("Canni Soda"));

        // Malformed
        std::fs::write(options.stage_config_file(), "matrix: [1, 2").unwrap();
        assert!(matches!(
            load_config(&options),
            Err(AppError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_bot_name_fallbacks() {
        let f = fixture(&[]);
        assert_eq!(f.app.bot_name(), DEFAULT_BOT_NAME);
    }
}
