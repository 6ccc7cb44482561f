pub fn configured(stage: &str, root: &str, modules: &str) -> String {
    format!("Configured stage '{stage}' rooted at {root}, module data in {modules}")
}

pub fn config_missing(path: &str) -> String {
    format!("No config file at {path}, using defaults")
}

pub fn module_registered(name: &str) -> String {
    format!("Registered module {name}")
}

pub fn module_already_registered(name: &str) -> String {
    format!("Module {name} is already registered, ignoring")
}

pub fn module_unavailable(name: &str) -> String {
    format!("No implementation for module {name}, skipping")
}

pub fn module_start_fail(name: &str) -> String {
    format!("Module {name} failed to start")
}

pub fn modules_loaded(names: &[String]) -> String {
    format!("Loaded {} modules: {}", names.len(), names.join(", "))
}

pub const LOGIN_ABORTED: &str = "Stop requested during login, not starting sync";

pub fn remote_log_send_fail(error: &str) -> String {
    format!("Failed to send log line to the remote log room: {error}")
}

pub fn remote_logs_dropped(count: usize) -> String {
    format!("Remote log forwarding ended, {count} lines could not be sent")
}

pub const RUN_AFTER_STOP: &str = "Application was stopped before it could run";
pub const CLIENT_BUILD_ERROR: &str = "Failed to build Matrix client";
pub const LOGIN_ERROR: &str = "Failed to log in";

pub fn login_success(user: &str) -> String {
    format!("Logged in as {user}!")
}

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const SHUTDOWN: &str = "Shutting down...";
pub const ALREADY_STOPPED: &str = "Stop requested, application already stopped";

pub fn signal_received(signal: &str) -> String {
    format!("Received {signal}, stopping")
}

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn remote_room_invalid(room: &str, err: &str) -> String {
    format!("Remote log room '{room}' is not a valid room id: {err}")
}

pub fn remote_room_join_fail(room: &str, err: &str) -> String {
    format!("Failed to join remote log room {room}: {err}")
}
