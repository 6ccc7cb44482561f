//! # Environment
//!
//! Every environment variable the bot consumes is read here, once, into an
//! [`Environment`] value that is passed by reference to whoever needs it.

use std::collections::HashMap;
use std::fmt;

/// Stage used when neither `STAGE` nor `NODE_ENV` is set.
pub const DEFAULT_STAGE: &str = "dev";

/// Identity tag that selects alternate configuration values.
pub const ALTERNATE_IDENTITY: &str = "autumn";

/// Named deployment environment (`dev`, `prod`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stage(String);

impl Stage {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    /// `STAGE`, then `NODE_ENV`, then [`DEFAULT_STAGE`]. Empty values are skipped.
    pub fn detect<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let raw = set("STAGE")
            .or_else(|| set("NODE_ENV"))
            .unwrap_or(DEFAULT_STAGE);
        Self::new(raw)
    }

    pub fn from_process() -> Self {
        let vars = process_vars();
        Self::detect(|key| vars.get(key).map(String::as_str))
    }

    pub fn is_dev(&self) -> bool {
        self.0 == DEFAULT_STAGE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `development` / `production` split read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn from_node_env(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Developer identity tag from `CFG`, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity(Option<String>);

impl Identity {
    pub fn new(tag: Option<&str>) -> Self {
        Self(tag.map(str::to_lowercase))
    }

    pub fn tag(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_alternate(&self) -> bool {
        self.tag() == Some(ALTERNATE_IDENTITY)
    }
}

/// Snapshot of the process environment taken at startup.
#[derive(Debug, Clone)]
pub struct Environment {
    pub stage: Stage,
    pub runtime: RuntimeMode,
    pub identity: Identity,
    pub disabled_modules: Option<String>,
    pub enabled_modules: Option<String>,
    pub token: Option<String>,
    pub no_silly: bool,
    pub silly: bool,
}

impl Environment {
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |key: &str| vars.get(key).map(String::as_str);
        let flag = |key: &str| get(key).is_some_and(|v| !v.is_empty());

        Self {
            stage: Stage::detect(get),
            runtime: RuntimeMode::from_node_env(get("NODE_ENV")),
            identity: Identity::new(get("CFG")),
            disabled_modules: get("DISABLED_MODULES").map(str::to_string),
            enabled_modules: get("ENABLED_MODULES").map(str::to_string),
            token: get("TOKEN").map(str::to_string),
            no_silly: flag("NO_SILLY"),
            silly: flag("SILLY"),
        }
    }

    pub fn from_process() -> Self {
        Self::from_vars(process_vars())
    }
}

/// Variables read from the process environment.
const KEYS: [&str; 8] = [
    "STAGE",
    "NODE_ENV",
    "CFG",
    "DISABLED_MODULES",
    "ENABLED_MODULES",
    "TOKEN",
    "NO_SILLY",
    "SILLY",
];

/// Only [`KEYS`] are looked up; a value that is not valid UTF-8 counts as unset.
fn process_vars() -> HashMap<String, String> {
    KEYS.iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
        .collect()
}
