use std::{
    collections::HashSet,
    sync::{Arc, RwLock},
};

use tracing::{info, warn};

use crate::config::Config;

const WILDCARD: &str = "*";

/// Allow-list of identifiers that may produce notifications.
///
/// A configured value consisting of the single token `*` allows every
/// non-empty identifier; the identifier set then stays empty. Matching is
/// case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistGate {
    name: String,
    allow_all: bool,
    identifiers: HashSet<String>,
}

impl WhitelistGate {
    pub fn parse(name: impl Into<String>, raw: &str) -> Self {
        let name = name.into();

        if raw.trim() == WILDCARD {
            return Self {
                name,
                allow_all: true,
                identifiers: HashSet::new(),
            };
        }

        let identifiers = raw
            .split(',')
            .map(|id| id.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .collect::<HashSet<_>>();

        if identifiers.is_empty() {
            warn!(whitelist = %name, "Whitelist is empty, nothing will be notified");
        }

        Self {
            name,
            allow_all: false,
            identifiers,
        }
    }

    pub fn is_allowed(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return false;
        }

        self.allow_all || self.identifiers.contains(&identifier.to_lowercase())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allows_all(&self) -> bool {
        self.allow_all
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.allow_all && self.identifiers.is_empty()
    }
}

/// All whitelists of one configuration snapshot.
#[derive(Debug, Clone)]
pub struct Whitelists {
    pub case_create: WhitelistGate,
    pub case_update: WhitelistGate,
    pub case_close: WhitelistGate,
    pub task_assigned: WhitelistGate,
    pub decision_made: WhitelistGate,
    pub decision_info_object_types: WhitelistGate,
}

impl Whitelists {
    pub fn from_config(config: &Config) -> Self {
        Self {
            case_create: WhitelistGate::parse(
                "WHITELIST_CASE_CREATE_IDS",
                &config.whitelist_case_create_ids,
            ),
            case_update: WhitelistGate::parse(
                "WHITELIST_CASE_UPDATE_IDS",
                &config.whitelist_case_update_ids,
            ),
            case_close: WhitelistGate::parse(
                "WHITELIST_CASE_CLOSE_IDS",
                &config.whitelist_case_close_ids,
            ),
            task_assigned: WhitelistGate::parse(
                "WHITELIST_TASK_ASSIGNED_IDS",
                &config.whitelist_task_assigned_ids,
            ),
            decision_made: WhitelistGate::parse(
                "WHITELIST_DECISION_MADE_IDS",
                &config.whitelist_decision_made_ids,
            ),
            decision_info_object_types: WhitelistGate::parse(
                "WHITELIST_DECISION_INFO_OBJECT_TYPE_UUIDS",
                &config.whitelist_decision_info_object_type_uuids,
            ),
        }
    }
}

/// Configuration and the whitelists built from it, replaced as one unit.
#[derive(Debug)]
pub struct Settings {
    pub config: Arc<Config>,
    pub whitelists: Arc<Whitelists>,
}

impl Settings {
    pub fn new(config: Config) -> Self {
        let whitelists = Whitelists::from_config(&config);
        Self {
            config: Arc::new(config),
            whitelists: Arc::new(whitelists),
        }
    }
}

/// Shared handle to the active settings.
///
/// Readers clone the inner `Arc` once per event and keep using that
/// snapshot; `reload` builds a fresh snapshot and swaps the pointer.
pub struct SettingsRegistry {
    current: RwLock<Arc<Settings>>,
}

impl SettingsRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(Settings::new(config))),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn reload(&self, config: Config) {
        let fresh = Arc::new(Settings::new(config));
        match self.current.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        info!("Configuration and whitelists reloaded");
    }
}
