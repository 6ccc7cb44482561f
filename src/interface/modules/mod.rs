//! # Built-in Modules
//!
//! Command handlers shipped with the bot. Each is registered in the catalog under
//! the name used in the module list; the application decides which ones load.

pub mod actions;
pub mod help;
pub mod mention;
pub mod pony;
pub mod silence;

use std::sync::Arc;

use crate::application::catalog::ModuleCatalog;
use crate::domain::traits::Module;

pub fn register_builtin(catalog: &mut ModuleCatalog) {
    catalog.register(help::NAME, || Arc::new(help::Help) as Arc<dyn Module>);
    for action in actions::ACTIONS {
        catalog.register(action.name, move || {
            Arc::new(actions::ActionModule::new(action)) as Arc<dyn Module>
        });
    }
    catalog.register(pony::BEST, || Arc::new(pony::PonyModule::best()) as Arc<dyn Module>);
    catalog.register(pony::WORST, || Arc::new(pony::PonyModule::worst()) as Arc<dyn Module>);
    catalog.register(mention::NAME, || Arc::new(mention::MentionCanni) as Arc<dyn Module>);
    catalog.register(silence::NAME, || {
        Arc::new(silence::NoMessageProcessor) as Arc<dyn Module>
    });
}

/// Usage line shown by `!help`, for modules that expose a command.
pub fn usage(name: &str) -> Option<&'static str> {
    if name == help::NAME {
        return Some("`!help` lists loaded commands");
    }
    if name == pony::BEST {
        return Some("`!bestpony`");
    }
    if name == pony::WORST {
        return Some("`!worstpony`");
    }
    actions::ACTIONS
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.usage)
}
