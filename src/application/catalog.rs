//! # Module Catalog
//!
//! Maps module names to constructors. Registration only records a name; the catalog
//! turns names into live modules when the application runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::traits::Module;

type Factory = Box<dyn Fn() -> Arc<dyn Module> + Send + Sync>;

pub struct ModuleCatalog {
    factories: HashMap<String, Factory>,
}

impl ModuleCatalog {
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Catalog with every module shipped in `interface::modules`.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        crate::interface::modules::register_builtin(&mut catalog);
        catalog
    }

    pub fn register(
        &mut self,
        name: &str,
        factory: impl Fn() -> Arc<dyn Module> + Send + Sync + 'static,
    ) {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn instantiate(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.factories.get(name).map(|factory| factory())
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ModuleCatalog").field("modules", &names).finish()
    }
}
