//! Module registry: the symbol table modules are resolved against.
//!
//! Two tables: module id → [`Module`], alias name → target id.
//! Both follow first-wins: a second registration under an existing key is
//! dropped and reported as [`Registration::AlreadyExists`].

use std::collections::{BTreeMap, HashMap};

use dcl_core::{ConfigurationError, Module};

/// Outcome of a registration attempt.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// The key was already taken; the existing entry was kept.
    AlreadyExists,
}

/// Stores loaded modules and alias indirections.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Module>,
    aliases: BTreeMap<String, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Keeps the existing module if the id is taken.
    pub fn register(&mut self, module: Module) -> Registration {
        if self.modules.contains_key(&module.id) {
            return Registration::AlreadyExists;
        }
        self.modules.insert(module.id.clone(), module);
        Registration::Inserted
    }

    /// Register an alias. Keeps the existing target if the name is taken.
    pub fn register_alias(&mut self, name: impl Into<String>, target_id: impl Into<String>) -> Registration {
        let name = name.into();
        if self.aliases.contains_key(&name) {
            return Registration::AlreadyExists;
        }
        self.aliases.insert(name, target_id.into());
        Registration::Inserted
    }

    /// Check that every alias targets an existing module id.
    ///
    /// Aliases are checked in name order, so the reported alias is stable.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (alias, target) in &self.aliases {
            if !self.modules.contains_key(target) {
                return Err(ConfigurationError::InvalidAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a module by exact id, then by alias. No partial matching.
    pub fn get(&self, key: &str) -> Option<&Module> {
        if let Some(module) = self.modules.get(key) {
            return Some(module);
        }
        self.aliases
            .get(key)
            .and_then(|target| self.modules.get(target))
    }

    /// All registered module ids, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All aliases as `(name, target)`, sorted by name.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The target id an alias points to.
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
