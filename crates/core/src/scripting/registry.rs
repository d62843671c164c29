//! Explicit registry of the most recently loaded module per script name.
//!
//! Held in application state rather than as a process global. Eviction is
//! unconditional overwrite: each load replaces the previous entry, and the
//! replaced module is released once no in-flight request still holds it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::executor::{ScriptLoader, ScriptModule};
use crate::error::CoreError;

/// Script-name keyed map of loaded modules.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, Arc<dyn ScriptModule>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `script_name` through `loader` and register the result.
    ///
    /// The caller keeps its own handle, so a concurrent load that overwrites
    /// the entry does not affect the module returned here.
    pub async fn load(
        &self,
        loader: &dyn ScriptLoader,
        script_name: &str,
    ) -> Result<Arc<dyn ScriptModule>, CoreError> {
        let module = loader.load(script_name).await?;
        let replaced = self.insert(script_name, Arc::clone(&module)).is_some();
        tracing::debug!(
            script = script_name,
            path = %module.path().display(),
            functions = ?module.functions(),
            replaced,
            "Registered script module"
        );
        Ok(module)
    }

    /// Register `module` under `name`, returning the entry it replaced.
    pub fn insert(
        &self,
        name: &str,
        module: Arc<dyn ScriptModule>,
    ) -> Option<Arc<dyn ScriptModule>> {
        self.modules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), module)
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ScriptModule>> {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    #[cfg(any(test, feature = "testing"))]
    /// Registered script names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn len(&self) -> usize {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
