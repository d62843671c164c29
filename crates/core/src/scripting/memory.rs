//! In-process script modules for tests.
//!
//! [`InMemoryModule`] answers calls from Rust closures and records every
//! call it receives; [`InMemoryLoader`] serves a fixed set of them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::executor::{ScriptError, ScriptLoader, ScriptModule};
use crate::error::CoreError;

type Handler = Box<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// A scripted module whose functions are Rust closures.
pub struct InMemoryModule {
    name: String,
    path: PathBuf,
    attrs: Map<String, Value>,
    function_names: Vec<String>,
    handlers: HashMap<String, Handler>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl InMemoryModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.py")),
            attrs: Map::new(),
            function_names: Vec::new(),
            handlers: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_string(), value);
        self
    }

    /// Register `name` as a callable. An `Err` is reported as a raised exception.
    pub fn with_function<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.function_names.push(name.to_string());
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Arguments of every call to `function`, in order.
    pub fn calls_to(&self, function: &str) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == function)
            .map(|(_, args)| args)
            .collect()
    }
}

#[async_trait]
impl ScriptModule for InMemoryModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    fn functions(&self) -> &[String] {
        &self.function_names
    }

    async fn call(&self, function: &str, args: Vec<Value>) -> Result<Value, ScriptError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((function.to_string(), args.clone()));

        let handler = self.handlers.get(function).ok_or_else(|| {
            ScriptError::Raised(format!(
                "AttributeError: module '{}' has no attribute '{function}'",
                self.name
            ))
        })?;
        handler(args.as_slice()).map_err(ScriptError::Raised)
    }
}

/// Serves a fixed set of [`InMemoryModule`]s rooted at a pretend repository.
pub struct InMemoryLoader {
    root: PathBuf,
    modules: HashMap<String, Arc<InMemoryModule>>,
}

impl InMemoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: HashMap::new(),
        }
    }

    pub fn with_module(self, module: InMemoryModule) -> Self {
        self.with_shared_module(Arc::new(module))
    }

    /// Register a module the test keeps a handle to, for inspecting calls.
    pub fn with_shared_module(mut self, module: Arc<InMemoryModule>) -> Self {
        self.modules.insert(module.name.clone(), module);
        self
    }
}

#[async_trait]
impl ScriptLoader for InMemoryLoader {
    async fn load(&self, script_name: &str) -> Result<Arc<dyn ScriptModule>, CoreError> {
        match self.modules.get(script_name) {
            Some(module) => Ok(Arc::clone(module) as Arc<dyn ScriptModule>),
            None => Err(CoreError::ScriptMissing {
                path: self.root.join(format!("{script_name}.py")),
            }),
        }
    }
}
