//! Plugin-boundary interface and shared types.
//!
//! Defines [`ScriptModule`], the narrow view the adapter has of a loaded
//! generator script, [`ScriptLoader`], which opens modules by name, and
//! [`ScriptError`] for failures on the far side of the boundary.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::CoreError;

/// Errors that can occur while talking to a hosted script.
#[derive(Debug)]
pub enum ScriptError {
    /// The script's top-level code or the called function raised.
    Raised(String),
    /// The host process wrote something that is not a valid protocol message.
    Protocol(String),
    /// The host process exited before answering.
    Exited,
    /// An I/O error occurred while spawning or communicating with the process.
    IoError(std::io::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raised(msg) => write!(f, "{msg}"),
            Self::Protocol(msg) => write!(f, "Bridge protocol error: {msg}"),
            Self::Exited => write!(f, "Script host exited unexpectedly"),
            Self::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

/// A loaded script, exposing its top-level constants and callables.
#[async_trait]
pub trait ScriptModule: Send + Sync {
    /// Name the module was loaded under.
    fn name(&self) -> &str;

    /// File the module was loaded from.
    fn path(&self) -> &Path;

    /// Top-level constants, JSON-encoded.
    fn attrs(&self) -> &Map<String, Value>;

    /// Names of the module's top-level callables.
    fn functions(&self) -> &[String];

    /// Call `function` with positional `args` and return its result.
    async fn call(&self, function: &str, args: Vec<Value>) -> Result<Value, ScriptError>;

    /// Look up a single top-level constant.
    fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs().get(name)
    }
}

/// Opens a script module by name.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    /// Load `script_name`, executing its top-level code.
    async fn load(&self, script_name: &str) -> Result<Arc<dyn ScriptModule>, CoreError>;
}

/// Encode a filesystem path as a call argument; the host turns it into a
/// `pathlib.Path`.
pub fn path_arg(path: &Path) -> Value {
    json!({ "__path__": path.display().to_string() })
}

/// Python truthiness of a returned value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
