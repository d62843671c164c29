use std::sync::Arc;

use meme_core::locator::RepoLocator;
use meme_core::scripting::executor::ScriptLoader;
use meme_core::scripting::python::PythonLoader;
use meme_core::scripting::registry::ModuleRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resolves the Porchroot Auto checkout (used directly by `/health`).
    pub locator: RepoLocator,
    /// Opens generator scripts.
    pub loader: Arc<dyn ScriptLoader>,
    /// Most recently loaded module per script name.
    pub registry: Arc<ModuleRegistry>,
}

impl AppState {
    /// Production state: scripts are hosted by `config.python_bin` and the
    /// repository comes from `PORCHROOT_AUTO_DIR` or the default location.
    pub fn from_config(config: ServerConfig) -> Self {
        let locator = RepoLocator::from_env();
        let loader = PythonLoader::new(locator.clone(), config.python_bin.clone());
        Self {
            config: Arc::new(config),
            locator,
            loader: Arc::new(loader),
            registry: Arc::new(ModuleRegistry::new()),
        }
    }
}
