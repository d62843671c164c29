//! Locates the Porchroot Auto checkout that holds the generator scripts.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Environment variable that overrides the default repository location.
pub const PORCHROOT_DIR_ENV: &str = "PORCHROOT_AUTO_DIR";

/// Location of the Porchroot Auto repo relative to the site root.
const DEFAULT_RELATIVE_DIR: &str = "_personal_sandbox_CJT01/projects/porchroot-auto";

/// Resolves the script repository directory on every call (no caching).
#[derive(Debug, Clone)]
pub struct RepoLocator {
    /// Env var consulted first; `None` pins the locator to `default_dir`.
    env_var: Option<&'static str>,
    default_dir: PathBuf,
}

impl RepoLocator {
    /// Locator that honours `PORCHROOT_AUTO_DIR` and falls back to the
    /// sibling project next to this adapter.
    pub fn from_env() -> Self {
        Self {
            env_var: Some(PORCHROOT_DIR_ENV),
            default_dir: default_repo_dir(),
        }
    }

    /// Locator that always points at `dir`.
    pub fn fixed(dir: impl Into<PathBuf>) -> Self {
        Self {
            env_var: None,
            default_dir: dir.into(),
        }
    }

    /// The path that [`resolve`](Self::resolve) would check, without touching the filesystem.
    pub fn candidate(&self) -> PathBuf {
        self.env_var
            .and_then(std::env::var_os)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_dir.clone())
    }

    /// Resolve the repository directory, failing if it does not exist.
    pub fn resolve(&self) -> Result<PathBuf, CoreError> {
        let root = self.candidate();
        if !root.exists() {
            return Err(CoreError::RepositoryNotFound { path: root });
        }
        Ok(root)
    }
}

/// Default repository path.
///
/// This crate lives at `<site>/dev_tools/meme_generator/crates/core`; the
/// Porchroot checkout sits under the site root.
pub fn default_repo_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let site_root = manifest_dir.ancestors().nth(4).unwrap_or(manifest_dir);
    site_root.join(DEFAULT_RELATIVE_DIR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
