//! Python script loader.
//!
//! Each load spawns a fresh interpreter that imports `<repo>/<name>.py` and
//! stays alive as long as the returned module handle does.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use super::executor::{ScriptError, ScriptLoader, ScriptModule};
use super::subprocess::{spawn_bridge, BridgeSession};
use crate::error::CoreError;
use crate::locator::RepoLocator;

/// Interpreter used when none is configured.
pub const DEFAULT_PYTHON_BIN: &str = "python3";

/// Loads generator scripts from the Porchroot repo into bridge processes.
pub struct PythonLoader {
    locator: RepoLocator,
    python_bin: String,
}

impl PythonLoader {
    pub fn new(locator: RepoLocator, python_bin: impl Into<String>) -> Self {
        Self {
            locator,
            python_bin: python_bin.into(),
        }
    }
}

#[async_trait]
impl ScriptLoader for PythonLoader {
    async fn load(&self, script_name: &str) -> Result<Arc<dyn ScriptModule>, CoreError> {
        let root = self.locator.resolve()?;
        let script_path = root.join(format!("{script_name}.py"));
        if !script_path.exists() {
            return Err(CoreError::ScriptMissing { path: script_path });
        }

        let load_failed = |reason: String| CoreError::ScriptLoadFailed {
            path: script_path.clone(),
            reason,
        };

        let mut session = spawn_bridge(&self.python_bin, &script_path, script_name)
            .map_err(|e| load_failed(e.to_string()))?;
        let handshake = session
            .receive()
            .await
            .map_err(|e| load_failed(e.to_string()))?;
        let (attrs, functions) = parse_handshake(handshake).map_err(load_failed)?;

        tracing::info!(
            script = script_name,
            path = %script_path.display(),
            attrs = attrs.len(),
            functions = functions.len(),
            "Loaded script module"
        );

        Ok(Arc::new(PythonModule {
            name: script_name.to_string(),
            path: script_path,
            attrs,
            functions,
            session: Mutex::new(session),
        }))
    }
}

/// A script hosted in a bridge process.
pub struct PythonModule {
    name: String,
    path: PathBuf,
    attrs: Map<String, Value>,
    functions: Vec<String>,
    session: Mutex<BridgeSession>,
}

#[async_trait]
impl ScriptModule for PythonModule {
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
        &self.functions
    }

    async fn call(&self, function: &str, args: Vec<Value>) -> Result<Value, ScriptError> {
        let request = json!({ "call": function, "args": args });
        let reply = self.session.lock().await.request(&request).await?;
        parse_reply(reply)
    }
}

/// Split a handshake into exported constants and callable names, or return
/// the reason the module could not be loaded.
fn parse_handshake(mut message: Value) -> Result<(Map<String, Value>, Vec<String>), String> {
    if message["ok"].as_bool() != Some(true) {
        return Err(message["error"]
            .as_str()
            .unwrap_or("bridge reported an unknown failure")
            .to_string());
    }
    let attrs = match message["attrs"].take() {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => return Err(format!("malformed attrs in handshake: {other}")),
    };
    let functions = message["functions"]
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    Ok((attrs, functions))
}

fn parse_reply(mut reply: Value) -> Result<Value, ScriptError> {
    match reply["ok"].as_bool() {
        Some(true) => Ok(reply["value"].take()),
        Some(false) => Err(ScriptError::Raised(
            reply["error"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
        )),
        None => Err(ScriptError::Protocol(format!("unexpected reply: {reply}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::scripting::executor::path_arg;

    #[test]
    fn handshake_failure_carries_bridge_error() {
        let err = parse_handshake(json!({"ok": false, "kind": "exec", "error": "NameError: x"}))
            .unwrap_err();
        assert_eq!(err, "NameError: x");
    }

    #[test]
    fn handshake_success_splits_attrs_and_functions() {
        let (attrs, functions) = parse_handshake(json!({
            "ok": true,
            "attrs": {"PROMPTS": ["a"], "OUTPUT_DIR": "/out"},
            "functions": ["generate_wizard_background"]
        }))
        .expect("parse");
        assert_eq!(attrs["OUTPUT_DIR"], "/out");
        assert_eq!(functions, vec!["generate_wizard_background".to_string()]);
    }

    #[test]
    fn reply_errors_become_raised() {
        let err = parse_reply(json!({"ok": false, "error": "RuntimeError: quota"})).unwrap_err();
        assert_matches!(err, ScriptError::Raised(ref msg) if msg == "RuntimeError: quota");
        assert_matches!(
            parse_reply(json!({"value": 1})),
            Err(ScriptError::Protocol(_))
        );
    }

    fn python_available() -> bool {
        std::process::Command::new(DEFAULT_PYTHON_BIN)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn write_script(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(format!("{name}.py")), body).expect("write script");
    }

    #[tokio::test]
    async fn missing_script_names_expected_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loader = PythonLoader::new(RepoLocator::fixed(dir.path()), DEFAULT_PYTHON_BIN);

        let err = loader.load("does_not_exist").await.err().expect("should fail");

        let expected = dir.path().join("does_not_exist.py");
        assert_matches!(err, CoreError::ScriptMissing { ref path } if *path == expected);
        assert!(err.to_string().contains("does_not_exist.py"));
    }

    #[tokio::test]
    async fn missing_repo_fails_before_script_lookup() {
        let loader = PythonLoader::new(RepoLocator::fixed("/nonexistent/repo"), DEFAULT_PYTHON_BIN);
        let err = loader.load("generate_wizard_memes").await.err().expect("should fail");
        assert_matches!(err, CoreError::RepositoryNotFound { .. });
    }

    #[tokio::test]
    async fn loads_constants_and_calls_functions() {
        if !python_available() {
            eprintln!("Skipping test: python3 not available");
            return;
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        write_script(
            dir.path(),
            "generate_wizard_memes",
            r#"
from pathlib import Path

print("noisy import")
PROMPTS = ["castle", "tower"]
OUTPUT_DIR = Path("/tmp/wizard_out")

def generate_wizard_background(prompt, output_path, index):
    print("generating", prompt)
    return isinstance(output_path, Path) and output_path.name == f"wizard_bg_{index:02d}.png"

def explode():
    raise RuntimeError("quota exceeded")
"#,
        );
        let loader = PythonLoader::new(RepoLocator::fixed(dir.path()), DEFAULT_PYTHON_BIN);

        let module = loader.load("generate_wizard_memes").await.expect("load");

        assert_eq!(module.attr("PROMPTS"), Some(&json!(["castle", "tower"])));
        assert_eq!(module.attr("OUTPUT_DIR"), Some(&json!("/tmp/wizard_out")));
        assert!(module
            .functions()
            .contains(&"generate_wizard_background".to_string()));

        let ok = module
            .call(
                "generate_wizard_background",
                vec![
                    json!("castle"),
                    path_arg(Path::new("/tmp/wizard_out/wizard_bg_01.png")),
                    json!(1),
                ],
            )
            .await
            .expect("call");
        assert_eq!(ok, json!(true));

        let err = module.call("explode", vec![]).await.unwrap_err();
        assert_matches!(err, ScriptError::Raised(ref msg) if msg == "RuntimeError: quota exceeded");

        let err = module.call("no_such_function", vec![]).await.unwrap_err();
        assert!(err.to_string().starts_with("AttributeError"));
    }

    #[tokio::test]
    async fn oversized_reply_retires_the_session() {
        if !python_available() {
            eprintln!("Skipping test: python3 not available");
            return;
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        write_script(
            dir.path(),
            "chatty",
            r#"
def big():
    return "x" * (11 * 1024 * 1024)

def small():
    return 42
"#,
        );
        let loader = PythonLoader::new(RepoLocator::fixed(dir.path()), DEFAULT_PYTHON_BIN);
        let module = loader.load("chatty").await.expect("load");

        let err = module.call("big", vec![]).await.unwrap_err();
        assert_matches!(err, ScriptError::Protocol(ref msg) if msg.contains("exceeds"));

        // The rest of the oversized line must never be read as the next reply.
        let err = module.call("small", vec![]).await.unwrap_err();
        assert_matches!(err, ScriptError::Exited);
    }

    #[tokio::test]
    async fn import_error_is_load_failure() {
        if !python_available() {
            eprintln!("Skipping test: python3 not available");
            return;
        }
        let dir = tempfile::tempdir().expect("create temp dir");
        write_script(dir.path(), "broken", "raise ImportError('no gemini client')\n");
        let loader = PythonLoader::new(RepoLocator::fixed(dir.path()), DEFAULT_PYTHON_BIN);

        let err = loader.load("broken").await.err().expect("should fail");

        assert_matches!(err, CoreError::ScriptLoadFailed { ref reason, .. } if reason.contains("no gemini client"));
    }
}
