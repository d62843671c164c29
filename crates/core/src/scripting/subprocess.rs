//! Bridge process management.
//!
//! [`spawn_bridge`] starts a Python interpreter running the embedded bridge
//! program for one script; [`BridgeSession`] exchanges line-delimited JSON
//! messages with it.

use std::path::Path;
use std::process::Stdio;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use super::executor::ScriptError;

/// Source of the bridge program, passed to the interpreter with `-c`.
const BRIDGE_SOURCE: &str = include_str!("bridge.py");

/// Maximum size of a single protocol line (10 MiB).
///
/// A longer line fails the exchange and retires the session, since the rest
/// of it is still queued in the pipe.
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

/// A running bridge process and its protocol pipes.
///
/// Once an exchange fails mid-stream the session is retired: the child is
/// killed and every later exchange returns [`ScriptError::Exited`].
pub struct BridgeSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    retired: bool,
}

/// Spawn `python_bin` hosting `script_path` under `module_name`.
///
/// Stderr is inherited so script logging shows up in the adapter's console.
pub fn spawn_bridge(
    python_bin: &str,
    script_path: &Path,
    module_name: &str,
) -> Result<BridgeSession, ScriptError> {
    let mut cmd = Command::new(python_bin);
    cmd.arg("-c")
        .arg(BRIDGE_SOURCE)
        .arg(script_path)
        .arg(module_name)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(ScriptError::IoError)?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| ScriptError::Protocol("bridge stdin not captured".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ScriptError::Protocol("bridge stdout not captured".to_string()))?;

    Ok(BridgeSession {
        child,
        stdin,
        stdout: BufReader::new(stdout),
        retired: false,
    })
}

impl BridgeSession {
    /// Read the next message from the bridge.
    pub async fn receive(&mut self) -> Result<Value, ScriptError> {
        if self.retired {
            return Err(ScriptError::Exited);
        }
        let result = self.read_message().await;
        if result.is_err() {
            self.retire();
        }
        result
    }

    /// Write one message and wait for its reply.
    pub async fn request(&mut self, message: &Value) -> Result<Value, ScriptError> {
        if self.retired {
            return Err(ScriptError::Exited);
        }
        let mut bytes =
            serde_json::to_vec(message).map_err(|e| ScriptError::Protocol(e.to_string()))?;
        bytes.push(b'\n');
        if let Err(e) = self.write_message(&bytes).await {
            self.retire();
            return Err(e);
        }
        self.receive().await
    }

    async fn write_message(&mut self, bytes: &[u8]) -> Result<(), ScriptError> {
        self.stdin
            .write_all(bytes)
            .await
            .map_err(ScriptError::IoError)?;
        self.stdin.flush().await.map_err(ScriptError::IoError)
    }

    async fn read_message(&mut self) -> Result<Value, ScriptError> {
        let mut line = String::new();
        let read = (&mut self.stdout)
            .take(MAX_LINE_BYTES as u64)
            .read_line(&mut line)
            .await
            .map_err(ScriptError::IoError)?;
        if read == 0 {
            return Err(ScriptError::Exited);
        }
        if !line.ends_with('\n') {
            return Err(ScriptError::Protocol(format!(
                "bridge message exceeds {MAX_LINE_BYTES} bytes"
            )));
        }
        serde_json::from_str(line.trim()).map_err(|e| ScriptError::Protocol(e.to_string()))
    }

    fn retire(&mut self) {
        self.retired = true;
        if let Err(e) = self.child.start_kill() {
            tracing::debug!(error = %e, "Bridge process already gone");
        }
    }
}
