use meme_core::scripting::python::DEFAULT_PYTHON_BIN;

/// Server configuration loaded from environment variables.
///
/// Defaults target a local Jekyll dev setup. `PORCHROOT_AUTO_DIR` is not
/// read here: the repository locator re-reads it on every request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Interpreter that hosts generator scripts (default: `python3`).
    pub python_bin: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default                  |
    /// |--------------------|--------------------------|
    /// | `HOST`             | `127.0.0.1`              |
    /// | `PORT`             | `8001`                   |
    /// | `CORS_ORIGINS`     | `http://localhost:4000`  |
    /// | `PORCHROOT_PYTHON` | `python3`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:4000".into()),
        );

        let python_bin = std::env::var("PORCHROOT_PYTHON")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PYTHON_BIN.into());

        Self {
            host,
            port,
            cors_origins,
            python_bin,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://localhost:4000 ,, http://127.0.0.1:4000"),
            vec![
                "http://localhost:4000".to_string(),
                "http://127.0.0.1:4000".to_string()
            ]
        );
        assert!(parse_origins("").is_empty());
    }
}
