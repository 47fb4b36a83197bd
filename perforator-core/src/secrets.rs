//! GitHub token lookup
//!
//! The token lives outside `config.toml` so the config can be shared freely.
//! Lookup order:
//! 1. `GITHUB_TOKEN` environment variable
//! 2. `~/.config/perforator/secrets.toml`, which must be private to its owner (0600 on Unix)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

const TOKEN_ENV: &str = "GITHUB_TOKEN";

const TEMPLATE: &str = r#"# Perforator secrets - keep this file private (chmod 600)

[github]
# Personal access token, created at https://github.com/settings/tokens
# Public repositories need no scopes; private ones need read access to
# contents, issues and pull requests.
token = ""
"#;

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    pub github: GitHubSecrets,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// Personal access token
    pub token: Option<String>,
}

impl Secrets {
    /// Load the secrets file if it exists, otherwise return empty secrets
    pub fn load() -> Result<Self> {
        match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load secrets from `path`, refusing files other users can read
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path).map_err(Error::Io)?.permissions().mode();
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. Run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        secrets.github.token = secrets.github.token.as_deref().and_then(non_empty);

        Ok(secrets)
    }

    /// `~/.config/perforator/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("perforator").join("secrets.toml"))
    }

    /// Resolve the token, preferring `GITHUB_TOKEN` over the file
    pub fn github_token(&self) -> Option<String> {
        self.resolve_token(std::env::var(TOKEN_ENV).ok())
    }

    fn resolve_token(&self, env_token: Option<String>) -> Option<String> {
        if let Some(token) = env_token.as_deref().and_then(non_empty) {
            debug!("Using GitHub token from {}", TOKEN_ENV);
            return Some(token);
        }

        let token = self.github.token.as_deref().and_then(non_empty);
        if token.is_some() {
            debug!("Using GitHub token from secrets file");
        }
        token
    }

    /// Write an empty secrets template to `path` with owner-only permissions
    ///
    /// Never overwrites an existing file.
    pub fn write_template(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        std::fs::write(path, TEMPLATE).map_err(Error::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Created secrets template, add your token to it");

        Ok(())
    }
}

fn non_empty(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
