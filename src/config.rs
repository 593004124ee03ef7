//! Endpoint configuration read from the environment.
//!
//! Settings come from the process environment and from the user-scoped env
//! file `~/.soonerai.env`. A variable set in the process environment wins over
//! the same variable in the file.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the bearer token.
pub const API_KEY_VAR: &str = "SOONERAI_API_KEY";
/// Environment variable overriding the service base URL.
pub const BASE_URL_VAR: &str = "SOONERAI_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "SOONERAI_MODEL";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://ai.sooners.us";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemma3:4b";
/// Name of the env file looked up in the home directory.
pub const ENV_FILE_NAME: &str = ".soonerai.env";

const COMPLETIONS_PATH: &str = "api/chat/completions";

/// A bearer token whose `Debug` output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a token.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Resolved endpoint settings. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    api_key: ApiKey,
    base_url: String,
    model: String,
    endpoint: Url,
}

impl ApiSettings {
    /// Builds settings from explicit values, applying defaults for the base
    /// URL and model.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the key is missing or empty, or when
    /// the base URL does not form a valid endpoint.
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Missing {API_KEY_VAR} in ~/{ENV_FILE_NAME} or the environment. \
                     Create a key in the service dashboard and try again."
                ))
            })?;
        let base_url = normalize_base_url(
            base_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_BASE_URL),
        );
        let model = model
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let endpoint = Url::parse(&format!("{base_url}/{COMPLETIONS_PATH}")).map_err(|err| {
            Error::configuration(format!("invalid {BASE_URL_VAR} {base_url:?}: {err}"))
        })?;

        Ok(Self {
            api_key: ApiKey::new(api_key),
            base_url,
            model,
            endpoint,
        })
    }

    /// Reads settings from the process environment and `~/.soonerai.env`.
    pub fn from_env() -> Result<Self> {
        let env_file = default_env_file();
        Self::from_sources(env_file.as_deref(), |name| env::var(name).ok())
    }

    /// Reads settings from an optional env file and a variable lookup.
    ///
    /// `lookup` takes precedence over the file. A missing file is treated as
    /// empty.
    pub fn from_sources<F>(env_file: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };
        let get = |name: &str| lookup(name).or_else(|| file_vars.get(name).cloned());
        Self::new(get(API_KEY_VAR), get(BASE_URL_VAR), get(MODEL_VAR))
    }

    /// The bearer token.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// The base URL without trailing separators.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The full chat completions URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Host name of the endpoint, for display.
    pub fn host(&self) -> &str {
        self.endpoint.host_str().unwrap_or(&self.base_url)
    }
}

/// Location of the user-scoped env file, if a home directory is known.
pub fn default_env_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(ENV_FILE_NAME))
}

/// Strips trailing path separators.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => {
            return Err(Error::configuration(format!(
                "failed to read {}: {err}",
                path.display()
            )));
        }
    };
    iter.map(|item| {
        item.map_err(|err| {
            Error::configuration(format!("failed to parse {}: {err}", path.display()))
        })
    })
    .collect()
}
