//! Server configuration, layered from an optional TOML file and
//! `SAFEREPORT_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use safereport_api::ApiConfig;
use safereport_core::{classify::MAX_IMAGE_BYTES, lifecycle::TransitionPolicy};
use safereport_vision::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use serde::Deserialize;

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "SAFEREPORT";

/// Conventional variable consulted when no key is configured.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Runtime server configuration. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                    String,
  pub port:                    u16,
  pub store_path:              PathBuf,
  pub gemini_api_key:          Option<String>,
  pub gemini_model:            String,
  pub gemini_base_url:         String,
  pub classifier_timeout_secs: u64,
  pub max_image_bytes:         usize,
  pub session_ttl_days:        i64,
  pub allow_signup:            bool,
  pub transitions:             TransitionPolicy,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                    "127.0.0.1".to_string(),
      port:                    3000,
      store_path:              PathBuf::from("safereport.db"),
      gemini_api_key:          None,
      gemini_model:            DEFAULT_MODEL.to_string(),
      gemini_base_url:         DEFAULT_BASE_URL.to_string(),
      classifier_timeout_secs: 30,
      max_image_bytes:         MAX_IMAGE_BYTES,
      session_ttl_days:        30,
      allow_signup:            true,
      transitions:             TransitionPolicy::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) under `SAFEREPORT_*` overrides, then fall
  /// back to `GEMINI_API_KEY` for the classifier key.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.gemini_api_key =
      resolve_api_key(cfg.gemini_api_key.take(), std::env::var(GEMINI_KEY_VAR).ok());
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn gemini_config(&self) -> GeminiConfig {
    GeminiConfig {
      api_key:  self.gemini_api_key.clone(),
      model:    self.gemini_model.clone(),
      base_url: self.gemini_base_url.clone(),
      timeout:  Duration::from_secs(self.classifier_timeout_secs),
    }
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      max_image_bytes: self.max_image_bytes,
      session_ttl:     chrono::Duration::days(self.session_ttl_days),
      allow_signup:    self.allow_signup,
    }
  }
}

/// The configured key wins; blank values count as unset.
fn resolve_api_key(configured: Option<String>, env: Option<String>) -> Option<String> {
  configured
    .into_iter()
    .chain(env)
    .map(|k| k.trim().to_owned())
    .find(|k| !k.is_empty())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
