//! Application configuration: `config.toml` layered with `SHOWTIMES_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use showtimes_core::movie::FormatTag;
use showtimes_sources::BuiltinOptions;

/// Deserialised application settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:         PathBuf,
  /// Days requested from date-paginated sources.
  pub window_days:        u32,
  /// Days covered by event-feed requests.
  pub feed_window_days:   u32,
  pub fetch_timeout_secs: u64,
  pub user_agent:         String,
  /// Format recorded when a listing names none, e.g. `"Digital"`.
  pub default_format:     Option<FormatTag>,
}

impl Default for AppConfig {
  fn default() -> Self {
    let builtin = BuiltinOptions::default();
    Self {
      store_path:         PathBuf::from("showtimes.db"),
      window_days:        builtin.window_days,
      feed_window_days:   builtin.feed_window_days,
      fetch_timeout_secs: 30,
      user_agent:         format!("showtimes/{}", env!("CARGO_PKG_VERSION")),
      default_format:     None,
    }
  }
}

impl AppConfig {
  /// Load from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SHOWTIMES").try_parsing(true))
      .build()
      .context("failed to read config file")?;
    Self::from_settings(settings)
  }

  fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn builtin_options(&self) -> BuiltinOptions {
    BuiltinOptions {
      window_days:      self.window_days,
      feed_window_days: self.feed_window_days,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
