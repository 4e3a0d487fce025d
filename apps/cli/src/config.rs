//! Layered CLI configuration
//!
//! Later layers win: built-in defaults, then `rye.toml` (or `--config`),
//! then `RYE_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::Uncased;
use rye_client::{ClientConfig, HttpCheckoutClient};
use rye_credential::{ACCESS_TOKEN_ENV, ApiCredential, DEFAULT_API_URL, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cli::GlobalArgs;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "rye.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api_url: String,
    #[serde(skip_serializing, deserialize_with = "scalar_secret")]
    pub access_token: Option<SecretString>,
    pub timeout_seconds: u64,
    pub continue_on_fail: bool,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            access_token: None,
            timeout_seconds: ClientConfig::default().timeout.as_secs(),
            continue_on_fail: false,
            log_level: None,
            log_format: None,
        }
    }
}

impl CliConfig {
    /// Resolve the configuration for this process.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        Self::layered(global, env_layer(Env::var(ACCESS_TOKEN_ENV)))
    }

    fn layered(global: &GlobalArgs, env: impl figment::Provider) -> Result<Self> {
        let path = config_path(global)?;
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&path))
            .merge(env)
            .merge(Serialized::defaults(global))
            .extract()
            .with_context(|| format!("invalid configuration (file {})", path.display()))
    }

    /// Logger settings: `RYE_LOG` / `RUST_LOG` / `RYE_LOG_FORMAT` first,
    /// overridden by the config file and flags.
    pub fn log_config(&self) -> Result<rye_log::Config> {
        let mut config = rye_log::Config::from_env();
        if let Some(level) = &self.log_level {
            config.level.clone_from(level);
        }
        if let Some(format) = &self.log_format {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    /// HTTP client for the configured credential.
    pub fn client(&self) -> Result<HttpCheckoutClient> {
        let Some(token) = self.access_token.clone() else {
            bail!("missing access token: set {ACCESS_TOKEN_ENV} or `access_token` in {CONFIG_FILE}");
        };
        let credential = ApiCredential::new(&self.api_url, token)?;
        let config = ClientConfig {
            timeout: Duration::from_secs(self.timeout_seconds),
            ..ClientConfig::default()
        };
        Ok(HttpCheckoutClient::with_config(credential, config)?)
    }
}

/// `RYE_*` variables. `RYE_LOG` is the log filter; everything else maps by
/// name. The access token is taken verbatim, since parsed env values would
/// turn a token like `007` into the number 7.
fn env_layer(raw_token: Option<String>) -> Figment {
    let env = Env::prefixed("RYE_")
        .map(|key| {
            if key.as_str().eq_ignore_ascii_case("log") {
                Uncased::from("log_level")
            } else {
                Uncased::from(key.as_str().to_ascii_lowercase())
            }
        })
        .ignore(&["access_token"]);
    let layer = Figment::from(env);
    match raw_token {
        Some(token) => layer.merge(Serialized::default("access_token", token)),
        None => layer,
    }
}

/// Accept any scalar as a token: a TOML or env value of `1234` or `true`
/// is still a token, not a type error.
fn scalar_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    let token = Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    });
    Ok(token.map(SecretString::from))
}

fn config_path(global: &GlobalArgs) -> Result<PathBuf> {
    match &global.config {
        Some(path) if !path.is_file() => bail!("config file {} not found", path.display()),
        Some(path) => Ok(path.clone()),
        None => Ok(Path::new(CONFIG_FILE).to_path_buf()),
    }
}
