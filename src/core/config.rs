use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigError;

const DEFAULT_STORE_PATH: &str = "Store";
const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";
const DEFAULT_API_HOSTNAME: &str = "https://api.mistral.ai";
const DEFAULT_LLM_MODEL: &str = "mistral-small";
const DEFAULT_EMBED_MODEL: &str = "mistral-embed";
const DEFAULT_TOP_K: usize = 3;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// The options a model handle is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub api_key: String,
    pub api_hostname: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store_path: String,
    pub mistral_api_hostname: String,
    pub mistral_api_key: String,
    pub llm_model: String,
    pub embed_model: String,
    pub top_k: usize,
    pub session_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values are
    /// treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secrets_path =
            get("RACHELBOT_SECRETS_PATH").unwrap_or_else(|| DEFAULT_SECRETS_PATH.to_string());
        let mistral_api_key = match get("MISTRAL_API_KEY") {
            Some(key) => key,
            None => read_secret(&secrets_path, "mistral_key")?
                .ok_or(ConfigError::MissingCredential)?,
        };

        let store_path =
            get("RACHELBOT_STORE_PATH").unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());
        let mistral_api_hostname =
            get("RACHELBOT_API_HOST").unwrap_or_else(|| DEFAULT_API_HOSTNAME.to_string());
        let llm_model = get("RACHELBOT_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
        let embed_model =
            get("RACHELBOT_EMBED_MODEL").unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string());
        let top_k = match get("RACHELBOT_TOP_K") {
            Some(v) => parse_positive("RACHELBOT_TOP_K", &v)?,
            None => DEFAULT_TOP_K,
        };
        let session_ttl_secs = match get("RACHELBOT_SESSION_TTL_SECS") {
            Some(v) => parse_positive("RACHELBOT_SESSION_TTL_SECS", &v)?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self {
            store_path,
            mistral_api_hostname,
            mistral_api_key,
            llm_model,
            embed_model,
            top_k,
            session_ttl_secs,
        })
    }

    pub fn llm_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.llm_model.clone(),
            api_key: self.mistral_api_key.clone(),
            api_hostname: self.mistral_api_hostname.clone(),
        }
    }

    pub fn embed_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.embed_model.clone(),
            api_key: self.mistral_api_key.clone(),
            api_hostname: self.mistral_api_hostname.clone(),
        }
    }
}

/// Read a single string value from a TOML secrets file. A file that
/// doesn't exist is not an error, there is just no secret in it.
fn read_secret(path: &str, key: &str) -> Result<Option<String>, ConfigError> {
    let path = PathBuf::from(path);
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Secrets {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| {
        ConfigError::Secrets {
            path: path.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(table
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let parsed = value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            reason: format!("expected a positive integer, got {:?}", value),
        })?;
    if parsed <= T::default() {
        return Err(ConfigError::InvalidValue {
            var,
            reason: String::from("must be greater than zero"),
        });
    }
    Ok(parsed)
}
