use crate::domain::model::GroupBy;
use crate::utils::error::{FnOrderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub const DEFAULT_SUMMARY_FILE: &str = "summary_by_inn.txt";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub local: LocalConfig,
    pub telegram: Option<TelegramConfig>,
    pub bitrix: Option<BitrixConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Root directory scanned for device export files.
    pub path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

/// What to do when a matched file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub tg_token: String,
    #[serde(deserialize_with = "string_or_int")]
    pub tg_roman: String,
    #[serde(deserialize_with = "string_or_int")]
    pub tg_id: String,
    #[serde(default = "default_telegram_api")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitrixConfig {
    pub url_start: String,
    pub url_finish: String,
    pub webhook: String,
    pub user_id: i64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_summary_file() -> String {
    DEFAULT_SUMMARY_FILE.to_string()
}

fn default_telegram_api() -> String {
    DEFAULT_TELEGRAM_API.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_true() -> bool {
    true
}

/// Chat ids are numbers, but some people quote them.
fn string_or_int<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
    })
}

impl TelegramConfig {
    pub fn recipients(&self) -> Vec<String> {
        vec![self.tg_roman.clone(), self.tg_id.clone()]
    }
}

impl BitrixConfig {
    /// `<url_start>/<webhook>/<url_finish>`
    pub fn webhook_url(&self) -> String {
        format!("{}/{}/{}", self.url_start, self.webhook, self.url_finish)
    }
}

impl AppConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FnOrderError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FnOrderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown names are left as is.
    fn substitute_env_vars(content: &str) -> String {
        lazy_static::lazy_static! {
            static ref ENV_VAR: regex::Regex = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
        }

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("local.path", &self.local.path)?;
        validate_path("local.output_path", &self.local.output_path)?;
        validate_non_empty_string("local.summary_file", &self.local.summary_file)?;

        if let Some(telegram) = &self.telegram {
            validate_non_empty_string("telegram.tg_token", &telegram.tg_token)?;
            validate_non_empty_string("telegram.tg_roman", &telegram.tg_roman)?;
            validate_non_empty_string("telegram.tg_id", &telegram.tg_id)?;
            validate_url("telegram.api_base", &telegram.api_base)?;
            validate_range("telegram.timeout_seconds", telegram.timeout_seconds, 1, 300)?;
        }

        if let Some(bitrix) = &self.bitrix {
            validate_url("bitrix.url_start", &bitrix.url_start)?;
            validate_non_empty_string("bitrix.url_finish", &bitrix.url_finish)?;
            validate_non_empty_string("bitrix.webhook", &bitrix.webhook)?;
            validate_range("bitrix.user_id", bitrix.user_id, 1, i64::MAX)?;
            validate_range("bitrix.timeout_seconds", bitrix.timeout_seconds, 1, 300)?;
        }

        Ok(())
    }

    pub fn root_path(&self) -> &str {
        &self.local.path
    }

    pub fn output_path(&self) -> &str {
        &self.local.output_path
    }

    /// Telegram section if present and enabled.
    pub fn active_telegram(&self) -> Option<&TelegramConfig> {
        self.telegram.as_ref().filter(|t| t.enabled)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
