//! Deployment settings for the hosted flow.
//!
//! Values are layered with figment: built-in defaults, then `assistant.toml`
//! (or the file named by `ASSISTANT_CONFIG_PATH`), then `ASSISTANT_*`
//! environment variables and the bare `APPLICATION_TOKEN` secret.

use crate::error::{AssistantError, Result};
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub const CONFIG_FILE: &str = "assistant.toml";
pub const CONFIG_PATH_VAR: &str = "ASSISTANT_CONFIG_PATH";
pub const TOKEN_VAR: &str = "APPLICATION_TOKEN";

const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("ASSISTANT_BASE_URL", "base_url"),
    ("ASSISTANT_LANGFLOW_ID", "langflow_id"),
    ("ASSISTANT_FLOW_ID", "flow_id"),
    ("ASSISTANT_APPLICATION_TOKEN", "application_token"),
];

const DEFAULT_BASE_URL: &str = "https://api.langflow.astra.datastax.com";
const DEFAULT_LANGFLOW_ID: &str = "34d17c26-a986-4b87-a228-81e15a1ecc86";
const DEFAULT_FLOW_ID: &str = "c684fe71-125c-417b-8e6f-7d0de56d6c32";
const DEFAULT_TWEAK_COMPONENTS: [&str; 7] = [
    "ChatInput-tVn2G",
    "ParseData-ubf9h",
    "Prompt-pBJ0b",
    "OpenAIModel-VU7gI",
    "ChatOutput-YYy3t",
    "AstraDB-R8Juu",
    "OpenAIEmbeddings-486bm",
];

/// Per-component parameter overrides, keyed by flow component id.
pub type Tweaks = BTreeMap<String, Map<String, Value>>;

#[derive(Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub base_url: String,
    pub langflow_id: String,
    pub flow_id: String,
    #[serde(default)]
    pub application_token: String,
    #[serde(default)]
    pub tweaks: Tweaks,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            langflow_id: DEFAULT_LANGFLOW_ID.to_string(),
            flow_id: DEFAULT_FLOW_ID.to_string(),
            application_token: String::new(),
            tweaks: DEFAULT_TWEAK_COMPONENTS
                .iter()
                .map(|component| (component.to_string(), Map::new()))
                .collect(),
        }
    }
}

// Hand-written so the bearer token never reaches a log line.
impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("base_url", &self.base_url)
            .field("langflow_id", &self.langflow_id)
            .field("flow_id", &self.flow_id)
            .field("application_token", &"<redacted>")
            .field("tweaks", &self.tweaks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AssistantConfig {
    pub fn load() -> Result<Self> {
        let mut figment = Self::base_figment().merge(Toml::file(CONFIG_FILE));
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            figment = figment.merge(Toml::file(path));
        }
        Self::from_figment(Self::with_env(figment, |name| std::env::var(name).ok()))
    }

    /// Layers `ASSISTANT_*` overrides and the bare token secret on top of
    /// `figment`. Values are taken verbatim as strings, so a numeric flow id
    /// or token is not reinterpreted as a number.
    pub fn with_env(figment: Figment, lookup: impl Fn(&str) -> Option<String>) -> Figment {
        let overrides = ENV_OVERRIDES
            .iter()
            .map(|(var, key)| (*var, *key))
            .chain([(TOKEN_VAR, "application_token")]);

        overrides.fold(figment, |figment, (var, key)| match lookup(var) {
            Some(value) => figment.merge(Serialized::default(key, value)),
            None => figment,
        })
    }

    pub fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|err| {
            AssistantError::Configuration(format!("failed to load configuration: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `{base_url}/lf/{langflow_id}/api/v1/run/{flow_id}`
    pub fn endpoint_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/lf/{}/api/v1/run/{}",
            self.base_url.trim_end_matches('/'),
            self.langflow_id.trim(),
            self.flow_id.trim()
        );
        let url = Url::parse(&raw).map_err(|err| {
            AssistantError::Configuration(format!("invalid flow endpoint {raw}: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AssistantError::Configuration(format!(
                "flow endpoint must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("base_url", &self.base_url),
            ("langflow_id", &self.langflow_id),
            ("flow_id", &self.flow_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AssistantError::Configuration(format!("{name} must not be empty")));
            }
        }
        if self.application_token.trim().is_empty() {
            return Err(AssistantError::Configuration(format!(
                "no application token; set {TOKEN_VAR} in the environment"
            )));
        }
        self.endpoint_url().map(|_| ())
    }
}
