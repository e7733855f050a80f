//! Environment-provided settings.
//!
//! Secrets and deployment addresses come from the environment rather than
//! the YAML directory.

use std::env;
use std::path::PathBuf;

use crate::error::{ServiceError, ServiceResult};

/// Generative-AI endpoint settings.
#[derive(Clone, Debug)]
pub struct GeminiSettings {
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Base URL of the API.
    pub base_url: String,
}

/// Messaging platform settings.
#[derive(Clone, Debug)]
pub struct MessengerSettings {
    /// Page access token passed on every send.
    pub page_access_token: String,
    /// Base URL of the Graph API.
    pub graph_base_url: String,
}

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Listen address.
    pub bind_addr: String,
    /// Directory holding the YAML configuration.
    pub config_dir: PathBuf,
    /// JSON file the in-memory document store is seeded from.
    pub knowledge_seed: PathBuf,
    /// Webhook verification secret.
    pub verify_token: String,
    /// Bearer token for admin endpoints.
    pub admin_token: String,
    /// Generative-AI settings.
    pub gemini: GeminiSettings,
    /// Messaging settings.
    pub messenger: MessengerSettings,
}

impl AppSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> ServiceResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> ServiceResult<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ServiceError::MissingEnvironment {
                    name: name.to_string(),
                })
        };
        let optional = |name: &str, default: &str| -> String {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR", "0.0.0.0:8080"),
            config_dir: PathBuf::from(optional("CONFIG_DIR", "./config")),
            knowledge_seed: PathBuf::from(optional("KNOWLEDGE_SEED", "./data/knowledge.json")),
            verify_token: required("VERIFY_TOKEN")?,
            admin_token: required("ADMIN_API_TOKEN")?,
            gemini: GeminiSettings {
                api_key: required("GEMINI_API_KEY")?,
                model: optional("GEMINI_MODEL", "gemini-1.5-flash"),
                base_url: optional(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
            },
            messenger: MessengerSettings {
                page_access_token: required("PAGE_ACCESS_TOKEN")?,
                graph_base_url: optional("GRAPH_API_BASE_URL", "https://graph.facebook.com/v19.0"),
            },
        })
    }
}
