use std::net::SocketAddr;
use std::time::Duration;

use chrono::FixedOffset;

use crate::errors::ConfigError;
use crate::services::llm_service::LlmConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 5;

/// Process-lifetime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub llm: LlmConfig,
    pub assistant_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let mut llm = LlmConfig::new(api_key);
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            llm.model = model.trim().to_string();
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            let base_url = base_url.trim().trim_end_matches('/').to_string();
            url::Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
                name: "OPENAI_BASE_URL",
                reason: e.to_string(),
            })?;
            llm.base_url = base_url;
        }
        if let Some(secs) = lookup("LLM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "LLM_TIMEOUT_SECS",
                reason: format!("expected whole seconds, got '{}'", secs),
            })?;
            llm.timeout = Duration::from_secs(secs);
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let assistant_utc_offset_hours = match lookup("ASSISTANT_UTC_OFFSET_HOURS") {
            Some(raw) => {
                let hours: i32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "ASSISTANT_UTC_OFFSET_HOURS",
                    reason: format!("expected an integer, got '{}'", raw),
                })?;
                if !(-12..=14).contains(&hours) {
                    return Err(ConfigError::Invalid {
                        name: "ASSISTANT_UTC_OFFSET_HOURS",
                        reason: format!("{} is outside -12..=14", hours),
                    });
                }
                hours
            }
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let assistant_offset = FixedOffset::east_opt(assistant_utc_offset_hours * 3600).ok_or(
            ConfigError::Invalid {
                name: "ASSISTANT_UTC_OFFSET_HOURS",
                reason: format!("{} is not a valid offset", assistant_utc_offset_hours),
            },
        )?;

        Ok(Self {
            bind_addr,
            llm,
            assistant_offset,
        })
    }
}
