use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

pub const DOCUMENTS_ENDPOINT: &str = "documents";
pub const WEATHER_ENDPOINT: &str = "weather";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub profile: String,
    pub config_path: String,
    pub model: String,
    pub completion_base_url: String,
    pub completion_api_key_env: String,
    pub call_timeout_secs: u64,
    pub documents_dir: String,
    pub telemetry_enabled: bool,
    pub telemetry_path: String,
    pub capability_endpoints: Vec<CapabilityEndpointConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub model: Option<String>,
    pub completion_base_url: Option<String>,
    pub completion_api_key_env: Option<String>,
    pub call_timeout_secs: Option<u64>,
    pub documents_dir: Option<String>,
    pub telemetry_enabled: Option<bool>,
    pub telemetry_path: Option<String>,
    #[serde(default)]
    pub capability_endpoints: Vec<CapabilityEndpointConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityEndpointConfig {
    pub name: String,
    pub endpoint: String,
    pub enabled: Option<bool>,
    pub timeout_secs: Option<u64>,
}

pub fn load_profiles(config_path: &str) -> Result<ProfilesFile> {
    let path = Path::new(config_path);
    if !path.exists() {
        return Ok(ProfilesFile::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile config file at '{}'", path.display()))?;
    toml::from_str::<ProfilesFile>(&content).with_context(|| {
        format!(
            "invalid profile configuration in '{}'. Check endpoint values and field names.",
            path.display()
        )
    })
}

/// Both built-in workers point at the local stub server unless a profile
/// overrides them.
pub fn default_capability_endpoints() -> Vec<CapabilityEndpointConfig> {
    vec![
        CapabilityEndpointConfig {
            name: DOCUMENTS_ENDPOINT.to_string(),
            endpoint: "http://127.0.0.1:8970".to_string(),
            enabled: None,
            timeout_secs: None,
        },
        CapabilityEndpointConfig {
            name: WEATHER_ENDPOINT.to_string(),
            endpoint: "http://127.0.0.1:8970".to_string(),
            enabled: None,
            timeout_secs: None,
        },
    ]
}

pub fn resolve_runtime_config(cli: &Cli, profiles: &ProfilesFile) -> Result<RuntimeConfig> {
    let selected = cli.profile.trim();
    if selected.is_empty() {
        return Err(anyhow::anyhow!(
            "profile name cannot be empty. Set --profile <name>."
        ));
    }

    let profile = if selected == "default" && !profiles.profiles.contains_key("default") {
        ProfileConfig::default()
    } else {
        profiles.profiles.get(selected).cloned().ok_or_else(|| {
            let mut names = profiles.profiles.keys().cloned().collect::<Vec<String>>();
            names.sort();
            if names.is_empty() {
                anyhow::anyhow!(
                    "profile '{}' not found in '{}'. No profiles are defined yet.",
                    selected,
                    cli.config_path
                )
            } else {
                anyhow::anyhow!(
                    "profile '{}' not found in '{}'. Available profiles: {}",
                    selected,
                    cli.config_path,
                    names.join(", ")
                )
            }
        })?
    };

    let capability_endpoints = if profile.capability_endpoints.is_empty() {
        default_capability_endpoints()
    } else {
        profile.capability_endpoints.clone()
    };

    Ok(RuntimeConfig {
        profile: selected.to_string(),
        config_path: cli.config_path.clone(),
        model: cli
            .model
            .clone()
            .or(profile.model)
            .unwrap_or_else(|| "gpt-4o".to_string()),
        completion_base_url: cli
            .completion_base_url
            .clone()
            .or(profile.completion_base_url)
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        completion_api_key_env: cli
            .completion_api_key_env
            .clone()
            .or(profile.completion_api_key_env)
            .unwrap_or_else(|| "OPENAI_API_KEY".to_string()),
        call_timeout_secs: cli
            .call_timeout_secs
            .or(profile.call_timeout_secs)
            .unwrap_or(45)
            .max(1),
        documents_dir: cli
            .documents_dir
            .clone()
            .or(profile.documents_dir)
            .unwrap_or_else(|| "./documents".to_string()),
        telemetry_enabled: cli
            .telemetry_enabled
            .or(profile.telemetry_enabled)
            .unwrap_or(true),
        telemetry_path: cli
            .telemetry_path
            .clone()
            .or(profile.telemetry_path)
            .unwrap_or_else(|| ".maestro/telemetry/events.jsonl".to_string()),
        capability_endpoints,
    })
}

pub fn enabled_capability_endpoints(cfg: &RuntimeConfig) -> Vec<CapabilityEndpointConfig> {
    cfg.capability_endpoints
        .iter()
        .filter(|endpoint| endpoint.enabled.unwrap_or(true))
        .cloned()
        .collect()
}

pub fn select_capability_endpoint(
    cfg: &RuntimeConfig,
    name: &str,
) -> Result<CapabilityEndpointConfig> {
    enabled_capability_endpoints(cfg)
        .into_iter()
        .find(|endpoint| endpoint.name == name)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "capability endpoint '{}' not found or not enabled in profile '{}'",
                name,
                cfg.profile
            )
        })
}

pub fn env_present(key: &str) -> bool {
    std::env::var(key)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}
