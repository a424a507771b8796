use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{CapabilityEndpointConfig, RuntimeConfig, enabled_capability_endpoints};

/// Wire shape for one capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCallRequest {
    pub capability: String,
    pub arguments: HashMap<String, String>,
}

/// Responses carry either `text` or `error`; the error variant is consumed
/// solely to build a worker's "failed" result string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCallResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[async_trait]
pub trait CapabilityChannel: Send + Sync {
    fn endpoint_name(&self) -> &str;

    async fn call(&self, capability: &str, arguments: HashMap<String, String>) -> Result<String>;

    /// Connectivity check used by `Coordinator::initialize`.
    async fn probe(&self) -> Result<()>;
}

pub struct HttpCapabilityClient {
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl HttpCapabilityClient {
    pub fn new(config: &CapabilityEndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(15)))
            .build()
            .with_context(|| {
                format!(
                    "failed to build HTTP client for capability endpoint '{}'",
                    config.name
                )
            })?;

        Ok(Self {
            name: config.name.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl CapabilityChannel for HttpCapabilityClient {
    fn endpoint_name(&self) -> &str {
        &self.name
    }

    async fn call(&self, capability: &str, arguments: HashMap<String, String>) -> Result<String> {
        let url = format!("{}/call", self.endpoint);
        let request = CapabilityCallRequest {
            capability: capability.to_string(),
            arguments,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("capability call to '{url}' failed to send"))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!(
                "capability endpoint '{}' returned {status}",
                self.name
            ));
        }

        let reply = response
            .json::<CapabilityCallResponse>()
            .await
            .with_context(|| format!("capability endpoint '{}' sent an unreadable reply", self.name))?;

        if let Some(error) = reply.error {
            return Err(anyhow::anyhow!("{error}"));
        }

        reply.text.ok_or_else(|| {
            anyhow::anyhow!(
                "capability endpoint '{}' reply had neither text nor error",
                self.name
            )
        })
    }

    async fn probe(&self) -> Result<()> {
        let url = format!("{}/healthz", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach capability endpoint at '{url}'"))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "capability endpoint '{}' health check returned {}",
                self.name,
                response.status()
            ));
        }

        Ok(())
    }
}

pub fn run_capabilities_list(cfg: &RuntimeConfig) -> Result<()> {
    let endpoints = enabled_capability_endpoints(cfg);
    if endpoints.is_empty() {
        println!(
            "No enabled capability endpoints configured for profile '{}'.",
            cfg.profile
        );
        return Ok(());
    }

    println!("Enabled capability endpoints for profile '{}':", cfg.profile);
    for endpoint in endpoints {
        println!(
            "- {} endpoint={} timeout={}s",
            endpoint.name,
            endpoint.endpoint,
            endpoint.timeout_secs.unwrap_or(15)
        );
    }

    Ok(())
}

pub async fn run_capabilities_check(cfg: &RuntimeConfig, endpoint_name: Option<String>) -> Result<()> {
    let endpoints = enabled_capability_endpoints(cfg);
    let selected = match endpoint_name.as_deref() {
        Some(name) => endpoints
            .into_iter()
            .filter(|endpoint| endpoint.name == name)
            .collect::<Vec<CapabilityEndpointConfig>>(),
        None => endpoints,
    };

    if selected.is_empty() {
        println!("No enabled capability endpoints matched the check.");
        return Ok(());
    }

    let mut failures = 0usize;
    for endpoint in selected {
        let channel = HttpCapabilityClient::new(&endpoint)?;
        match channel.probe().await {
            Ok(()) => println!(
                "Capability endpoint '{}' reachable at {}.",
                endpoint.name, endpoint.endpoint
            ),
            Err(err) => {
                failures += 1;
                eprintln!(
                    "[STARTUP] capability check failed for '{}' ({}): {err:#}",
                    endpoint.name, endpoint.endpoint
                );
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "capability check completed with {} failure(s). Check endpoints and retry.",
            failures
        ));
    }

    Ok(())
}
