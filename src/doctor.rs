use anyhow::Result;

use crate::capability::{CapabilityChannel, HttpCapabilityClient};
use crate::config::{RuntimeConfig, enabled_capability_endpoints, env_present};

pub async fn run_doctor(cfg: &RuntimeConfig) -> Result<()> {
    println!(
        "Active profile: '{}' (config: {})",
        cfg.profile, cfg.config_path
    );

    println!("Completion service:");
    println!("- base_url: {}", cfg.completion_base_url);
    println!("- model: {}", cfg.model);
    let key_status = if env_present(&cfg.completion_api_key_env) {
        "set"
    } else {
        "missing"
    };
    println!("- api key env {}: {}", cfg.completion_api_key_env, key_status);
    if key_status == "missing" {
        println!(
            "Tip: export {} before running ask/chat; the coordinator refuses to start without it.",
            cfg.completion_api_key_env
        );
    }

    println!("Call timeout (secs): {}", cfg.call_timeout_secs);
    println!("Documents dir: {}", cfg.documents_dir);
    println!(
        "Telemetry: enabled={} path={}",
        cfg.telemetry_enabled, cfg.telemetry_path
    );

    let endpoints = enabled_capability_endpoints(cfg);
    println!(
        "Capability endpoints: configured={}, enabled={}",
        cfg.capability_endpoints.len(),
        endpoints.len()
    );
    for endpoint in endpoints {
        let channel = HttpCapabilityClient::new(&endpoint)?;
        match channel.probe().await {
            Ok(()) => println!("- {}: reachable ({})", endpoint.name, endpoint.endpoint),
            Err(err) => println!(
                "- {}: unreachable ({}) - {err:#}",
                endpoint.name, endpoint.endpoint
            ),
        }
    }

    Ok(())
}
