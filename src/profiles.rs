use anyhow::Result;

use crate::config::{ProfilesFile, RuntimeConfig};

pub fn run_profiles_list(profiles: &ProfilesFile, cfg: &RuntimeConfig) -> Result<()> {
    let mut names = profiles.profiles.keys().cloned().collect::<Vec<String>>();
    if !names.iter().any(|name| name == "default") {
        names.push("default".to_string());
    }
    names.sort();

    println!("Configured profiles (active='{}'):", cfg.profile);
    for name in names {
        let marker = if name == cfg.profile { "*" } else { " " };
        let source = if profiles.profiles.contains_key(&name) {
            "configured"
        } else {
            "implicit"
        };
        println!("{marker} {name} ({source})");
    }

    Ok(())
}

pub fn run_profiles_show(cfg: &RuntimeConfig) -> Result<()> {
    println!("Active profile: {}", cfg.profile);
    println!("Config path: {}", cfg.config_path);
    println!("Model: {}", cfg.model);
    println!("Completion base URL: {}", cfg.completion_base_url);
    println!("Completion api key env: {}", cfg.completion_api_key_env);
    println!("Call timeout (secs): {}", cfg.call_timeout_secs);
    println!("Documents dir: {}", cfg.documents_dir);
    println!("Telemetry enabled: {}", cfg.telemetry_enabled);
    println!("Telemetry path: {}", cfg.telemetry_path);
    println!("Capability endpoints: {}", cfg.capability_endpoints.len());
    for endpoint in &cfg.capability_endpoints {
        println!(
            "- {} endpoint={} enabled={} timeout={}s",
            endpoint.name,
            endpoint.endpoint,
            endpoint.enabled.unwrap_or(true),
            endpoint.timeout_secs.unwrap_or(15)
        );
    }
    Ok(())
}
