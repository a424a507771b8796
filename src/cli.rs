use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    #[command(about = "List configured profiles and highlight the active profile")]
    List,
    #[command(about = "Show the active profile's resolved runtime settings")]
    Show,
}

#[derive(Debug, Subcommand)]
pub enum CapabilityCommands {
    #[command(about = "List capability endpoints configured for the active profile")]
    List,
    #[command(about = "Probe configured capability endpoints (or a specific endpoint)")]
    Check {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

const CLI_EXAMPLES: &str = "Examples:\n\
  maestro-cli ask \"What's the weather in Paris?\"\n\
  maestro-cli ask \"Write a blog about weather in London\"\n\
  maestro-cli chat\n\
  maestro-cli serve-capabilities --host 127.0.0.1 --port 8970\n\
  maestro-cli capabilities list\n\
  maestro-cli capabilities check --endpoint documents\n\
  maestro-cli profiles show\n\
  maestro-cli doctor\n\
\n\
Switching behavior:\n\
  - Use --model to override the completion model per invocation.\n\
  - In chat, use /help for command discovery and /status, /capabilities.";

#[derive(Debug, Parser)]
#[command(name = "maestro-cli")]
#[command(about = "Coordinator agent that plans requests and delegates to capability workers")]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    #[arg(long, env = "MAESTRO_PROFILE", default_value = "default")]
    pub profile: String,

    #[arg(long, env = "MAESTRO_CONFIG", default_value = ".maestro/config.toml")]
    pub config_path: String,

    #[arg(long, env = "MAESTRO_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "MAESTRO_COMPLETION_BASE_URL")]
    pub completion_base_url: Option<String>,

    #[arg(long, env = "MAESTRO_COMPLETION_API_KEY_ENV")]
    pub completion_api_key_env: Option<String>,

    #[arg(long, env = "MAESTRO_CALL_TIMEOUT_SECS")]
    pub call_timeout_secs: Option<u64>,

    #[arg(long, env = "MAESTRO_DOCUMENTS_DIR")]
    pub documents_dir: Option<String>,

    #[arg(long, env = "MAESTRO_TELEMETRY_ENABLED", action = clap::ArgAction::Set)]
    pub telemetry_enabled: Option<bool>,

    #[arg(long, env = "MAESTRO_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "error")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Run a one-shot request through the coordinator and print the response")]
    Ask {
        #[arg(required = true)]
        request: Vec<String>,
    },
    #[command(about = "Run interactive chat mode against the coordinator")]
    Chat,
    #[command(about = "Run the built-in capability stub server (document search + weather)")]
    ServeCapabilities {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8970)]
        port: u16,
    },
    #[command(about = "Inspect and probe capability endpoint configuration")]
    Capabilities {
        #[command(subcommand)]
        command: CapabilityCommands,
    },
    #[command(about = "Inspect profile configuration and active resolved profile state")]
    Profiles {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    #[command(about = "Validate completion-service environment and capability configuration")]
    Doctor,
}

pub fn command_label(command: &Commands) -> String {
    match command {
        Commands::Ask { .. } => "ask".to_string(),
        Commands::Chat => "chat".to_string(),
        Commands::ServeCapabilities { .. } => "serve-capabilities".to_string(),
        Commands::Capabilities { command } => match command {
            CapabilityCommands::List => "capabilities.list".to_string(),
            CapabilityCommands::Check { .. } => "capabilities.check".to_string(),
        },
        Commands::Profiles { command } => match command {
            ProfileCommands::List => "profiles.list".to_string(),
            ProfileCommands::Show => "profiles.show".to_string(),
        },
        Commands::Doctor => "doctor".to_string(),
    }
}
