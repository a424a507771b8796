use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use maestro_cli::agents::coordinator::Coordinator;
use maestro_cli::capability::{run_capabilities_check, run_capabilities_list};
use maestro_cli::chat::run_chat;
use maestro_cli::cli::{CapabilityCommands, Cli, Commands, ProfileCommands, command_label};
use maestro_cli::config::{RuntimeConfig, load_profiles, resolve_runtime_config};
use maestro_cli::doctor::run_doctor;
use maestro_cli::error::format_cli_error;
use maestro_cli::profiles::{run_profiles_list, run_profiles_show};
use maestro_cli::server::run_capability_server;
use maestro_cli::telemetry::TelemetrySink;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_filter).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{}", format_cli_error(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let profiles = load_profiles(&cli.config_path)?;
    let cfg = resolve_runtime_config(&cli, &profiles)?;
    let telemetry = TelemetrySink::new(&cfg, command_label(&cli.command));

    match cli.command {
        Commands::Ask { request } => {
            let request = request.join(" ");
            let answer = run_ask(&cfg, telemetry, &request).await?;
            println!("{answer}");
            Ok(())
        }
        Commands::Chat => {
            let mut coordinator = Coordinator::from_config(&cfg, telemetry)?;
            coordinator.initialize().await?;
            run_chat(&cfg, &mut coordinator).await
        }
        Commands::ServeCapabilities { host, port } => {
            run_capability_server(&cfg, &host, port).await
        }
        Commands::Capabilities { command } => match command {
            CapabilityCommands::List => run_capabilities_list(&cfg),
            CapabilityCommands::Check { endpoint } => run_capabilities_check(&cfg, endpoint).await,
        },
        Commands::Profiles { command } => match command {
            ProfileCommands::List => run_profiles_list(&profiles, &cfg),
            ProfileCommands::Show => run_profiles_show(&cfg),
        },
        Commands::Doctor => run_doctor(&cfg).await,
    }
}

async fn run_ask(cfg: &RuntimeConfig, telemetry: TelemetrySink, request: &str) -> Result<String> {
    let mut coordinator = Coordinator::from_config(cfg, telemetry)?;
    coordinator.initialize().await?;
    let answer = coordinator.process_request(request).await;
    coordinator.close();
    answer
}
