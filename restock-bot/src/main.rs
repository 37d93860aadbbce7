mod webhook;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::{redirect, ClientBuilder};
use restock_core::{spawn_watcher, RoleRegistry, WatchConfig};
use tracing_subscriber::EnvFilter;

use crate::webhook::WebhookSink;

#[derive(Parser)]
#[command(name = "restock-bot")]
#[command(about = "Watches the fruit stock page and pings Discord roles on restocks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the stock watcher until interrupted.
    Run,
    /// Bind a Discord role to a fruit name.
    SetRole { fruit: String, role_id: String },
    /// Drop the role binding for a fruit name.
    RemoveRole { fruit: String },
    /// Show all role bindings in registration order.
    ListRoles,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let dir = WatchConfig::config_dir();
    let registry = RoleRegistry::load_from(dir.join("fruit_roles.json")).await;

    match cli.command {
        Command::Run => run(registry, &dir).await?,
        Command::SetRole { fruit, role_id } => {
            registry.set(&fruit, &role_id).await?;
            println!("role {role_id} set for {fruit}");
        }
        Command::RemoveRole { fruit } => {
            if registry.remove(&fruit).await? {
                println!("removed role for {fruit}");
            } else {
                println!("no role set for {fruit}");
            }
        }
        Command::ListRoles => {
            let bindings = registry.list().await;
            if bindings.is_empty() {
                println!("no roles assigned");
            }
            for binding in bindings {
                println!("{} -> {}", binding.fruit, binding.role_id);
            }
        }
    }

    Ok(())
}

async fn run(registry: RoleRegistry, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = WatchConfig::from_file(dir.join("config.json"));
    let webhook_url = std::env::var("DISCORD_WEBHOOK_URL")
        .map_err(|_| "DISCORD_WEBHOOK_URL is not set (environment or .env)")?;

    let client = ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .user_agent("restock-bot/0.1")
        .build()?;

    let sink = Arc::new(WebhookSink::new(client.clone(), webhook_url));
    let watcher = spawn_watcher(config, client, registry, sink);

    tokio::signal::ctrl_c().await?;
    watcher.stop().await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
