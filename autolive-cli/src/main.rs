use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use autolive_common::models::config::is_secret;
use autolive_common::traits::ConfigStore;
use autolive_core::repositories::{FileConfigStore, InMemoryConfigStore};
use autolive_core::{bootstrap_config, AutoLiveConfig, DefaultHttpClient, LiveAnnouncer};

#[derive(Parser, Debug, Clone)]
#[command(name = "autolive")]
#[command(author, version, about = "AutoLive - set your Bluesky status to live on Twitch")]
struct Args {
    /// Settings file (defaults to <config dir>/autolive/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep settings in memory only; nothing is read from or written to disk
    #[arg(long, global = true, default_value = "false")]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Seed missing settings with placeholder values
    Init,

    /// Publish the live status once
    GoLive {
        /// Twitch login to link to, instead of the stored/Helix broadcaster
        #[arg(long)]
        broadcaster: Option<String>,

        /// Status duration in minutes for this run
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Inspect or edit stored settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    List,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("autolive=info,autolive_core=info"));
    fmt().with_env_filter(filter).init();
}

async fn open_store(args: &Args) -> anyhow::Result<Box<dyn ConfigStore>> {
    if args.memory {
        return Ok(Box::new(InMemoryConfigStore::new()));
    }
    let path = match &args.config {
        Some(p) => p.clone(),
        None => FileConfigStore::default_path()
            .ok_or_else(|| anyhow!("no config directory on this platform; pass --config"))?,
    };
    let store = FileConfigStore::open(&path)
        .await
        .with_context(|| format!("opening settings at {}", path.display()))?;
    Ok(Box::new(store))
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let store = open_store(&args).await?;

    match args.command {
        Command::Init => {
            let seeded = bootstrap_config(store.as_ref()).await?;
            if seeded.is_empty() {
                println!("All settings already present.");
            } else {
                for key in seeded {
                    println!("seeded {key}");
                }
            }
            Ok(true)
        }
        Command::GoLive {
            broadcaster,
            duration,
        } => {
            bootstrap_config(store.as_ref()).await?;
            let mut config = AutoLiveConfig::load(store.as_ref()).await?;
            if let Some(login) = broadcaster {
                config = config.with_broadcaster(login);
            }
            if let Some(minutes) = duration {
                config = config.with_duration(minutes);
            }

            let http = Arc::new(DefaultHttpClient::new()?);
            let announcer = LiveAnnouncer::from_config(config, http);
            Ok(announcer.execute().await)
        }
        Command::Config(cmd) => {
            match cmd {
                ConfigCommand::Get { key } => match store.get_value(&key).await? {
                    Some(value) => println!("{value}"),
                    None => return Err(anyhow!("'{key}' is not set")),
                },
                ConfigCommand::Set { key, value } => {
                    store.set_value(&key, &value).await?;
                    info!("Updated '{}'.", key);
                }
                ConfigCommand::Unset { key } => {
                    store.delete_value(&key).await?;
                    info!("Removed '{}'.", key);
                }
                ConfigCommand::List => {
                    for (key, value) in store.list_all().await? {
                        if is_secret(&key) {
                            println!("{key} = ********");
                        } else {
                            println!("{key} = {value}");
                        }
                    }
                }
            }
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn go_live_accepts_overrides() {
        let args = Args::parse_from([
            "autolive", "--memory", "go-live", "--broadcaster", "alice", "--duration", "90",
        ]);
        assert!(args.memory);
        match args.command {
            Command::GoLive { broadcaster, duration } => {
                assert_eq!(broadcaster.as_deref(), Some("alice"));
                assert_eq!(duration, Some(90));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn init_in_memory_succeeds() {
        let args = Args::parse_from(["autolive", "--memory", "init"]);
        assert!(run(args).await.unwrap());
    }

    #[tokio::test]
    async fn go_live_without_settings_fails_fast() {
        let args = Args::parse_from(["autolive", "--memory", "go-live"]);
        assert!(!run(args).await.unwrap());
    }
}
