use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use std::{fs, io::Read, path::PathBuf};
use tracing::{debug, info};
use weathernow_core::{
    AskRequest, AskResponse, BackendId, Config, FallbackChain, Snapshot, api, compose,
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather and a small weather assistant")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `WEATHERNOW_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the default city, answer backends and server address.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Ask a single question about the current weather.
    Ask {
        /// City name; defaults to the configured city.
        #[arg(long)]
        city: Option<String>,

        /// The question, e.g. "what should I wear?". Empty gives a summary.
        question: Vec<String>,
    },

    /// Ask questions about a city's weather until Esc or Ctrl-C.
    Chat {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Answer an `/api/ai` request body offline with the built-in rules.
    Answer {
        /// JSON file to read; stdin when absent or "-".
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Serve the HTTP API.
    Serve {
        /// Address to bind, e.g. 127.0.0.1:3000; defaults to config.
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    /// Log verbosity to use; the server logs requests by default.
    pub fn log_verbosity(&self) -> u8 {
        match self.command {
            Command::Serve { .. } => self.verbose.max(1),
            _ => self.verbose,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let config = Config::load()?;
                let snapshot = fetch_snapshot(&config, city).await?;
                println!("{}", render::snapshot(&snapshot));
                Ok(())
            }
            Command::Ask { city, question } => {
                let config = Config::load()?;
                let chain = FallbackChain::from_config(&config)?;
                let snapshot = fetch_snapshot(&config, city).await?;

                let answered = chain.ask(&AskRequest::new(snapshot, question.join(" "))).await?;
                println!("{}", answered.answer);
                Ok(())
            }
            Command::Chat { city } => {
                let config = Config::load()?;
                let chain = FallbackChain::from_config(&config)?;
                let snapshot = fetch_snapshot(&config, city).await?;
                chat(&chain, snapshot).await
            }
            Command::Answer { input } => {
                let raw = read_input(input)?;
                let request = AskRequest::from_slice(raw.as_bytes()).context("Failed to parse request JSON")?;

                let response = AskResponse { answer: compose(&request.snapshot, &request.question) };
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            Command::Serve { bind } => {
                let config = Config::load()?;
                let state = api::AppState {
                    provider: provider_from_config(&config)?,
                    chain: FallbackChain::from_config(&config)?,
                };
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                api::serve(state, &bind).await
            }
        }
    }
}

fn resolve_city(city: Option<String>, config: &Config) -> anyhow::Result<String> {
    match city {
        Some(c) if !c.trim().is_empty() => Ok(c),
        _ => Ok(config.default_city_or_err()?.to_string()),
    }
}

async fn fetch_snapshot(config: &Config, city: Option<String>) -> anyhow::Result<Snapshot> {
    let city = resolve_city(city, config)?;
    debug!(%city, "fetching snapshot");
    let provider = provider_from_config(config)?;
    provider.snapshot(&city).await
}

fn read_input(input: Option<PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.to_str() != Some("-") => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request file: {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw).context("Failed to read request from stdin")?;
            Ok(raw)
        }
    }
}

async fn chat(chain: &FallbackChain, snapshot: Snapshot) -> anyhow::Result<()> {
    println!("{}\n", render::snapshot(&snapshot));

    loop {
        let question = match Text::new("Ask about today's weather:")
            .with_help_message(r#"e.g. "What should I wear?", "Will it rain tonight?" (Esc to quit)"#)
            .prompt()
        {
            Ok(q) => q,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        if question.trim().is_empty() {
            println!("Please enter a question.");
            continue;
        }

        match chain.ask(&AskRequest::new(snapshot.clone(), question.trim())).await {
            Ok(answered) => println!("Answer: {}\n", answered.answer),
            Err(err) => eprintln!("Error: {err:#}\n"),
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let city = Text::new("Default city:")
        .with_default(config.default_city.as_deref().unwrap_or(""))
        .with_help_message("Used when a command is run without a city. Leave empty for none.")
        .prompt()?;
    config.set_default_city(city);

    let current = config.assistant.backends.join(", ");
    let order = Text::new("Answer backends, in order:")
        .with_default(&current)
        .with_help_message("Comma-separated: rules, remote")
        .prompt()?;
    let ids = order
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(BackendId::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    if ids.is_empty() {
        return Err(anyhow!("At least one answer backend is required."));
    }
    config.set_backends(&ids);

    if ids.contains(&BackendId::Remote) {
        let url = Text::new("Remote assistant URL:")
            .with_default(config.assistant.remote_url.as_deref().unwrap_or("http://127.0.0.1:3000/api/ai"))
            .prompt()?;
        config.assistant.remote_url = Some(url.trim().to_string());
    }

    let bind = Text::new("Server bind address:").with_default(&config.server.bind).prompt()?;
    config.server.bind = bind.trim().to_string();

    let path = config.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());
    Ok(())
}
