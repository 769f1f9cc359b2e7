// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concierge - query routing for chat requests.
//!
//! Binary entry point. Routes one query from the command line and prints the
//! decision as JSON, or inspects signals and configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use concierge_config::model::ConciergeConfig;
use concierge_router::{Attachment, DeviceType};

/// Concierge - picks the model, temperature, reasoning budget and title for a chat query.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a query and print the decision as JSON.
    Route(RouteArgs),
    /// Print the extracted signals and modifiers for a query (no LLM call).
    Signals {
        /// The user query.
        query: String,
    },
    /// Print the effective configuration as TOML (API key redacted).
    Config,
}

/// Arguments for `concierge route`.
#[derive(Args, Debug)]
struct RouteArgs {
    /// The user query. Hashtag modifiers such as `#opus` are honored.
    query: String,

    /// Attachment as `kind:mime`, e.g. `audio:audio/mp3`. Repeatable.
    #[arg(long = "attachment", value_name = "KIND:MIME")]
    attachments: Vec<Attachment>,

    /// Number of turns in the session so far.
    #[arg(long)]
    turn_count: Option<u32>,

    /// Whether this is the first message of the session.
    #[arg(long)]
    first_message: Option<bool>,

    /// Device the user is chatting from (mobile, desktop, unknown).
    #[arg(long)]
    device: Option<DeviceType>,

    /// Previous assistant reply, for follow-up detection.
    #[arg(long, value_name = "TEXT")]
    last_assistant_message: Option<String>,

    /// Number of prior exchanges in the conversation.
    #[arg(long)]
    conversation_depth: Option<u32>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Route(args) => commands::run_route(&config, args.into_request()).await,
        Commands::Signals { query } => commands::run_signals(&query),
        Commands::Config => commands::run_config(&config),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Load and validate configuration, exiting with diagnostics on failure.
fn load_config(path: Option<&std::path::Path>) -> ConciergeConfig {
    let loaded = match path {
        Some(path) => concierge_config::load_and_validate_path(path),
        None => concierge_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            concierge_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("concierge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

impl RouteArgs {
    fn into_request(self) -> concierge_router::RoutingRequest {
        use concierge_router::{RecentContext, RoutingRequest, SessionContext};

        let mut request = RoutingRequest::new(self.query);
        request.attachments = self.attachments;

        let session = SessionContext {
            turn_count: self.turn_count,
            is_first_message: self.first_message,
            device_type: self.device,
        };
        if session != SessionContext::default() {
            request = request.with_session(session);
        }

        let recent = RecentContext {
            last_assistant_message: self.last_assistant_message,
            conversation_depth: self.conversation_depth,
        };
        if !recent.is_empty() {
            request = request.with_recent(recent);
        }
        request
    }
}
