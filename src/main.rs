// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! pmteam: command-line front end for the Pokémon team builder API.
//!
//! The session is persisted to `SESSION_FILE` so consecutive invocations
//! stay logged in.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pmteam_client::{
    config::Config,
    models::{PageRequest, PublicTeamFilters, UserTeamFilters},
    storage::FileStore,
    time_utils::{format_utc_rfc3339, SystemClock},
    AppState,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pmteam", version, about = "Pokémon team builder client")]
struct Cli {
    /// Override the API base URL
    #[arg(long, env = "API_BASE_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PMTEAM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the current session
    Status,
    /// Fetch the profile and sync it into the session
    Profile,
    /// Check where a front-end path would land
    Navigate { path: String },
    /// List your teams
    Teams {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        #[arg(long)]
        generation: Option<String>,
        #[arg(long)]
        public: Option<bool>,
    },
    /// Browse public teams
    Square {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        generation: Option<String>,
        #[arg(long)]
        format: Option<String>,
    },
    /// List notifications
    Notifications {
        #[arg(long)]
        unread: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Serialize)]
struct Status {
    authenticated: bool,
    is_admin: bool,
    username: Option<String>,
    email: Option<String>,
    expires_at: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = Config::with_base_url(url)
            .context("Invalid --api-url")?
            .api_base_url;
    }
    tracing::debug!(api = %config.api_base_url, session_file = %config.session_file.display(), "Starting");

    let storage = Arc::new(
        FileStore::open(&config.session_file).context("Failed to open session file")?,
    );
    let app = AppState::new(config, storage, Arc::new(SystemClock))?;

    match cli.command {
        Command::Login { email, password } => {
            let session = app.auth.login(&email, &password).await?;
            let username = session.current_user.and_then(|u| u.username);
            println!("Logged in as {}", username.as_deref().unwrap_or(&email));
        }
        Command::Logout => {
            app.auth.logout();
            println!("Logged out");
        }
        Command::Status => {
            let user = app.session.current_user().unwrap_or_default();
            print_json(&Status {
                authenticated: app.session.is_authenticated(),
                is_admin: app.session.is_admin(),
                username: user.username,
                email: user.email,
                expires_at: app.session.token_expiry().map(format_utc_rfc3339),
            })?;
        }
        Command::Profile => {
            print_json(&app.auth.fetch_profile().await?)?;
        }
        Command::Navigate { path } => {
            let navigation = app.navigator.navigate(&path)?;
            match (navigation.redirected_from, navigation.notice) {
                (Some(from), Some(notice)) => println!(
                    "{} -> {} ({}): {}",
                    from, navigation.destination.name, navigation.destination.path, notice
                ),
                (Some(from), None) => println!(
                    "{} -> {} ({})",
                    from, navigation.destination.name, navigation.destination.path
                ),
                (None, _) => println!(
                    "{} ({})",
                    navigation.destination.name, navigation.destination.path
                ),
            }
        }
        Command::Teams {
            page,
            per_page,
            generation,
            public,
        } => {
            let filters = UserTeamFilters {
                generation,
                is_public: public,
                ..Default::default()
            };
            print_json(&app.teams.user_teams(PageRequest::new(page, per_page), &filters).await?)?;
        }
        Command::Square {
            page,
            search,
            generation,
            format,
        } => {
            let filters = PublicTeamFilters {
                search,
                generation,
                format,
            };
            print_json(
                &app.teams
                    .public_teams(PageRequest::new(page, 10), &filters)
                    .await?,
            )?;
        }
        Command::Notifications { unread, page } => {
            let is_read = unread.then_some(false);
            print_json(
                &app.notifications
                    .list(PageRequest::new(page, 10), is_read)
                    .await?,
            )?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("pmteam_client=debug".parse().expect("valid directive"))
        .add_directive("info".parse().expect("valid directive"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
