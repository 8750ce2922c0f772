mod cli;
mod commands;
mod credentials;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dapi::Dapi;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ManifestCommand};
use settings::{Settings, default_settings_path};

/// Build a client and load the stored profile when there is one
fn connect(
    api_key: Option<&str>,
    base_url: Option<&str>,
    settings: &Settings,
    profile_path: Option<&Path>,
) -> Result<Dapi> {
    let api_key = credentials::resolve_api_key(api_key)?;
    let mut api = Dapi::new(settings.client_config(&api_key, base_url));
    if let Some(path) = profile_path {
        if let Some(profile) = api.load_profile(path, false)? {
            debug!("Using profile for membership {}", profile.membership_id);
        }
    }
    Ok(api)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dapi=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        api_key,
        profile,
        config,
        base_url,
        command,
    } = Cli::parse();

    let settings = config
        .or_else(default_settings_path)
        .map(|path| Settings::load(&path))
        .unwrap_or_default();
    let profile_path: Option<PathBuf> = settings.profile_path(profile.as_deref());
    let client = || {
        connect(
            api_key.as_deref(),
            base_url.as_deref(),
            &settings,
            profile_path.as_deref(),
        )
    };

    match command {
        Command::Search { username } => commands::search::run(&client()?, &username),
        Command::SetUser { username, force } => {
            let path = profile_path
                .as_deref()
                .context("Failed to determine profile path; pass --profile")?;
            commands::profile::set_user(&mut client()?, &username, path, force)
        }
        Command::Whoami => {
            let path = profile_path
                .as_deref()
                .context("Failed to determine profile path; pass --profile")?;
            commands::profile::whoami(path)
        }
        Command::Account { membership_id } => {
            commands::account::run(&client()?, membership_id.as_deref())
        }
        Command::Characters { membership_id } => {
            commands::character::list(&client()?, membership_id.as_deref())
        }
        Command::Character {
            id,
            class,
            membership_id,
        } => commands::character::show(
            &client()?,
            id.as_deref(),
            class,
            membership_id.as_deref(),
        ),
        Command::Inventory {
            character_id,
            membership_id,
            manifest,
        } => commands::inventory::run(
            &client()?,
            character_id.as_deref(),
            membership_id.as_deref(),
            manifest.as_deref(),
        ),
        Command::Manifest(ManifestCommand::Fetch { language, output }) => {
            let language = language.unwrap_or_else(|| settings.language.clone());
            commands::manifest::fetch(&client()?, &language, &output)
        }
        Command::Manifest(ManifestCommand::Tables { db }) => commands::manifest::tables(&db),
        Command::Manifest(ManifestCommand::Show { db, table, hash }) => {
            commands::manifest::show(&db, &table, hash)
        }
    }
}
