use clap::ArgMatches;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use trmnl_core::config::validation::validate_url;
use trmnl_core::screen::fetcher::decode_data_url;
use trmnl_core::{ScreenService, ScreenState, SettingsFile, TrmnlConfig};

use crate::output::{mask_token, print_state, state_line};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if the config file is broken, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
///
/// `--api-url` is applied on top and must be a valid http(s) URL.
fn load_config(matches: &ArgMatches) -> Result<TrmnlConfig, Box<dyn std::error::Error>> {
    let mut config = match TrmnlConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.trmnl/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            TrmnlConfig::default()
        }
    };

    if let Some(url) = matches.get_one::<String>("api-url") {
        validate_url(url)?;
        config.api.url = Some(url.clone());
    }

    Ok(config)
}

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        event = "cli.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );

    let config = load_config(matches)?;
    let settings = SettingsFile::default_location();

    let result = match matches.subcommand() {
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches, &config, settings).await,
        Some(("refresh", sub_matches)) => {
            handle_refresh_command(sub_matches, &config, settings).await
        }
        Some(("set-token", sub_matches)) => {
            handle_set_token_command(sub_matches, &config, settings).await
        }
        Some(("status", sub_matches)) => handle_status_command(sub_matches, &config, settings),
        Some(("save-image", sub_matches)) => {
            handle_save_image_command(sub_matches, &config, settings).await
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    if let Err(e) = &result {
        error!(
            event = "cli.command_failed",
            error = %e
        );
    }
    result
}

fn print_result(state: &ScreenState, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        print_state(state);
    }
    Ok(())
}

async fn handle_watch_command(
    matches: &ArgMatches,
    config: &TrmnlConfig,
    settings: SettingsFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    let (service, handle) = ScreenService::connect(config, settings)?;
    if !handle.get_state().has_token() {
        println!("No access token configured. Run `trmnl set-token <TOKEN>` first.");
        return Ok(());
    }

    info!(event = "cli.watch_started", api_url = config.api.url());

    let mut updates = handle.subscribe();
    let shutdown = CancellationToken::new();
    let service_task = tokio::spawn(service.run(shutdown.clone()));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(state) if json_output => println!("{}", serde_json::to_string(&state)?),
                Ok(state) => println!("{}", state_line(&state)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(event = "cli.watch_lagged", skipped = skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => {
                info!(event = "cli.watch_interrupted");
                break;
            }
        }
    }

    shutdown.cancel();
    service_task.await?;

    info!(event = "cli.watch_completed");
    Ok(())
}

async fn handle_refresh_command(
    matches: &ArgMatches,
    config: &TrmnlConfig,
    settings: SettingsFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.refresh_started");

    let (service, _handle) = ScreenService::connect(config, settings)?;
    let state = service.refresh_once(None).await;

    info!(event = "cli.refresh_completed", status = %state.status_text);
    print_result(&state, json_output)
}

async fn handle_set_token_command(
    matches: &ArgMatches,
    config: &TrmnlConfig,
    settings: SettingsFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let token = matches
        .get_one::<String>("token")
        .ok_or("Token argument is required")?;

    info!(event = "cli.set_token_started");

    let settings_path = settings.path().to_path_buf();
    let (service, _handle) = ScreenService::connect(config, settings)?;
    let state = service.refresh_once(Some(token)).await;

    if !json_output {
        if state.access_token.is_empty() {
            println!("Access token cleared ({})", settings_path.display());
        } else {
            println!("Access token saved to {}", settings_path.display());
        }
        println!();
    }

    info!(event = "cli.set_token_completed", status = %state.status_text);
    print_result(&state, json_output)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    settings_file: String,
    access_token: String,
    refresh_rate_seconds: u64,
    api_url: String,
}

fn handle_status_command(
    matches: &ArgMatches,
    config: &TrmnlConfig,
    settings: SettingsFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let saved = settings.load();

    let status = StatusResponse {
        settings_file: settings.path().display().to_string(),
        access_token: mask_token(&saved.access_token),
        refresh_rate_seconds: saved.refresh_rate_seconds,
        api_url: config.api.url().to_string(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Settings:      {}", status.settings_file);
        println!("Token:         {}", status.access_token);
        println!("Refresh every: {}s", status.refresh_rate_seconds);
        println!("API:           {}", status.api_url);
    }

    Ok(())
}

async fn handle_save_image_command(
    matches: &ArgMatches,
    config: &TrmnlConfig,
    settings: SettingsFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("Path argument is required")?;

    let (service, _handle) = ScreenService::connect(config, settings)?;
    let state = service.refresh_once(None).await;

    let Some((content_type, bytes)) = decode_data_url(&state.image_data_url) else {
        return Err(format!("No image available: {}", state.status_text).into());
    };

    std::fs::write(path, &bytes)
        .map_err(|e| format!("Failed to write image to '{}': {}", path, e))?;

    info!(
        event = "cli.save_image_completed",
        path = %path,
        content_type = %content_type,
        bytes = bytes.len()
    );
    println!("Saved {} ({}, {} bytes)", path, content_type, bytes.len());

    Ok(())
}
