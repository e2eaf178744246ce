#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use chaos_client::{AdminClient, ClientConfig, SyncClient, TrafficFeedPoller};
use chaos_types::models::{
    preview, ConnectionState, EditState, MockRulePatch, StatusRulePatch,
};
use chaos_types::models::evaluate::{select_status_rule, tamper_annotation};
use chaos_types::{ConfigError, EditorState};

use crate::cli::{
    Cli, Commands, HeaderCommands, MockCommands, PresetCommands, StatusRuleCommands,
};
use crate::render;

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env().with_origin(cli.admin_url.as_str());
    if let Commands::Watch { interval_ms: Some(ms), .. } = cli.command {
        config.poll_interval_ms = ms;
    }

    let admin = AdminClient::new(config).context("Invalid client settings")?;
    let sync = SyncClient::new(admin.clone());

    match cli.command {
        Commands::Show { json } => show(&sync, json).await,
        Commands::Status => status(&sync).await,
        Commands::Set { key, value } => {
            mutate(&sync, |editor| {
                editor.set_field(&key, &value)?;
                Ok(format!("{} = {}", key, value))
            })
            .await
        },
        Commands::Preset(PresetCommands::Apply { id }) => {
            mutate(&sync, |editor| {
                editor.apply_preset(&id)?;
                Ok(format!("Preset {} applied", editor.preset()))
            })
            .await
        },
        Commands::Preset(PresetCommands::List) => preset_list(&sync).await,
        Commands::Headers(HeaderCommands::Reset) => {
            mutate(&sync, |editor| {
                editor.reset_headers();
                Ok("Header tampering off".to_string())
            })
            .await
        },
        Commands::StatusRule(cmd) => status_rule(&sync, cmd).await,
        Commands::Mock(cmd) => mock_rule(&sync, cmd).await,
        Commands::Apply { file } => apply_file(&sync, &file).await,
        Commands::Explain { path, json, roll } => explain(&sync, &path, json, roll).await,
        Commands::Watch { limit, .. } => watch(admin, limit).await,
    }
}

/// Pull, and fail with the status indicator text unless the engine answered.
async fn pull_ready(sync: &SyncClient) -> Result<()> {
    match sync.pull().await {
        ConnectionState::Ready => Ok(()),
        _ => anyhow::bail!("{}", sync.status_text().await),
    }
}

/// Pull, apply one edit, push the complete configuration.
async fn mutate<F>(sync: &SyncClient, edit: F) -> Result<()>
where
    F: FnOnce(&mut EditorState) -> Result<String>,
{
    pull_ready(sync).await?;

    let message = {
        let mut editor = sync.editor().await;
        let message = edit(&mut editor)?;
        if !editor.is_dirty() {
            println!("{} {} (no change)", "✓".green(), message);
            return Ok(());
        }
        message
    };

    match sync.push().await {
        EditState::Saved { .. } => {
            println!("{} {}", "✓".green(), message);
            Ok(())
        },
        _ => anyhow::bail!("Push failed: {}", sync.status_text().await),
    }
}

async fn show(sync: &SyncClient, json: bool) -> Result<()> {
    pull_ready(sync).await?;
    let editor = sync.editor().await;
    let config = editor.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{} {}", "Status:".cyan().bold(), editor.status_text(std::time::Instant::now()));
    println!("{}", render::config_summary(&config, editor.preset()));
    println!("\n{}", "Status rules:".cyan().bold());
    if config.status_rules.is_empty() {
        println!("  {}", "none".dimmed());
    } else {
        println!("{}", render::status_rules_table(&config.status_rules));
    }
    println!("\n{}", "Mock rules:".cyan().bold());
    if config.mock_rules.is_empty() {
        println!("  {}", "none".dimmed());
    } else {
        println!("{}", render::mock_rules_table(&config.mock_rules));
    }
    Ok(())
}

async fn status(sync: &SyncClient) -> Result<()> {
    let connection = sync.pull().await;
    let text = sync.status_text().await;
    match connection {
        ConnectionState::Ready => println!("{} {}", "●".green(), text),
        ConnectionState::Connecting => println!("{} {}", "●".yellow(), text),
        ConnectionState::ServerError { status } => {
            println!("{} {} ({})", "●".red(), text, status);
        },
        ConnectionState::Offline => println!("{} {}", "●".red(), text),
    }
    println!("  Admin API: {}", sync.admin().config().origin());
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// The table works without an engine; the current preset is marked when one answers.
async fn preset_list(sync: &SyncClient) -> Result<()> {
    let current = match sync.pull().await {
        ConnectionState::Ready => Some(sync.editor().await.preset()),
        _ => None,
    };
    println!("{}", render::presets_table(current));
    if current.is_none() {
        println!("{}", sync.status_text().await.dimmed());
    }
    Ok(())
}

async fn status_rule(sync: &SyncClient, cmd: StatusRuleCommands) -> Result<()> {
    match cmd {
        StatusRuleCommands::Add { path, code, rate } => {
            mutate(sync, |editor| {
                let id = editor.add_status_rule();
                if let Some(path) = path {
                    editor.update_status_rule(&id, StatusRulePatch::PathPattern(path));
                }
                if let Some(code) = code {
                    editor.update_status_rule(&id, StatusRulePatch::StatusCode(code));
                }
                if let Some(rate) = rate {
                    editor.update_status_rule(&id, StatusRulePatch::error_rate(rate));
                }
                Ok(format!("Status rule {} added", id))
            })
            .await
        },
        StatusRuleCommands::Update { id, field, value } => {
            mutate(sync, |editor| {
                let patch = StatusRulePatch::parse(&field, &value)?;
                if !editor.update_status_rule(&id, patch) {
                    anyhow::bail!("No status rule with id {}", id);
                }
                Ok(format!("Status rule {} updated", id))
            })
            .await
        },
        StatusRuleCommands::Remove { id } => {
            mutate(sync, |editor| {
                editor.remove_status_rule(&id);
                Ok(format!("Status rule {} removed", id))
            })
            .await
        },
    }
}

async fn mock_rule(sync: &SyncClient, cmd: MockCommands) -> Result<()> {
    match cmd {
        MockCommands::Add { path, body, inactive } => {
            mutate(sync, |editor| {
                let id = editor.add_mock_rule();
                if let Some(path) = path {
                    editor.update_mock_rule(&id, MockRulePatch::PathPattern(path));
                }
                if let Some(body) = body {
                    editor.update_mock_rule(&id, MockRulePatch::Body(body));
                }
                if inactive {
                    editor.update_mock_rule(&id, MockRulePatch::Active(false));
                }
                Ok(format!("Mock rule {} added", id))
            })
            .await
        },
        MockCommands::Update { id, field, value } => {
            mutate(sync, |editor| {
                let patch = MockRulePatch::parse(&field, &value)?;
                if !editor.update_mock_rule(&id, patch) {
                    anyhow::bail!("No mock rule with id {}", id);
                }
                Ok(format!("Mock rule {} updated", id))
            })
            .await
        },
        MockCommands::Remove { id } => {
            mutate(sync, |editor| {
                editor.remove_mock_rule(&id);
                Ok(format!("Mock rule {} removed", id))
            })
            .await
        },
    }
}

async fn apply_file(sync: &SyncClient, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let raw: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| ConfigError::from_json_error(&e))?;

    mutate(sync, |editor| {
        editor.import(&raw);
        Ok(format!("Applied {}", file.display()))
    })
    .await
}

async fn explain(sync: &SyncClient, path: &str, json: bool, roll: bool) -> Result<()> {
    pull_ready(sync).await?;
    let config = sync.editor().await.snapshot();
    let report = preview(&config, path);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::preview_summary(&report));
    }

    if roll {
        let hit = select_status_rule(&config.status_rules, path, &mut rand::thread_rng());
        match tamper_annotation(&config, hit.map(|rule| rule.status_code)) {
            Some(tag) => println!("{} {}", "Rolled:".cyan().bold(), tag.to_string().yellow()),
            None => println!("{} untouched", "Rolled:".cyan().bold()),
        }
    }
    Ok(())
}

async fn watch(admin: AdminClient, limit: Option<usize>) -> Result<()> {
    let mut poller = TrafficFeedPoller::new(admin);
    if limit.is_some() {
        poller = poller.with_max_entries(limit);
    }

    let handle = poller.start();
    let mut updates = handle.subscribe();
    println!("{}", "Following traffic, Ctrl+C to stop".dimmed());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let logs = updates.borrow_and_update().clone();
                print!("\x1b[2J\x1b[H");
                println!("{}", render::traffic_table(&logs));
                println!("{} requests", logs.len());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop();
    Ok(())
}
