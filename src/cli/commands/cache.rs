//! Cache command - inspect and maintain the artifact cache

use crate::cache::{format_bytes, CacheEntry, CacheSizeStatus, CacheUsage, Ceiling};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::cli::commands::blocking;
use crate::config::Config;
use crate::error::HoardResult;
use crate::hash::name_for;
use crate::ui;
use console::style;
use std::fmt::Display;
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> HoardResult<()> {
    match args.action {
        CacheAction::List { format } => list_entries(config, format).await,
        CacheAction::Stats => show_stats(config).await,
        CacheAction::Prune => prune(config).await,
        CacheAction::Clear { yes } => clear(config, yes).await,
        CacheAction::Name { extension, inputs } => {
            print_name(&extension, &inputs);
            Ok(())
        }
    }
}

/// List all cache entries
async fn list_entries(config: &Config, format: OutputFormat) -> HoardResult<()> {
    let config = config.clone();
    let entries = blocking(move || config.open_cache()?.entries()).await?;

    if entries.is_empty() {
        println!("No cached artifacts.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_entry_table(&entries),
        OutputFormat::Json => print_entry_json(&entries)?,
        OutputFormat::Plain => print_entry_plain(&entries),
    }

    Ok(())
}

fn print_entry_table(entries: &[CacheEntry]) {
    println!("{:<72} {:>10} {:<20}", "NAME", "SIZE", "LAST ACCESS");
    println!("{}", "-".repeat(104));

    for entry in entries {
        println!(
            "{:<72} {:>10} {:<20}",
            entry.name,
            format_bytes(entry.size),
            entry.accessed_utc().format("%Y-%m-%d %H:%M:%S")
        );
    }

    let usage = CacheUsage::of(entries);
    println!();
    println!(
        "Total: {} artifact(s), {}",
        usage.entries,
        format_bytes(usage.bytes)
    );
}

fn print_entry_json(entries: &[CacheEntry]) -> HoardResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        name: &'a str,
        size_bytes: u64,
        accessed_at: String,
    }

    let json_entries: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|e| EntryJson {
            name: &e.name,
            size_bytes: e.size,
            accessed_at: e.accessed_utc().to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_entries)?);
    Ok(())
}

fn print_entry_plain(entries: &[CacheEntry]) {
    for entry in entries {
        println!("{}", entry.name);
    }
}

/// Show usage relative to the ceiling
async fn show_stats(config: &Config) -> HoardResult<()> {
    let config = config.clone();
    let (root, ceiling, usage) = blocking(move || {
        let cache = config.open_cache()?;
        let usage = cache.usage()?;
        Ok((cache.root().to_path_buf(), cache.ceiling(), usage))
    })
    .await?;

    ui::section("Artifact cache");
    ui::key_value("Location", &root.display().to_string());
    ui::key_value("Artifacts", &usage.entries.to_string());
    ui::key_value("Size", &format_bytes(usage.bytes));
    ui::key_value("Limit", &ceiling.to_string());

    let percent = CacheSizeStatus::percentage(usage, ceiling);
    let used = format!("{:.1}%", percent);
    let used = match CacheSizeStatus::from_usage(usage, ceiling) {
        CacheSizeStatus::Ok => style(used).green(),
        CacheSizeStatus::Warning => style(used).yellow(),
        CacheSizeStatus::Full => style(used).red(),
    };
    ui::key_value("Used", &used.to_string());

    Ok(())
}

/// Evict down to the configured ceiling
async fn prune(config: &Config) -> HoardResult<()> {
    let config = config.clone();
    let (ceiling, evicted): (Ceiling, Vec<CacheEntry>) = blocking(move || {
        let cache = config.open_cache()?;
        Ok((cache.ceiling(), cache.prune()?))
    })
    .await?;

    if evicted.is_empty() {
        ui::step_skip(&format!("Cache is within its {} limit", ceiling));
        return Ok(());
    }

    for entry in &evicted {
        debug!("Pruned {}", entry.name);
    }
    let freed = CacheUsage::of(&evicted);
    ui::step_ok(&format!(
        "Evicted {} artifact(s), freed {}",
        freed.entries,
        format_bytes(freed.bytes)
    ));

    Ok(())
}

/// Remove every artifact
async fn clear(config: &Config, skip_confirm: bool) -> HoardResult<()> {
    let list_config = config.clone();
    let usage = blocking(move || list_config.open_cache()?.usage()).await?;

    if usage.entries == 0 {
        println!("No cached artifacts to clear.");
        return Ok(());
    }

    println!(
        "This will remove {} artifact(s) ({}).",
        usage.entries,
        format_bytes(usage.bytes)
    );

    if !skip_confirm && !ui::confirm("Are you sure?") {
        println!("Aborted.");
        return Ok(());
    }

    let config = config.clone();
    let removed = blocking(move || config.open_cache()?.clear()).await?;
    ui::step_ok(&format!("Removed {} artifact(s)", removed));

    Ok(())
}

fn print_name(extension: &str, inputs: &[String]) {
    let parts: Vec<&dyn Display> = inputs.iter().map(|s| s as &dyn Display).collect();
    println!("{}", name_for(&parts, extension));
}
