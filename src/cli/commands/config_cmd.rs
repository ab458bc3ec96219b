//! config command - Get, set, or list configuration values
//!
//! Reads the file that would be loaded for network commands, without the
//! `--base-url`/`--token` overrides. `set` writes back to that same file, or
//! to `~/.nexus-repo/config.toml` when none exists yet.

use crate::cli::Context;
use crate::core::config::{Config, CONFIG_KEYS};
use crate::ui::output;
use anyhow::{Context as _, Result};
use serde_json::{Map, Value};

/// Get a configuration value.
pub fn get(_ctx: &Context, key: &str) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;

    if let Some(value) = config.client.get(key)? {
        println!("{}", value);
    }
    // Unset keys exit silently
    Ok(())
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let path = config.write_path()?;

    let mut client = config.client;
    client.set(key, value)?;
    Config::write(&path, &client).context("Failed to write config")?;

    let shown = if key == "token" { "(set)" } else { value };
    output::success(format!("Set {} = {}", key, shown), ctx.verbosity());
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;

    if ctx.json {
        let mut map = Map::new();
        for key in CONFIG_KEYS {
            let value = config.client.get(key)?.map_or(Value::Null, Value::String);
            map.insert(key.to_string(), value);
        }
        output::json(&Value::Object(map));
        return Ok(());
    }

    match config.path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no config file)"),
    }
    for key in CONFIG_KEYS {
        let value = config.client.get(key)?;
        println!("{} = {}", key, value.as_deref().unwrap_or("(not set)"));
    }
    Ok(())
}

/// Print the path of the config file.
pub fn path(_ctx: &Context) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    println!("{}", config.write_path()?.display());
    Ok(())
}
