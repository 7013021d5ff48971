//! Configuration commands for managing leaddesk settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config, SENSITIVE_KEYS};
use crate::error::Result;
use crate::utils::mask_secret;

/// Value of `key` for display, with secrets masked.
fn display_value(config: &Config, key: &str) -> Result<Option<String>> {
    let value = config.get(key)?;
    if SENSITIVE_KEYS.contains(&key) {
        return Ok(value.map(|v| mask_secret(&v)));
    }
    Ok(value)
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut values = serde_json::Map::new();
    let mut text_output = format!("{}\n\n", "Configuration:".cyan().bold());
    for key in CONFIG_KEYS {
        let value = display_value(&config, key)?;
        match &value {
            Some(v) => text_output.push_str(&format!("  {}: {}\n", key.cyan(), v)),
            None => text_output.push_str(&format!(
                "  {}: {}\n",
                key.cyan(),
                "not set".dimmed()
            )),
        }
        values.insert(key.to_string(), json!(value));
    }

    let path = Config::config_path();
    text_output.push_str(&format!(
        "\n{} {}",
        "Config file:".dimmed(),
        path.display()
    ));

    CommandOutput::new(json!({
        "values": values,
        "config_file": path.to_string_lossy(),
    }))
    .with_text(text_output)
    .print(output)
}

/// Get one configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = display_value(&config, key)?;
    let text = value.clone().unwrap_or_default();

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(text)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = display_value(&config, key)?.unwrap_or_default();
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), shown))
    .print(output)
}
