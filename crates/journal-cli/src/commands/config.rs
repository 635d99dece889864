//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use journal_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "storage_key": config.storage_key,
                    "max_field_length": config.max_field_length,
                    "required_fields": config.required_fields,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!("  storage_key:      {}", config.storage_key);
            println!("  max_field_length: {}", config.max_field_length);
            println!("  required_fields:  {}", config.required_fields.join(", "));
            println!(
                "  log_file:         {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());

            if let Err(e) = config.validate() {
                println!();
                println!("Problems:");
                for detail in e.details() {
                    println!("  - {}", detail);
                }
            }
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    if let Err(e) = config.validate() {
        bail!(
            "Refusing to save invalid configuration:\n  {}",
            e.details().join("\n  ")
        );
    }

    // Save to the CLI-specified path or default
    match config_path {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    }
    .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "storage_key" => {
            config.storage_key = value.to_string();
        }
        "max_field_length" => {
            config.max_field_length = value
                .parse()
                .context("Invalid value for max_field_length. Use a whole number.")?;
        }
        "required_fields" => {
            config.required_fields = value
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, storage_key, max_field_length, required_fields, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();
        apply(&mut config, "storage_key", "otherLog").unwrap();
        apply(&mut config, "max_field_length", "200").unwrap();
        apply(&mut config, "required_fields", "title, summary").unwrap();
        apply(&mut config, "log_file", "none").unwrap();

        assert_eq!(config.storage_key, "otherLog");
        assert_eq!(config.max_field_length, 200);
        assert_eq!(config.required_fields, vec!["title", "summary"]);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_apply_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply(&mut config, "max_field_length", "lots").is_err());
        assert!(apply(&mut config, "sync_url", "ws://x").is_err());
    }

    #[test]
    fn test_set_refuses_invalid_values() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let quiet = Output::new(OutputFormat::Quiet);

        let err = set("max_field_length".into(), "0".into(), Some(&path), &quiet).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
        assert!(!path.exists());

        set("storage_key".into(), "myLog".into(), Some(&path), &quiet).unwrap();
        let saved = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.storage_key, "myLog");
    }
}
