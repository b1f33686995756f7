//! `prozes config` - read and write configuration values.

use std::fs;
use std::path::Path;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = AppConfig::resolve_path(global.config.as_deref());

    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &global, &key)?;
            println!("{value}");
        }

        ConfigCommands::Set { key, value } => {
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
                return Ok(());
            }
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(&serialised)?;
            output.field(
                "store (active)",
                &config.store_path(global.store.as_deref()).display().to_string(),
            )?;
        }

        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// `templates.store_path` reports the effective store, flags included.
fn get_config_value(config: &AppConfig, global: &GlobalArgs, key: &str) -> CliResult<String> {
    match key {
        "defaults.author" => Ok(config.defaults.author.clone().unwrap_or_default()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        "templates.store_path" => Ok(config
            .store_path(global.store.as_deref())
            .display()
            .to_string()),
        "templates.exclude" => Ok(config.templates.exclude.join(",")),
        _ => Err(unknown_key(key)),
    }
}

/// Update one key in the config file, keeping every other entry.
fn set_config_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let mut table: toml::Table = if path.exists() {
        let text = fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read config '{}'", path.display()))?;
        text.parse().map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("Failed to parse {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let (section, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;
    if !KEYS.contains(&key) {
        return Err(unknown_key(key));
    }
    let value = parse_value(key, raw)?;

    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = entry else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in {} is not a table", path.display()),
            source: None,
        });
    };
    section_table.insert(field.to_string(), value);

    // Reject edits that would make the file unloadable.
    toml::Value::Table(table.clone())
        .try_into::<AppConfig>()
        .map_err(|e| CliError::ConfigError {
            message: format!("Invalid value for {key}: {e}"),
            source: Some(Box::new(e)),
        })?;

    let text = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create config directory '{}'", parent.display()))?;
    }
    fs::write(path, text).with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

fn parse_value(key: &str, raw: &str) -> CliResult<toml::Value> {
    match key {
        "output.no_color" => raw
            .trim()
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|e| CliError::InvalidInput {
                message: format!("{key} expects true or false, got '{raw}'"),
                source: Some(Box::new(e)),
            }),
        "templates.exclude" => Ok(toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| toml::Value::String(p.to_string()))
                .collect(),
        )),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}' (known: {})", KEYS.join(", ")),
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use tempfile::TempDir;

    fn global() -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
            store: None,
        }
    }

    #[test]
    fn get_known_key() {
        let mut cfg = AppConfig::default();
        cfg.defaults.author = Some("Ada".into());
        assert_eq!(get_config_value(&cfg, &global(), "defaults.author").unwrap(), "Ada");
        assert_eq!(get_config_value(&cfg, &global(), "output.no_color").unwrap(), "false");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, &global(), "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn store_path_reflects_flag() {
        let mut g = global();
        g.store = Some("/tmp/store".into());
        assert_eq!(
            get_config_value(&AppConfig::default(), &g, "templates.store_path").unwrap(),
            "/tmp/store"
        );
    }

    #[test]
    fn set_creates_and_updates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        set_config_value(&path, "defaults.author", "Ada").unwrap();
        set_config_value(&path, "templates.exclude", "*.log, tmp ,").unwrap();
        set_config_value(&path, "output.no_color", "true").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.author.as_deref(), Some("Ada"));
        assert_eq!(cfg.templates.exclude, vec!["*.log", "tmp"]);
        assert!(cfg.output.no_color);
    }

    #[test]
    fn set_rejects_bad_values_and_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        assert!(matches!(
            set_config_value(&path, "output.no_color", "maybe"),
            Err(CliError::InvalidInput { .. })
        ));
        assert!(matches!(
            set_config_value(&path, "defaults.lang", "rust"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(!path.exists());
    }
}
