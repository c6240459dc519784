//! Info command implementation

use clap::Args;
use owo_colors::Style;
use serde::Serialize;
use tracing::{debug, instrument};
use zhi_lang_cop_core::config::{Config, ConfigSources};

use super::{load_dictionary, paint};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            dictionary: config.dictionary.as_ref().map(|p| p.to_string()),
            min_level: config.min_level.map(|l| l.as_str().to_string()),
            max_input_bytes: config.input_limit(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DictionaryInfo {
    version: String,
    last_updated: String,
    total_rules: usize,
    total_terms: usize,
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    dictionary: DictionaryInfo,
}

/// Print package, configuration, and dictionary information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let stats = load_dictionary(config)?.statistics();
    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        dictionary: DictionaryInfo {
            version: stats.version,
            last_updated: stats.last_updated,
            total_rules: stats.total_rules,
            total_terms: stats.total_terms,
        },
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let dim = Style::new().dimmed();
    let heading = Style::new().bold().underline();

    println!(
        "{} {}",
        paint(full_info.package.name, Style::new().bold()),
        paint(full_info.package.version, Style::new().green())
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", paint("License", dim), full_info.package.license);
    }

    println!();
    println!("{}", paint("Configuration", heading));
    let config_file = match full_info.config.config_file {
        Some(ref path) => paint(path, Style::new().cyan()),
        None => paint("none loaded", Style::new().yellow()),
    };
    println!("{}: {config_file}", paint("Config file", dim));
    println!("{}: {}", paint("Log level", dim), full_info.config.log_level);
    if let Some(ref dir) = full_info.config.log_dir {
        println!("{}: {}", paint("Log directory", dim), dir);
    }
    print_opt("Minimum level", &full_info.config.min_level);
    let limit = match full_info.config.max_input_bytes {
        Some(max) => format!("{max} bytes"),
        None => paint("disabled", Style::new().yellow()),
    };
    println!("{}: {limit}", paint("Input limit", dim));

    println!();
    println!("{}", paint("Dictionary", heading));
    let source = match full_info.config.dictionary {
        Some(ref path) => paint(path, Style::new().cyan()),
        None => "bundled".to_string(),
    };
    let dict = &full_info.dictionary;
    println!("{}: {source}", paint("Source", dim));
    println!("{}: {}", paint("Version", dim), dict.version);
    println!("{}: {}", paint("Updated", dim), dict.last_updated);
    println!("{}: {}", paint("Rules", dim), dict.total_rules);
    println!("{}: {}", paint("Terms", dim), dict.total_terms);

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    let dim = Style::new().dimmed();
    match value {
        Some(v) => println!("{}: {}", paint(label, dim), v),
        None => println!("{}: {}", paint(label, dim), paint("(not set)", dim)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zhi_lang_cop_core::Level;

    #[test]
    fn test_cmd_info_text_succeeds() {
        let result = cmd_info(
            InfoArgs::default(),
            false,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let result = cmd_info(
            InfoArgs::default(),
            true,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert!(info.dictionary.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(
            info.max_input_bytes,
            Some(zhi_lang_cop_core::DEFAULT_MAX_INPUT_BYTES)
        );
    }

    #[test]
    fn test_config_info_reports_overrides() {
        let config = Config {
            min_level: Some(Level::Warning),
            disable_input_limit: true,
            ..Default::default()
        };
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert_eq!(info.min_level.as_deref(), Some("warning"));
        assert!(info.max_input_bytes.is_none());
    }

    #[test]
    fn test_cmd_info_fails_on_missing_dictionary() {
        let config = Config {
            dictionary: Some("/nonexistent/terms-db.json".into()),
            ..Default::default()
        };
        let result = cmd_info(InfoArgs::default(), true, &config, &ConfigSources::default());
        assert!(result.is_err());
    }
}
