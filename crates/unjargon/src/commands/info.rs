//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};
use unjargon_core::Dictionary;
use unjargon_core::config::{Config, ConfigSources};

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
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
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
    max_input_bytes: Option<usize>,
    enabled: bool,
    show_tooltips: bool,
    highlight_jargon: bool,
    whitelist_sites: Vec<String>,
    blacklist_sites: Vec<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let settings = config.activation_settings();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            max_input_bytes: config.input_limit(),
            enabled: settings.enabled,
            show_tooltips: settings.show_tooltips,
            highlight_jargon: settings.highlight_jargon,
            whitelist_sites: settings.whitelist_sites,
            blacklist_sites: settings.blacklist_sites,
        }
    }
}

#[derive(Serialize)]
struct DictionaryInfo {
    origin: String,
    terms: usize,
    patterns: usize,
    categories: Vec<String>,
}

impl DictionaryInfo {
    fn from_dictionary(dictionary: &Dictionary) -> Self {
        Self {
            origin: dictionary.origin().to_string(),
            terms: dictionary.len(),
            patterns: dictionary.pattern_count(),
            categories: dictionary
                .categories()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    dictionary: DictionaryInfo,
}

/// Print package information, effective configuration and dictionary stats.
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let dictionary = Dictionary::load(config.dictionary_path.as_deref());
    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        dictionary: DictionaryInfo::from_dictionary(&dictionary),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let FullInfo {
        package,
        config,
        dictionary,
    } = &full_info;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    match &config.config_file {
        Some(path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), config.log_level);
    if let Some(dir) = &config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match config.max_input_bytes {
        Some(max) => println!("{}: {max} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Activation".bold().underline());
    print_flag("Enabled", config.enabled);
    print_flag("Tooltips", config.show_tooltips);
    print_flag("Highlighting", config.highlight_jargon);
    print_list("Whitelist", &config.whitelist_sites);
    print_list("Blacklist", &config.blacklist_sites);

    println!();
    println!("{}", "Dictionary".bold().underline());
    println!("{}: {}", "Source".dimmed(), dictionary.origin);
    println!(
        "{}: {} ({} fallback patterns)",
        "Terms".dimmed(),
        dictionary.terms,
        dictionary.patterns
    );
    println!("{}: {}", "Categories".dimmed(), dictionary.categories.join(", "));

    Ok(())
}

fn print_flag(label: &str, value: bool) {
    if value {
        println!("{}: {}", label.dimmed(), "on".green());
    } else {
        println!("{}: {}", label.dimmed(), "off".yellow());
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("{}: {}", label.dimmed(), "(none)".dimmed());
    } else {
        println!("{}: {}", label.dimmed(), items.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_info_text_succeeds() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), false, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), true, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert!(info.enabled);
        assert_eq!(info.max_input_bytes, Some(unjargon_core::DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn dictionary_info_reports_bundled() {
        let info = DictionaryInfo::from_dictionary(&Dictionary::bundled().unwrap());
        assert_eq!(info.origin, "bundled");
        assert!(info.terms > 100);
        assert!(info.categories.iter().any(|c| c == "pricing"));
    }
}
