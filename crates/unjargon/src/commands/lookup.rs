//! Lookup command: translate one piece of text.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use unjargon_core::config::Config;
use unjargon_core::{Dictionary, MatchTier, Severity, Translation};

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Text to translate, e.g. "Contact Sales".
    pub text: String,
}

#[derive(Debug, Serialize)]
struct LookupReport<'a> {
    input: &'a str,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<MatchTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

impl<'a> LookupReport<'a> {
    fn new(input: &'a str, translation: Option<&'a Translation<'a>>) -> Self {
        Self {
            input,
            found: translation.is_some(),
            key: translation.map(|t| t.entry.key.as_str()),
            translation: translation.map(|t| t.replacement.as_str()),
            tier: translation.map(|t| t.tier),
            severity: translation.map(|t| t.entry.severity),
            explanation: translation
                .map(|t| t.entry.explanation.as_str())
                .filter(|e| !e.is_empty()),
            category: translation
                .map(|t| t.entry.category.as_str())
                .filter(|c| !c.is_empty()),
        }
    }
}

/// Translate `args.text` with the configured dictionary.
#[instrument(name = "cmd_lookup", skip_all, fields(text = %args.text))]
pub fn cmd_lookup(args: LookupArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let dictionary = Dictionary::load(config.dictionary_path.as_deref());
    let translation = dictionary.translate(&args.text);
    debug!(found = translation.is_some(), "lookup finished");

    let report = LookupReport::new(&args.text, translation.as_ref());
    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(t) = translation.as_ref() else {
        println!("{} \"{}\"", "No translation for".yellow(), args.text);
        return Ok(());
    };
    println!("{} \u{2192} {}", t.original.bold(), t.replacement.green());
    if !t.entry.explanation.is_empty() {
        println!("  {} {}", t.entry.severity.icon(), t.entry.explanation);
    }
    println!(
        "  {}",
        format!("{} match on \"{}\" ({})", t.tier.as_str(), t.entry.key, t.entry.severity).dimmed()
    );
    Ok(())
}
