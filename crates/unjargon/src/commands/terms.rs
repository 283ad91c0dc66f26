//! Terms command: list the dictionary.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use unjargon_core::config::Config;
use unjargon_core::{Dictionary, DictionaryEntry, Severity};

/// Arguments for the `terms` subcommand.
#[derive(Args, Debug, Default)]
pub struct TermsArgs {
    /// Only terms in this category (case-insensitive).
    #[arg(long)]
    pub category: Option<String>,

    /// Only terms with this severity.
    #[arg(long, value_enum)]
    pub severity: Option<Severity>,
}

#[derive(Serialize)]
struct TermRow<'a> {
    term: &'a str,
    translation: &'a str,
    severity: Severity,
    category: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    explanation: &'a str,
}

impl<'a> From<&'a DictionaryEntry> for TermRow<'a> {
    fn from(entry: &'a DictionaryEntry) -> Self {
        Self {
            term: &entry.key,
            translation: &entry.replacement,
            severity: entry.severity,
            category: &entry.category,
            explanation: &entry.explanation,
        }
    }
}

fn select<'d>(dictionary: &'d Dictionary, args: &TermsArgs) -> Vec<&'d DictionaryEntry> {
    dictionary
        .entries()
        .iter()
        .filter(|e| {
            args.category
                .as_deref()
                .is_none_or(|c| e.category.eq_ignore_ascii_case(c))
        })
        .filter(|e| args.severity.is_none_or(|s| e.severity == s))
        .collect()
}

/// List dictionary terms, optionally filtered.
#[instrument(name = "cmd_terms", skip_all)]
pub fn cmd_terms(args: TermsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let dictionary = Dictionary::load(config.dictionary_path.as_deref());
    let selected = select(&dictionary, &args);
    debug!(
        total = dictionary.len(),
        selected = selected.len(),
        origin = %dictionary.origin(),
        "terms selected"
    );

    if global_json {
        let rows: Vec<TermRow<'_>> = selected.into_iter().map(TermRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for entry in &selected {
        let term = match entry.severity {
            Severity::Good => entry.key.green().to_string(),
            Severity::Neutral => entry.key.cyan().to_string(),
            Severity::Warning => entry.key.yellow().to_string(),
        };
        println!("{term} \u{2192} {}", entry.replacement);
    }
    println!();
    println!(
        "{}",
        format!(
            "{} of {} terms ({})",
            selected.len(),
            dictionary.len(),
            dictionary.origin()
        )
        .dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filter_lists_everything() {
        let dict = Dictionary::bundled().unwrap();
        assert_eq!(select(&dict, &TermsArgs::default()).len(), dict.len());
    }

    #[test]
    fn filters_combine() {
        let dict = Dictionary::bundled().unwrap();
        let args = TermsArgs {
            category: Some("PRICING".to_string()),
            severity: Some(Severity::Warning),
        };
        let selected = select(&dict, &args);
        assert!(!selected.is_empty());
        assert!(selected.iter().any(|e| e.key == "Contact Sales"));
        assert!(
            selected
                .iter()
                .all(|e| e.category == "pricing" && e.severity == Severity::Warning)
        );
    }

    #[test]
    fn unknown_category_is_empty() {
        let dict = Dictionary::bundled().unwrap();
        let args = TermsArgs {
            category: Some("nope".to_string()),
            severity: None,
        };
        assert!(select(&dict, &args).is_empty());
    }
}
