//! Activation command: would a URL be annotated?

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use unjargon_core::activation::{self, ActivationDecision};
use unjargon_core::config::Config;

/// Arguments for the `activation` subcommand.
#[derive(Args, Debug)]
pub struct ActivationArgs {
    /// Page URL to check.
    pub url: String,
}

#[derive(Serialize)]
struct ActivationReport<'a> {
    url: &'a str,
    active: bool,
    #[serde(flatten)]
    decision: &'a ActivationDecision,
}

/// Short human-readable reason for a decision.
pub(crate) fn describe(decision: &ActivationDecision) -> String {
    match decision {
        ActivationDecision::Disabled => "disabled in configuration".to_string(),
        ActivationDecision::Denied { rule } => format!("blacklisted by \"{rule}\""),
        ActivationDecision::Allowed { rule } => format!("whitelisted by \"{rule}\""),
        ActivationDecision::PricingPage { keyword } => format!("pricing page ({keyword})"),
        ActivationDecision::LocalTestPage => "local test page".to_string(),
        ActivationDecision::NotApplicable => "not a pricing page".to_string(),
    }
}

/// Report how the activation rules treat a URL.
#[instrument(name = "cmd_activation", skip_all, fields(url = %args.url))]
pub fn cmd_activation(args: ActivationArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let settings = config.activation_settings();
    let decision = activation::evaluate(&args.url, &settings);
    debug!(?decision, "activation evaluated");

    if global_json {
        let report = ActivationReport {
            url: &args.url,
            active: decision.is_active(),
            decision: &decision,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if decision.is_active() {
        println!("{} {} ({})", "ACTIVE:".green(), args.url, describe(&decision));
    } else {
        println!("{} {} ({})", "INACTIVE:".yellow(), args.url, describe(&decision));
    }
    Ok(())
}
