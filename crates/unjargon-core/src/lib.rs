//! Core library for unjargon.
//!
//! Finds pricing and billing jargon in a page and wraps each occurrence in
//! an interactive marker that carries a plain-language translation.
//!
//! # Modules
//!
//! - [`dictionary`] - Jargon dictionary, lookup tiers and fallbacks
//! - [`matcher`] - Whole-word, non-overlapping term matching
//! - [`dom`] - The document tree the engine works on
//! - [`html`] - HTML import and export
//! - [`rewriter`] - Marker insertion and removal
//! - [`tooltip`] - Tooltip placement and visibility
//! - [`activation`] - Whether a URL should be processed
//! - [`eligibility`] - Which elements a scan visits
//! - [`debounce`] - Rescan scheduling
//! - [`events`] - Stats and control messages
//! - [`scan`] - The scan orchestrator
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use unjargon_core::{Dictionary, NullSink, Scanner, html};
//!
//! let dictionary = Dictionary::load(None);
//! let mut doc = html::parse_html("<p>Contact Sales for Enterprise Pricing</p>");
//! let settings = unjargon_core::ActivationSettings {
//!     enabled: true,
//!     ..Default::default()
//! };
//! let mut scanner = Scanner::new(dictionary, settings, "https://example.com/pricing", NullSink);
//! let result = scanner.activate(&mut doc).expect("page is active");
//! println!("{} terms", result.term_count);
//! ```
#![deny(unsafe_code)]

pub mod activation;
pub mod config;
pub mod debounce;
pub mod dictionary;
pub mod dom;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod html;
pub mod matcher;
pub mod rewriter;
pub mod scan;
pub mod tooltip;

pub use activation::{ActivationDecision, ActivationSettings, SettingsUpdate};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use dictionary::{Dictionary, DictionaryEntry, DictionaryOrigin, MatchTier, Severity, Translation};
pub use dom::{Document, NodeId, Rect};
pub use error::{
    ConfigError, ConfigResult, DeliveryError, DictionaryError, DictionaryResult, HtmlError,
    HtmlResult, RewriteError, RewriteResult,
};
pub use events::{InboundMessage, NullSink, OutboundMessage, RecordingSink, ScanResult, StatsSink};
pub use matcher::{MatchSpan, find_matches};
pub use scan::{ScanState, Scanner};
pub use tooltip::{TooltipPresenter, Viewport};

/// Default maximum HTML input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
