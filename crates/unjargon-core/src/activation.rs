//! Decide whether a page should be annotated.
//!
//! A page is processed when the master switch is on and the URL is on the
//! allow list, looks like a pricing page, or is a local test page. A deny
//! list entry overrides all of these. List entries are plain substrings of
//! the URL; blank entries are ignored.

use serde::{Deserialize, Serialize};

/// URL fragments that mark a pricing page.
pub const PRICING_PATH_KEYWORDS: &[&str] = &[
    "/pricing",
    "/plans",
    "/prices",
    "/cost",
    "/subscription",
    "/billing",
    "/tiers",
    "/packages",
    "/rates",
    "/costs",
];

/// Page name used by the bundled manual test page.
pub const TEST_PAGE_NAME: &str = "test-extension.html";

/// User settings the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivationSettings {
    /// Master switch.
    pub enabled: bool,
    /// Show tooltips on hover and focus.
    pub show_tooltips: bool,
    /// Style markers by severity.
    pub highlight_jargon: bool,
    /// URL substrings that always activate.
    pub whitelist_sites: Vec<String>,
    /// URL substrings that never activate.
    pub blacklist_sites: Vec<String>,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            show_tooltips: true,
            highlight_jargon: true,
            whitelist_sites: Vec::new(),
            blacklist_sites: Vec::new(),
        }
    }
}

/// A partial settings change; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New master switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New tooltip setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tooltips: Option<bool>,
    /// New highlight setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_jargon: Option<bool>,
    /// Replacement allow list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_sites: Option<Vec<String>>,
    /// Replacement deny list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist_sites: Option<Vec<String>>,
}

impl ActivationSettings {
    /// Apply a partial update.
    pub fn merge(&mut self, update: SettingsUpdate) {
        if let Some(v) = update.enabled {
            self.enabled = v;
        }
        if let Some(v) = update.show_tooltips {
            self.show_tooltips = v;
        }
        if let Some(v) = update.highlight_jargon {
            self.highlight_jargon = v;
        }
        if let Some(v) = update.whitelist_sites {
            self.whitelist_sites = v;
        }
        if let Some(v) = update.blacklist_sites {
            self.blacklist_sites = v;
        }
    }
}

/// Why a page is or is not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "kebab-case")]
pub enum ActivationDecision {
    /// The master switch is off.
    Disabled,
    /// A deny list entry matched.
    Denied {
        /// The matching entry.
        rule: String,
    },
    /// An allow list entry matched.
    Allowed {
        /// The matching entry.
        rule: String,
    },
    /// The URL contains a pricing keyword.
    PricingPage {
        /// The matching keyword.
        keyword: String,
    },
    /// A local file or the manual test page.
    LocalTestPage,
    /// None of the rules apply.
    NotApplicable,
}

impl ActivationDecision {
    /// Returns `true` if the page should be processed.
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Allowed { .. } | Self::PricingPage { .. } | Self::LocalTestPage
        )
    }
}

fn first_rule<'a>(url: &str, rules: &'a [String]) -> Option<&'a str> {
    rules
        .iter()
        .map(|r| r.trim())
        .find(|r| !r.is_empty() && url.contains(r))
}

/// The pricing keyword the URL contains, if any.
pub fn pricing_keyword(url: &str) -> Option<&'static str> {
    PRICING_PATH_KEYWORDS.iter().copied().find(|k| url.contains(k))
}

/// Returns `true` if the URL looks like a pricing page.
pub fn is_pricing_page(url: &str) -> bool {
    pricing_keyword(url).is_some()
}

/// Returns `true` for `file://` URLs and the manual test page.
pub fn is_local_test_page(url: &str) -> bool {
    url.starts_with("file://") || url.contains(TEST_PAGE_NAME)
}

/// Evaluate the activation rules for `url`.
pub fn evaluate(url: &str, settings: &ActivationSettings) -> ActivationDecision {
    if !settings.enabled {
        return ActivationDecision::Disabled;
    }
    if let Some(rule) = first_rule(url, &settings.blacklist_sites) {
        return ActivationDecision::Denied {
            rule: rule.to_string(),
        };
    }
    if is_local_test_page(url) {
        return ActivationDecision::LocalTestPage;
    }
    if let Some(rule) = first_rule(url, &settings.whitelist_sites) {
        return ActivationDecision::Allowed {
            rule: rule.to_string(),
        };
    }
    if let Some(keyword) = pricing_keyword(url) {
        return ActivationDecision::PricingPage {
            keyword: keyword.to_string(),
        };
    }
    ActivationDecision::NotApplicable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> ActivationSettings {
        ActivationSettings {
            enabled: true,
            ..ActivationSettings::default()
        }
    }

    #[test]
    fn defaults() {
        let s = ActivationSettings::default();
        assert!(!s.enabled);
        assert!(s.show_tooltips);
        assert!(s.highlight_jargon);
        assert!(s.whitelist_sites.is_empty());
    }

    #[test]
    fn pricing_url_activates() {
        let d = evaluate("https://example.com/pricing", &enabled());
        assert_eq!(
            d,
            ActivationDecision::PricingPage {
                keyword: "/pricing".into()
            }
        );
        assert!(d.is_active());
    }

    #[test]
    fn deny_list_wins() {
        let mut s = enabled();
        s.blacklist_sites = vec!["example.com".into()];
        s.whitelist_sites = vec!["example.com".into()];
        let d = evaluate("https://example.com/pricing", &s);
        assert_eq!(
            d,
            ActivationDecision::Denied {
                rule: "example.com".into()
            }
        );
        assert!(!d.is_active());
        assert!(!evaluate("file:///tmp/example.com.html", &s).is_active());
    }

    #[test]
    fn disabled_never_activates() {
        let d = evaluate("https://example.com/pricing", &ActivationSettings::default());
        assert_eq!(d, ActivationDecision::Disabled);
    }

    #[test]
    fn allow_list_activates_any_path() {
        let mut s = enabled();
        s.whitelist_sites = vec!["shop.example".into()];
        assert!(evaluate("https://shop.example/about", &s).is_active());
        assert_eq!(
            evaluate("https://other.example/about", &s),
            ActivationDecision::NotApplicable
        );
    }

    #[test]
    fn local_pages_activate() {
        assert_eq!(
            evaluate("file:///home/me/page.html", &enabled()),
            ActivationDecision::LocalTestPage
        );
        assert!(evaluate("http://localhost:8000/test-extension.html", &enabled()).is_active());
    }

    #[test]
    fn local_file_wins_over_pricing_keyword() {
        let mut s = enabled();
        s.whitelist_sites = vec!["plans".into()];
        assert_eq!(
            evaluate("file:///tmp/site/plans.html", &s),
            ActivationDecision::LocalTestPage
        );
        s.blacklist_sites = vec!["/tmp/site".into()];
        assert!(matches!(
            evaluate("file:///tmp/site/plans.html", &s),
            ActivationDecision::Denied { .. }
        ));
    }

    #[test]
    fn blank_rules_are_ignored() {
        let mut s = enabled();
        s.blacklist_sites = vec![String::new(), "  ".into()];
        assert!(evaluate("https://example.com/plans", &s).is_active());
    }

    #[test]
    fn every_keyword_is_recognized() {
        for k in PRICING_PATH_KEYWORDS {
            assert!(is_pricing_page(&format!("https://x.test{k}")));
        }
        assert!(!is_pricing_page("https://x.test/about"));
    }

    #[test]
    fn partial_update_merges() {
        let mut s = ActivationSettings::default();
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"enabled": true, "blacklistSites": ["a.test"]}"#).unwrap();
        s.merge(update);
        assert!(s.enabled);
        assert!(s.show_tooltips);
        assert_eq!(s.blacklist_sites, vec!["a.test".to_string()]);
    }

    #[test]
    fn settings_use_camel_case() {
        let json = serde_json::to_value(ActivationSettings::default()).unwrap();
        assert_eq!(json["showTooltips"], true);
        assert!(json.get("whitelistSites").is_some());
        let decision = serde_json::to_value(ActivationDecision::LocalTestPage).unwrap();
        assert_eq!(decision["decision"], "local-test-page");
    }
}
