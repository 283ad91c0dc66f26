//! The scan engine.
//!
//! A [`Scanner`] owns the dictionary, the current settings, the single
//! tooltip presenter and the list of markers it inserted. The host owns the
//! [`Document`] and hands it in for every call that reads or mutates it.
//!
//! Every scan first reverts the markers left by the previous one, so
//! repeated scans of an unchanged page give the same result and markers are
//! never nested.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::activation::{self, ActivationDecision, ActivationSettings};
use crate::debounce::Debouncer;
use crate::dictionary::Dictionary;
use crate::dom::{Document, NodeId, Rect};
use crate::eligibility;
use crate::events::{
    CurrentStats, InboundMessage, NullSink, OutboundMessage, ScanResult, StatsReply, StatsSink,
};
use crate::matcher::find_matches;
use crate::rewriter::{self, MARKER_CLASS, MarkerSpec, RewritePath};
use crate::tooltip::{TooltipContent, TooltipPresenter, Viewport};

/// Class set on the body while the page is being processed.
pub const ACTIVE_BODY_CLASS: &str = "unjargon-active";

/// Whether a scan is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    /// No scan running.
    #[default]
    Idle,
    /// A scan is running; further requests are dropped.
    Scanning,
}

/// Holds the scan state at `Scanning` until dropped.
#[derive(Debug)]
struct ScanGuard {
    state: Rc<Cell<ScanState>>,
}

impl ScanGuard {
    fn enter(state: &Rc<Cell<ScanState>>) -> Option<Self> {
        if state.get() == ScanState::Scanning {
            return None;
        }
        state.set(ScanState::Scanning);
        Some(Self {
            state: Rc::clone(state),
        })
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.state.set(ScanState::Idle);
    }
}

/// A marker inserted by the last scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMarker {
    /// The marker element.
    pub node: NodeId,
    /// What its tooltip shows.
    pub content: TooltipContent,
    /// How it was inserted.
    pub path: RewritePath,
}

/// User input reaching a marker or the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// Pointer moved onto a marker.
    PointerEnter(NodeId),
    /// Pointer left a marker.
    PointerLeave(NodeId),
    /// A marker received keyboard focus.
    Focus(NodeId),
    /// A marker lost keyboard focus.
    Blur(NodeId),
    /// A marker was clicked or activated.
    Click(NodeId),
    /// The page scrolled.
    Scroll,
    /// The viewport changed size.
    Resize(Viewport),
}

/// Drives scanning, markers and the tooltip for one page.
#[derive(Debug)]
pub struct Scanner<S = NullSink> {
    dictionary: Dictionary,
    settings: ActivationSettings,
    url: String,
    presenter: TooltipPresenter,
    state: Rc<Cell<ScanState>>,
    active: bool,
    markers: Vec<ActiveMarker>,
    term_count: usize,
    last_result: Option<ScanResult>,
    debouncer: Debouncer,
    sink: S,
}

impl<S: StatsSink> Scanner<S> {
    /// Create an inactive scanner for the page at `url`.
    pub fn new(
        dictionary: Dictionary,
        settings: ActivationSettings,
        url: impl Into<String>,
        sink: S,
    ) -> Self {
        Self {
            dictionary,
            settings,
            url: url.into(),
            presenter: TooltipPresenter::default(),
            state: Rc::new(Cell::new(ScanState::Idle)),
            active: false,
            markers: Vec::new(),
            term_count: 0,
            last_result: None,
            debouncer: Debouncer::default(),
            sink,
        }
    }

    /// Use a different tooltip presenter.
    #[must_use]
    pub fn with_presenter(mut self, presenter: TooltipPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    /// The activation rules applied to the current URL and settings.
    pub fn decision(&self) -> ActivationDecision {
        activation::evaluate(&self.url, &self.settings)
    }

    /// Activate or deactivate according to [`Self::decision`].
    pub fn refresh(&mut self, doc: &mut Document) -> ActivationDecision {
        let decision = self.decision();
        tracing::debug!(?decision, url = %self.url, "activation evaluated");
        if decision.is_active() {
            self.activate(doc);
        } else {
            self.deactivate(doc);
        }
        decision
    }

    /// Start processing the page and run the first scan.
    ///
    /// Does nothing when already active.
    pub fn activate(&mut self, doc: &mut Document) -> Option<ScanResult> {
        if self.active {
            return None;
        }
        self.active = true;
        let body = doc.body();
        if let Some(el) = doc.element_mut(body) {
            el.add_class(ACTIVE_BODY_CLASS);
        }
        tracing::info!(url = %self.url, "activated");
        self.scan(doc)
    }

    /// Stop processing and remove every marker.
    ///
    /// Does nothing when already inactive.
    pub fn deactivate(&mut self, doc: &mut Document) {
        if !self.active {
            return;
        }
        self.active = false;
        let body = doc.body();
        if let Some(el) = doc.element_mut(body) {
            el.remove_class(ACTIVE_BODY_CLASS);
        }
        let root = doc.root();
        rewriter::revert_markers(doc, root);
        self.markers.clear();
        self.presenter.hide();
        self.debouncer.cancel();
        self.term_count = 0;
        self.last_result = None;
        tracing::info!(url = %self.url, "deactivated");
    }

    /// Scan the document, replacing the previous scan's markers.
    ///
    /// Returns `None` when inactive or when a scan is already running.
    #[tracing::instrument(skip_all, fields(url = %self.url))]
    pub fn scan(&mut self, doc: &mut Document) -> Option<ScanResult> {
        if !self.active {
            tracing::debug!("scan requested while inactive, ignoring");
            return None;
        }
        let Some(_guard) = ScanGuard::enter(&self.state) else {
            tracing::debug!("scan already in progress, skipping");
            return None;
        };

        let root = doc.root();
        let reverted = rewriter::revert_markers(doc, root);
        self.markers.clear();
        self.presenter.hide();

        let elements = eligibility::eligible_elements(doc);
        tracing::debug!(elements = elements.len(), reverted, "scanning");

        let mut term_count = 0;
        let highlight = self.settings.highlight_jargon;
        for element in elements {
            // Fallback rewrites can detach descendants of an earlier element.
            if !doc.is_attached(element) || doc.has_descendant_class(element, MARKER_CLASS) {
                continue;
            }
            let text = doc.text_content(element);
            for span in find_matches(&text, &self.dictionary) {
                let Some(translation) = self.dictionary.translate(&span.matched) else {
                    continue;
                };
                if !translation.changes_text() {
                    continue;
                }
                term_count += 1;
                let spec = MarkerSpec {
                    original: &span.matched,
                    replacement: &translation.replacement,
                    severity: highlight.then_some(translation.entry.severity),
                    offset: span.start,
                };
                match rewriter::apply_marker(doc, element, &spec) {
                    Ok(outcome) => self.markers.push(ActiveMarker {
                        node: outcome.marker,
                        content: TooltipContent {
                            original: span.matched.clone(),
                            translation: translation.replacement.clone(),
                            explanation: translation.entry.explanation.clone(),
                            severity: translation.entry.severity,
                        },
                        path: outcome.path,
                    }),
                    Err(e) => {
                        tracing::debug!(element = %element, error = %e, "marker not inserted");
                    }
                }
            }
        }

        self.term_count = term_count;
        let result = ScanResult::now(term_count, self.markers.len());
        self.last_result = Some(result);
        tracing::info!(
            terms = result.term_count,
            translations = result.translation_count,
            "scan complete"
        );
        self.notify(result);
        Some(result)
    }

    fn notify(&mut self, result: ScanResult) {
        let messages = [
            OutboundMessage::LogDetection { data: result },
            OutboundMessage::StatsUpdated { stats: result },
        ];
        for message in &messages {
            if let Err(e) = self.sink.send(message) {
                tracing::debug!(action = message.action(), error = %e, "stats notification dropped");
            }
        }
    }

    /// Handle a command from the host. Only `GetCurrentStats` has a reply.
    pub fn handle_message(
        &mut self,
        doc: &mut Document,
        message: InboundMessage,
    ) -> Option<StatsReply> {
        match message {
            InboundMessage::ToggleExtension { enabled } => {
                self.settings.enabled = enabled;
                self.refresh(doc);
                None
            }
            InboundMessage::SettingsUpdated { settings } => {
                self.settings.merge(settings);
                if !self.settings.show_tooltips {
                    self.presenter.hide();
                }
                self.refresh(doc);
                None
            }
            InboundMessage::ScanPage => {
                self.scan(doc);
                None
            }
            InboundMessage::GetCurrentStats => Some(self.current_stats().into()),
        }
    }

    /// Report nodes the host saw being added to the document.
    ///
    /// Arms a debounced rescan when an added element carries enough text.
    /// Markers are ignored, so a scan does not retrigger itself. Returns
    /// whether the rescan was (re)armed.
    pub fn observe_additions(&mut self, doc: &Document, added: &[NodeId], now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let relevant = added.iter().any(|&id| {
            doc.element(id).is_some()
                && !rewriter::is_marker(doc, id)
                && eligibility::has_meaningful_text(&doc.text_content(id))
        });
        if relevant {
            self.debouncer.trigger(now);
            tracing::trace!(deadline = ?self.debouncer.deadline(), "rescan armed");
        }
        relevant
    }

    /// Run the pending rescan if its deadline has passed.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Option<ScanResult> {
        if self.debouncer.poll(now) {
            self.scan(doc)
        } else {
            None
        }
    }

    /// When the pending rescan fires, if one is armed.
    pub const fn rescan_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Feed a user interaction to the tooltip.
    pub fn interact(&mut self, doc: &Document, event: InteractionEvent) {
        match event {
            InteractionEvent::PointerEnter(node) | InteractionEvent::Focus(node) => {
                if !self.settings.show_tooltips {
                    return;
                }
                if let Some(content) = self.marker_content(node) {
                    self.presenter.show(node, anchor_rect(doc, node), content);
                }
            }
            InteractionEvent::PointerLeave(_) | InteractionEvent::Blur(_) => {
                self.presenter.hide();
            }
            InteractionEvent::Click(node) => {
                if let Some(content) = self.marker_content(node) {
                    self.presenter.toggle(node, anchor_rect(doc, node), content);
                }
            }
            InteractionEvent::Scroll => self.presenter.on_scroll(),
            InteractionEvent::Resize(viewport) => {
                let rect = self.presenter.current_anchor().map(|a| anchor_rect(doc, a));
                self.presenter.on_resize(viewport, rect);
            }
        }
    }

    fn marker_content(&self, node: NodeId) -> Option<TooltipContent> {
        self.markers
            .iter()
            .find(|m| m.node == node)
            .map(|m| m.content.clone())
    }

    /// Counts from the last scan and whether the page is active.
    pub fn current_stats(&self) -> CurrentStats {
        CurrentStats {
            term_count: self.term_count,
            translation_count: self.markers.len(),
            is_active: self.active,
        }
    }

    /// Result of the last completed scan.
    pub const fn last_result(&self) -> Option<ScanResult> {
        self.last_result
    }

    /// Markers inserted by the last scan, in insertion order.
    pub fn markers(&self) -> &[ActiveMarker] {
        &self.markers
    }

    /// Returns `true` while the page is being processed.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a scan is running.
    pub fn state(&self) -> ScanState {
        self.state.get()
    }

    /// The tooltip presenter.
    pub const fn presenter(&self) -> &TooltipPresenter {
        &self.presenter
    }

    /// Current settings.
    pub const fn settings(&self) -> &ActivationSettings {
        &self.settings
    }

    /// The dictionary in use.
    pub const fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The page URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The outbound sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

/// Layout box of the marker, or of its nearest rendered ancestor.
fn anchor_rect(doc: &Document, node: NodeId) -> Rect {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .find_map(|id| doc.layout(id))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::rewriter::marker_data;
    use crate::tooltip::Placement;
    use std::time::Duration;

    const URL: &str = "https://example.com/pricing";

    fn page(paragraphs: &[&str]) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let body = doc.create_element("body");
        doc.append_child(root, body);
        let mut ids = Vec::new();
        for (i, text) in paragraphs.iter().enumerate() {
            let p = doc.create_element("p");
            doc.set_layout(p, Some(Rect::new(0.0, 30.0 * i as f64, 600.0, 20.0)));
            let t = doc.create_text(*text);
            doc.append_child(p, t);
            doc.append_child(body, p);
            ids.push(p);
        }
        (doc, ids)
    }

    fn settings() -> ActivationSettings {
        ActivationSettings {
            enabled: true,
            ..ActivationSettings::default()
        }
    }

    fn scanner() -> Scanner<RecordingSink> {
        Scanner::new(
            Dictionary::bundled().unwrap(),
            settings(),
            URL,
            RecordingSink::default(),
        )
    }

    fn translations(doc: &Document) -> Vec<String> {
        rewriter::markers(doc, doc.root())
            .into_iter()
            .filter_map(|m| marker_data(doc, m))
            .map(|d| d.translation)
            .collect()
    }

    #[test]
    fn two_terms_in_one_paragraph() {
        let (mut doc, ps) = page(&["Contact Sales for Enterprise Pricing"]);
        let mut s = scanner();
        let result = s.activate(&mut doc).unwrap();

        assert_eq!(result.term_count, 2);
        assert_eq!(result.translation_count, 2);
        assert_eq!(
            translations(&doc),
            vec![
                "Hidden pricing (have to ask)".to_string(),
                "If you have to ask, it's expensive".to_string(),
            ]
        );
        assert_eq!(doc.text_content(ps[0]), "Contact Sales for Enterprise Pricing");
    }

    #[test]
    fn every_key_gets_exactly_one_marker() {
        let dict = Dictionary::bundled().unwrap();
        for key in dict.terms() {
            let upper = key.to_uppercase();
            for text in [key.to_string(), upper] {
                let (mut doc, _) = page(&[&text]);
                let mut s = Scanner::new(dict.clone(), settings(), URL, NullSink);
                s.activate(&mut doc);
                let markers = rewriter::markers(&doc, doc.root());
                assert_eq!(markers.len(), 1, "{text}");
                let data = marker_data(&doc, markers[0]).unwrap();
                assert_eq!(data.original, text);
                assert_eq!(doc.text_content(markers[0]), text);
            }
        }
    }

    #[test]
    fn rescanning_is_idempotent() {
        let (mut doc, _) = page(&["Contact Sales or pay Per Seat", "Unlimited* storage"]);
        let mut s = scanner();
        let first = s.activate(&mut doc).unwrap();
        let second = s.scan(&mut doc).unwrap();
        assert_eq!(first.term_count, second.term_count);
        assert_eq!(first.translation_count, second.translation_count);
        assert_eq!(rewriter::markers(&doc, doc.root()).len(), second.translation_count);

        let root = doc.root();
        rewriter::revert_markers(&mut doc, root);
        let third = s.scan(&mut doc).unwrap();
        assert_eq!(third.translation_count, first.translation_count);
    }

    #[test]
    fn inactive_scanner_does_nothing() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        assert!(s.scan(&mut doc).is_none());
        assert!(rewriter::markers(&doc, doc.root()).is_empty());
        assert!(s.sink().messages.is_empty());
    }

    #[test]
    fn scan_while_scanning_is_dropped() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.active = true;
        let guard = ScanGuard::enter(&s.state).unwrap();
        assert_eq!(s.state(), ScanState::Scanning);
        assert!(s.scan(&mut doc).is_none());
        drop(guard);
        assert_eq!(s.state(), ScanState::Idle);
        assert!(s.scan(&mut doc).is_some());
        assert_eq!(s.state(), ScanState::Idle);
    }

    #[test]
    fn activation_lifecycle() {
        let (mut doc, ps) = page(&["Contact Sales today"]);
        let mut s = scanner();
        assert!(s.activate(&mut doc).is_some());
        assert!(s.activate(&mut doc).is_none());
        let body = doc.body();
        assert!(doc.element(body).unwrap().has_class(ACTIVE_BODY_CLASS));

        s.deactivate(&mut doc);
        assert!(!s.is_active());
        assert!(!doc.element(body).unwrap().has_class(ACTIVE_BODY_CLASS));
        assert!(rewriter::markers(&doc, doc.root()).is_empty());
        assert_eq!(doc.children(ps[0]).len(), 1);
        assert_eq!(s.current_stats(), CurrentStats::default());
    }

    #[test]
    fn stats_are_sent_after_each_scan() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.activate(&mut doc);
        let actions: Vec<_> = s.sink().messages.iter().map(OutboundMessage::action).collect();
        assert_eq!(actions, vec!["logDetection", "statsUpdated"]);
    }

    #[test]
    fn delivery_failures_do_not_abort() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = Scanner::new(Dictionary::bundled().unwrap(), settings(), URL, NullSink);
        assert_eq!(s.activate(&mut doc).unwrap().translation_count, 1);
    }

    #[test]
    fn messages_drive_the_scanner() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();

        let reply = s.handle_message(&mut doc, InboundMessage::GetCurrentStats).unwrap();
        assert!(!reply.stats.is_active);

        s.handle_message(&mut doc, InboundMessage::ToggleExtension { enabled: true });
        assert!(s.is_active());
        let reply = s.handle_message(&mut doc, InboundMessage::GetCurrentStats).unwrap();
        assert_eq!(reply.stats.translation_count, 1);

        let deny: InboundMessage = serde_json::from_str(
            r#"{"action": "settingsUpdated", "settings": {"blacklistSites": ["example.com"]}}"#,
        )
        .unwrap();
        s.handle_message(&mut doc, deny);
        assert!(!s.is_active());
        assert!(rewriter::markers(&doc, doc.root()).is_empty());

        s.handle_message(&mut doc, InboundMessage::ScanPage);
        assert!(rewriter::markers(&doc, doc.root()).is_empty());
    }

    #[test]
    fn disabled_toggle_deactivates() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.refresh(&mut doc);
        assert!(s.is_active());
        s.handle_message(&mut doc, InboundMessage::ToggleExtension { enabled: false });
        assert!(!s.is_active());
    }

    #[test]
    fn additions_debounce_a_rescan() {
        let (mut doc, _) = page(&["Intro"]);
        let mut s = scanner();
        s.activate(&mut doc);
        assert_eq!(s.current_stats().translation_count, 0);

        let body = doc.body();
        let p = doc.create_element("p");
        doc.set_layout(p, Some(Rect::new(0.0, 60.0, 600.0, 20.0)));
        let t = doc.create_text("Now with Credits");
        doc.append_child(p, t);
        doc.append_child(body, p);

        let start = Instant::now();
        assert!(s.observe_additions(&doc, &[p], start));
        assert!(s.observe_additions(&doc, &[p], start + Duration::from_millis(300)));
        assert!(s.tick(&mut doc, start + Duration::from_millis(600)).is_none());
        let result = s.tick(&mut doc, start + Duration::from_millis(800)).unwrap();
        assert_eq!(result.translation_count, 1);
        assert!(s.rescan_deadline().is_none());
    }

    #[test]
    fn marker_additions_do_not_rearm() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.activate(&mut doc);
        let marker = s.markers()[0].node;
        assert!(!s.observe_additions(&doc, &[marker], Instant::now()));
        let short = doc.create_element("b");
        let t = doc.create_text("ok");
        doc.append_child(short, t);
        assert!(!s.observe_additions(&doc, &[short], Instant::now()));
    }

    #[test]
    fn deactivate_cancels_pending_rescan() {
        let (mut doc, ps) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.activate(&mut doc);
        s.observe_additions(&doc, &[ps[0]], Instant::now());
        s.deactivate(&mut doc);
        assert!(s.rescan_deadline().is_none());
    }

    #[test]
    fn tooltip_interactions() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.activate(&mut doc);
        let marker = s.markers()[0].node;

        s.interact(&doc, InteractionEvent::Click(marker));
        assert_eq!(s.presenter().current_anchor(), Some(marker));
        assert_eq!(
            s.presenter().content().unwrap().translation,
            "Hidden pricing (have to ask)"
        );
        s.interact(&doc, InteractionEvent::Click(marker));
        assert!(!s.presenter().is_visible());

        s.interact(&doc, InteractionEvent::Focus(marker));
        assert!(s.presenter().is_visible());
        s.interact(&doc, InteractionEvent::Blur(marker));
        assert!(!s.presenter().is_visible());

        s.interact(&doc, InteractionEvent::PointerEnter(marker));
        s.interact(&doc, InteractionEvent::Scroll);
        assert!(!s.presenter().is_visible());
    }

    #[test]
    fn hover_respects_show_tooltips() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.activate(&mut doc);
        let marker = s.markers()[0].node;
        let update: InboundMessage = serde_json::from_str(
            r#"{"action": "settingsUpdated", "settings": {"showTooltips": false}}"#,
        )
        .unwrap();
        s.handle_message(&mut doc, update);
        s.interact(&doc, InteractionEvent::PointerEnter(marker));
        assert!(!s.presenter().is_visible());
        s.interact(&doc, InteractionEvent::Click(marker));
        assert!(s.presenter().is_visible());
    }

    #[test]
    fn tooltip_flips_near_bottom_on_resize() {
        let (mut doc, ps) = page(&["Contact Sales"]);
        doc.set_layout(ps[0], Some(Rect::new(0.0, 500.0, 600.0, 20.0)));
        let mut s = scanner();
        s.activate(&mut doc);
        let marker = s.markers()[0].node;
        s.interact(&doc, InteractionEvent::Click(marker));
        assert_eq!(s.presenter().position().unwrap().placement, Placement::Below);
        s.interact(&doc, InteractionEvent::Resize(Viewport::new(800.0, 560.0)));
        assert_eq!(s.presenter().position().unwrap().placement, Placement::Above);
    }

    #[test]
    fn unstyled_markers_when_highlighting_is_off() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let mut s = scanner();
        s.settings.highlight_jargon = false;
        s.activate(&mut doc);
        let data = marker_data(&doc, s.markers()[0].node).unwrap();
        assert_eq!(data.severity, None);
        assert_eq!(s.markers()[0].content.severity, crate::dictionary::Severity::Warning);
    }

    #[test]
    fn excluded_regions_are_left_alone() {
        let (mut doc, _) = page(&["Contact Sales"]);
        let body = doc.body();
        let nav = doc.create_element("nav");
        doc.set_layout(nav, Some(Rect::new(0.0, 0.0, 600.0, 40.0)));
        let t = doc.create_text("Enterprise Pricing");
        doc.append_child(nav, t);
        doc.append_child(body, nav);

        let mut s = scanner();
        let result = s.activate(&mut doc).unwrap();
        assert_eq!(result.translation_count, 1);
        assert_eq!(doc.children(nav).len(), 1);
    }

    #[test]
    fn nested_elements_are_marked_once() {
        let mut doc = Document::new();
        let root = doc.root();
        let body = doc.create_element("body");
        doc.append_child(root, body);
        let div = doc.create_element("div");
        doc.set_layout(div, Some(Rect::new(0.0, 0.0, 600.0, 80.0)));
        doc.append_child(body, div);
        for text in ["Contact Sales", "Per Seat billing"] {
            let p = doc.create_element("p");
            doc.set_layout(p, Some(Rect::new(0.0, 0.0, 600.0, 20.0)));
            let t = doc.create_text(text);
            doc.append_child(p, t);
            doc.append_child(div, p);
        }

        let mut s = scanner();
        let result = s.activate(&mut doc).unwrap();
        assert_eq!(result.translation_count, 2);
        assert_eq!(rewriter::markers(&doc, root).len(), 2);
    }

    #[test]
    fn imported_single_paragraph_page_is_annotated() {
        let mut doc = crate::html::parse_html(
            "<html><body><p>Contact Sales for Enterprise Pricing</p></body></html>",
        );
        let mut s = scanner();
        let result = s.activate(&mut doc).unwrap();
        assert_eq!(result.term_count, 2);
        assert_eq!(result.translation_count, 2);
        assert_eq!(translations(&doc).len(), 2);
    }
}
