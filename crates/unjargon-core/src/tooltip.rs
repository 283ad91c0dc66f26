//! Floating tooltip shown next to a marker.
//!
//! There is one presenter per scanner. It owns no tree nodes: it remembers
//! which marker it is anchored to and where the tooltip box should go, and a
//! host draws it. Positioning keeps the box inside the viewport and flips it
//! above the anchor when there is not enough room below.

use crate::dictionary::Severity;
use crate::dom::{NodeId, Rect};

/// Gap between anchor and tooltip.
pub const ANCHOR_OFFSET: f64 = 8.0;

/// Minimum distance from the left and right viewport edges.
pub const EDGE_MARGIN: f64 = 10.0;

/// Extra room required beyond the tooltip height before flipping.
pub const FLIP_CLEARANCE: f64 = 20.0;

/// Visible area of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Rendered tooltip size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Which side of the anchor the tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Under the anchor (default).
    Below,
    /// Over the anchor.
    Above,
}

/// Computed top-left corner and placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPosition {
    /// Distance from the top viewport edge.
    pub top: f64,
    /// Distance from the left viewport edge.
    pub left: f64,
    /// Side of the anchor.
    pub placement: Placement,
}

/// Place a tooltip of `size` next to `anchor` within `viewport`.
pub fn compute_position(anchor: Rect, size: Size, viewport: Viewport) -> TooltipPosition {
    let centered = anchor.left + anchor.width / 2.0 - size.width / 2.0;
    // A tooltip wider than the viewport pins to the left margin.
    let left = centered
        .min(viewport.width - size.width - EDGE_MARGIN)
        .max(EDGE_MARGIN);

    let space_below = viewport.height - anchor.bottom();
    let space_above = anchor.top;
    let needed = size.height + FLIP_CLEARANCE;
    if space_below < needed && space_above > needed {
        TooltipPosition {
            top: anchor.top - size.height - ANCHOR_OFFSET,
            left,
            placement: Placement::Above,
        }
    } else {
        TooltipPosition {
            top: anchor.bottom() + ANCHOR_OFFSET,
            left,
            placement: Placement::Below,
        }
    }
}

/// What the tooltip says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    /// Page text under the marker.
    pub original: String,
    /// Plain-language replacement.
    pub translation: String,
    /// Longer explanation; not shown when empty.
    pub explanation: String,
    /// Severity styling.
    pub severity: Severity,
}

impl TooltipContent {
    /// Lines of text in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.severity.icon(), self.translation)];
        if !self.explanation.is_empty() {
            lines.push(self.explanation.clone());
        }
        lines
    }

    /// Classes for the tooltip box.
    pub fn classes(&self, placement: Placement) -> Vec<&'static str> {
        let mut classes = vec!["unjargon-tooltip", "visible", self.severity.as_str()];
        if placement == Placement::Above {
            classes.push("tooltip-top");
        }
        classes
    }
}

/// Measures tooltip content before it is positioned.
pub trait MeasureTooltip {
    /// Size the tooltip would have when showing `content`.
    fn measure(&self, content: &TooltipContent) -> Size;
}

/// Size estimate from font metrics, for hosts without a layout engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMetrics {
    /// Maximum box width.
    pub max_width: f64,
    /// Horizontal padding on each side.
    pub padding_x: f64,
    /// Vertical padding on each side.
    pub padding_y: f64,
    /// Font size.
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Average glyph width as a multiple of the font size.
    pub char_width: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            max_width: 320.0,
            padding_x: 20.0,
            padding_y: 16.0,
            font_size: 14.0,
            line_height: 1.5,
            char_width: 0.55,
        }
    }
}

impl MeasureTooltip for EstimatedMetrics {
    fn measure(&self, content: &TooltipContent) -> Size {
        let glyph = self.font_size * self.char_width;
        let inner_max = (self.max_width - 2.0 * self.padding_x).max(glyph);
        let per_line = (inner_max / glyph).floor().max(1.0);

        let mut rows = 0.0;
        let mut widest: f64 = 0.0;
        for line in content.lines() {
            let chars = line.chars().count().max(1) as f64;
            rows += (chars / per_line).ceil();
            widest = widest.max(chars.min(per_line) * glyph);
        }
        Size {
            width: (widest + 2.0 * self.padding_x).min(self.max_width),
            height: rows * self.font_size * self.line_height + 2.0 * self.padding_y,
        }
    }
}

#[derive(Debug, Clone)]
struct Shown {
    anchor: NodeId,
    anchor_rect: Rect,
    content: TooltipContent,
    size: Size,
    position: TooltipPosition,
}

/// The single tooltip instance.
#[derive(Debug, Clone)]
pub struct TooltipPresenter<M = EstimatedMetrics> {
    metrics: M,
    viewport: Viewport,
    shown: Option<Shown>,
}

impl Default for TooltipPresenter {
    fn default() -> Self {
        Self::new(EstimatedMetrics::default(), Viewport::default())
    }
}

impl<M: MeasureTooltip> TooltipPresenter<M> {
    /// Create a hidden presenter.
    pub const fn new(metrics: M, viewport: Viewport) -> Self {
        Self {
            metrics,
            viewport,
            shown: None,
        }
    }

    /// Show `content` anchored to `anchor`, replacing anything shown.
    pub fn show(&mut self, anchor: NodeId, anchor_rect: Rect, content: TooltipContent) {
        let size = self.metrics.measure(&content);
        let position = compute_position(anchor_rect, size, self.viewport);
        tracing::trace!(anchor = %anchor, ?position, "tooltip shown");
        self.shown = Some(Shown {
            anchor,
            anchor_rect,
            content,
            size,
            position,
        });
    }

    /// Hide the tooltip. Returns `false` if it was already hidden.
    pub fn hide(&mut self) -> bool {
        self.shown.take().is_some()
    }

    /// Hide if showing for `anchor`, show otherwise. Returns whether the
    /// tooltip is visible afterwards.
    pub fn toggle(&mut self, anchor: NodeId, anchor_rect: Rect, content: TooltipContent) -> bool {
        if self.current_anchor() == Some(anchor) {
            self.hide();
            false
        } else {
            self.show(anchor, anchor_rect, content);
            true
        }
    }

    /// Scrolling hides the tooltip.
    pub fn on_scroll(&mut self) {
        self.hide();
    }

    /// Update the viewport and reposition a visible tooltip. Pass the
    /// anchor's new box when it moved.
    pub fn on_resize(&mut self, viewport: Viewport, anchor_rect: Option<Rect>) {
        self.viewport = viewport;
        if let Some(shown) = self.shown.as_mut() {
            if let Some(rect) = anchor_rect {
                shown.anchor_rect = rect;
            }
            shown.position = compute_position(shown.anchor_rect, shown.size, viewport);
        }
    }

    /// Returns `true` while the tooltip is shown.
    pub const fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    /// Marker the tooltip is anchored to.
    pub fn current_anchor(&self) -> Option<NodeId> {
        self.shown.as_ref().map(|s| s.anchor)
    }

    /// Current position, when visible.
    pub fn position(&self) -> Option<TooltipPosition> {
        self.shown.as_ref().map(|s| s.position)
    }

    /// Current content, when visible.
    pub fn content(&self) -> Option<&TooltipContent> {
        self.shown.as_ref().map(|s| &s.content)
    }

    /// Current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}
