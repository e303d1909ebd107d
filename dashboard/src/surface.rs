//! Retained element tree the renderer writes into.
//!
//! Each element is addressed by id and carries the same mutable aspects a
//! browser script would touch: text content, inner markup, class list and
//! visibility. The page shell reads it back when serving `/`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Element ids shared by the renderer, the freshness clock and the page shell.
pub mod ids {
    pub const BOT_BADGE: &str = "bot-badge";
    pub const BOT_DOT: &str = "bot-dot";
    pub const BTN_START: &str = "btn-start";
    pub const BTN_STOP: &str = "btn-stop";

    pub const CAPITAL_TOTAL: &str = "capital-total";
    pub const CAPITAL_AVAILABLE: &str = "capital-disponible";
    pub const CAPITAL_INITIAL: &str = "capital-inicial";
    pub const PNL: &str = "pnl";
    pub const ROI: &str = "roi";
    pub const WON: &str = "won";
    pub const LOST: &str = "lost";
    pub const STOPPED: &str = "stopped";
    pub const PARTIAL_1: &str = "partial1";
    pub const PARTIAL_2: &str = "partial2";
    pub const LIQUIDATED: &str = "liquidated";
    pub const TRACKED_MARKETS: &str = "tracked-markets";
    pub const TREND_READY: &str = "trend-ready";
    pub const SCAN_COUNT: &str = "scan-count";
    pub const SESSION_START: &str = "session-start";

    pub const PRICE_BADGE: &str = "price-badge";

    pub const POSITIONS_TABLE: &str = "positions-table";
    pub const POSITIONS_BODY: &str = "positions-body";
    pub const POSITIONS_EMPTY: &str = "positions-empty";
    pub const POSITIONS_COUNT: &str = "positions-count";

    pub const OPPORTUNITIES_TABLE: &str = "opportunities-table";
    pub const OPPORTUNITIES_BODY: &str = "opportunities-body";
    pub const OPPORTUNITIES_EMPTY: &str = "opportunities-empty";
    pub const OPPORTUNITIES_COUNT: &str = "opportunities-count";

    pub const CLOSED_TABLE: &str = "closed-table";
    pub const CLOSED_BODY: &str = "closed-body";
    pub const CLOSED_EMPTY: &str = "closed-empty";
    pub const CLOSED_COUNT: &str = "closed-count";

    pub const INSIGHTS_PANEL: &str = "insights-panel";
    pub const INSIGHTS_WIN_RATE: &str = "insights-win-rate";
    pub const INSIGHTS_TRADES: &str = "insights-trades";
    pub const INSIGHTS_BY_CITY: &str = "insights-by-city";
    pub const INSIGHTS_BY_HOUR: &str = "insights-by-hour";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub text: Option<String>,
    /// Pre-escaped markup. Wins over `text` when both are set.
    pub html: Option<String>,
    pub classes: BTreeSet<String>,
    pub hidden: bool,
}

/// Capital curve as handed to the chart: labels and values are parallel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Surface {
    elements: BTreeMap<String, Element>,
    pub chart: ChartSeries,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    fn entry(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        let el = self.entry(id);
        el.html = None;
        el.text = Some(text.into());
    }

    pub fn set_html(&mut self, id: &str, html: impl Into<String>) {
        let el = self.entry(id);
        el.text = None;
        el.html = Some(html.into());
    }

    pub fn set_class(&mut self, id: &str, class: &str, on: bool) {
        let el = self.entry(id);
        if on {
            el.classes.insert(class.to_string());
        } else {
            el.classes.remove(class);
        }
    }

    /// Turns on exactly one class of a mutually exclusive group.
    pub fn set_exclusive_class(&mut self, id: &str, group: &[&str], active: &str) {
        for class in group {
            self.set_class(id, class, *class == active);
        }
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) {
        self.entry(id).hidden = hidden;
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.text.as_deref())
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.html.as_deref())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.classes.contains(class))
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.element(id).is_some_and(|el| el.hidden)
    }
}
