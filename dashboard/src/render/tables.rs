use std::borrow::Cow;

use crate::format::{cents, escape_html, fixed2, grouped, local_hhmm, sign_class, signed_money};
use crate::surface::{ids, Surface};
use crate::types::{ClosedTrade, OpenPosition, Opportunity};

const STAGE_LABELS: [&str; 4] = ["Abierta", "1/3 vendido", "2/3 vendido", "Cerrada"];

/// Entry band for YES. Fixed heuristic, not tied to the bot's config.
pub const ENTRY_BAND_MIN: f64 = 0.22;
pub const ENTRY_BAND_MAX: f64 = 0.27;
pub const STABLE_MIN_OBSERVATIONS: u32 = 4;

struct TableIds {
    table: &'static str,
    body: &'static str,
    empty: &'static str,
    count: &'static str,
}

const POSITIONS: TableIds = TableIds {
    table: ids::POSITIONS_TABLE,
    body: ids::POSITIONS_BODY,
    empty: ids::POSITIONS_EMPTY,
    count: ids::POSITIONS_COUNT,
};
const OPPORTUNITIES: TableIds = TableIds {
    table: ids::OPPORTUNITIES_TABLE,
    body: ids::OPPORTUNITIES_BODY,
    empty: ids::OPPORTUNITIES_EMPTY,
    count: ids::OPPORTUNITIES_COUNT,
};
const CLOSED: TableIds = TableIds {
    table: ids::CLOSED_TABLE,
    body: ids::CLOSED_BODY,
    empty: ids::CLOSED_EMPTY,
    count: ids::CLOSED_COUNT,
};

// ── Classification ──

/// Label for an exit stage; anything outside 0..=3 shows the raw number.
pub fn stage_label(stage: i64) -> Cow<'static, str> {
    usize::try_from(stage)
        .ok()
        .and_then(|i| STAGE_LABELS.get(i))
        .map(|label| Cow::Borrowed(*label))
        .unwrap_or_else(|| Cow::Owned(stage.to_string()))
}

/// Inclusive at both ends.
pub fn in_range(yes_price: f64) -> bool {
    (ENTRY_BAND_MIN..=ENTRY_BAND_MAX).contains(&yes_price)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Stable,
    Pending,
}

impl Trend {
    pub fn classify(has_trend: bool, observations: u32) -> Self {
        if has_trend {
            Trend::Rising
        } else if observations >= STABLE_MIN_OBSERVATIONS {
            Trend::Stable
        } else {
            Trend::Pending
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Trend::Rising => "▲",
            Trend::Stable => "●",
            Trend::Pending => "○",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Trend::Rising => "trend-up",
            Trend::Stable => "trend-stable",
            Trend::Pending => "trend-pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedStatus {
    Won,
    Partial1,
    Partial2,
    Stopped,
    Lost,
    Other,
}

impl ClosedStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "WON" => ClosedStatus::Won,
            "PARTIAL_1" => ClosedStatus::Partial1,
            "PARTIAL_2" => ClosedStatus::Partial2,
            "STOPPED" => ClosedStatus::Stopped,
            "LOST" => ClosedStatus::Lost,
            _ => ClosedStatus::Other,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ClosedStatus::Won => "status-won",
            ClosedStatus::Partial1 => "status-partial1",
            ClosedStatus::Partial2 => "status-partial2",
            ClosedStatus::Stopped => "status-stopped",
            ClosedStatus::Lost => "status-lost",
            ClosedStatus::Other => "status-other",
        }
    }
}

/// Local `HH:MM` for an optional backend timestamp.
fn time_cell(raw: Option<&str>) -> String {
    raw.map(local_hhmm).unwrap_or_else(|| "--:--".to_string())
}

// ── Tables ──

/// Body and placeholder are toggled together: exactly one is visible.
fn fill_table(surface: &mut Surface, table: &TableIds, rows: Vec<String>) {
    let empty = rows.is_empty();
    surface.set_text(table.count, rows.len().to_string());
    surface.set_html(table.body, rows.concat());
    surface.set_hidden(table.table, empty);
    surface.set_hidden(table.empty, !empty);
}

pub fn render_positions(positions: &[OpenPosition], surface: &mut Surface) {
    let rows = positions.iter().map(position_row).collect();
    fill_table(surface, &POSITIONS, rows);
}

fn position_row(pos: &OpenPosition) -> String {
    let stage = pos.exit_stage.unwrap_or(0);
    let label = escape_html(&stage_label(stage));
    let mut question = escape_html(&pos.question);
    if stage > 0 {
        question.push_str(&format!(" <span class=\"stage-note\">{label}</span>"));
    }
    let city = pos
        .city
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(escape_html)
        .unwrap_or_default();

    format!(
        "<tr><td class=\"question\">{question}</td><td>{city}</td><td>{opened}</td><td>{entry}</td><td>{current}</td>\
         <td>${allocated}</td><td class=\"{pnl_class}\">{pnl}</td>\
         <td><span class=\"stage stage-{stage_class}\">{label}</span></td></tr>",
        opened = time_cell(pos.entry_time.as_deref()),
        entry = cents(pos.entry_yes),
        current = cents(pos.current_yes),
        allocated = fixed2(pos.allocated),
        pnl_class = sign_class(pos.pnl),
        pnl = signed_money(pos.pnl),
        stage_class = if (0..=3).contains(&stage) { stage.to_string() } else { "x".to_string() },
    )
}

pub fn render_opportunities(opportunities: &[Opportunity], surface: &mut Surface) {
    let rows = opportunities.iter().map(opportunity_row).collect();
    fill_table(surface, &OPPORTUNITIES, rows);
}

fn opportunity_row(opp: &Opportunity) -> String {
    let highlighted = in_range(opp.yes_price);
    let trend = Trend::classify(opp.has_trend, opp.trend_obs);
    let price = if highlighted {
        format!("<b>{}</b>", cents(opp.yes_price))
    } else {
        cents(opp.yes_price)
    };
    let row_class = if highlighted { " class=\"in-range\"" } else { "" };

    format!(
        "<tr{row_class}><td class=\"question\">{question}</td><td>{price}</td><td>{no}</td>\
         <td class=\"{trend_class}\">{icon} {obs} obs</td><td>${volume}</td></tr>",
        question = escape_html(&opp.question),
        no = opp.no_price.map(cents).unwrap_or_else(|| "—".to_string()),
        trend_class = trend.class(),
        icon = trend.icon(),
        obs = opp.trend_obs,
        volume = grouped(opp.volume.unwrap_or(0.0)),
    )
}

pub fn render_closed(trades: &[ClosedTrade], surface: &mut Surface) {
    let rows = trades.iter().map(closed_row).collect();
    fill_table(surface, &CLOSED, rows);
}

fn closed_row(trade: &ClosedTrade) -> String {
    let status = ClosedStatus::parse(&trade.status);
    let resolution = trade
        .resolution
        .as_deref()
        .filter(|r| !r.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "—".to_string());

    format!(
        "<tr><td class=\"question\">{question}</td><td>{entry}</td><td>${allocated}</td>\
         <td class=\"{pnl_class}\">{pnl}</td><td><span class=\"status {status_class}\">{status_text}</span></td>\
         <td class=\"resolution\">{resolution}</td><td>{opened}</td><td>{closed}</td></tr>",
        question = escape_html(&trade.question),
        entry = cents(trade.entry_yes),
        allocated = fixed2(trade.allocated),
        pnl_class = sign_class(trade.pnl),
        pnl = signed_money(trade.pnl),
        status_class = status.class(),
        status_text = escape_html(&trade.status),
        opened = time_cell(trade.entry_time.as_deref()),
        closed = time_cell(trade.close_time.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::payload_with;
    use serde_json::json;

    fn position(question: &str, stage: serde_json::Value) -> serde_json::Value {
        json!({
            "question": question,
            "entry_yes": 0.24,
            "current_yes": 0.31,
            "allocated": 5.0,
            "pnl": 1.46,
            "exit_stage": stage
        })
    }

    #[test]
    fn stage_labels() {
        assert_eq!(stage_label(0), "Abierta");
        assert_eq!(stage_label(1), "1/3 vendido");
        assert_eq!(stage_label(2), "2/3 vendido");
        assert_eq!(stage_label(3), "Cerrada");
        assert_eq!(stage_label(4), "4");
        assert_eq!(stage_label(-1), "-1");
    }

    #[test]
    fn entry_band_is_inclusive() {
        assert!(in_range(0.22));
        assert!(in_range(0.245));
        assert!(in_range(0.27));
        assert!(!in_range(0.2199));
        assert!(!in_range(0.2701));
    }

    #[test]
    fn trend_precedence() {
        assert_eq!(Trend::classify(true, 0), Trend::Rising);
        assert_eq!(Trend::classify(false, 4), Trend::Stable);
        assert_eq!(Trend::classify(false, 3), Trend::Pending);
    }

    #[test]
    fn closed_status_mapping() {
        let known = [
            ("WON", "status-won"),
            ("PARTIAL_1", "status-partial1"),
            ("PARTIAL_2", "status-partial2"),
            ("STOPPED", "status-stopped"),
            ("LOST", "status-lost"),
        ];
        for (raw, class) in known {
            assert_eq!(ClosedStatus::parse(raw).class(), class);
        }
        assert_eq!(ClosedStatus::parse("LIQUIDATED"), ClosedStatus::Other);
        assert_eq!(ClosedStatus::parse("won"), ClosedStatus::Other);
    }

    #[test]
    fn empty_lists_show_placeholders_only() {
        let mut surface = Surface::new();
        let payload = payload_with(json!({}));
        render_positions(&payload.open_positions, &mut surface);
        render_opportunities(&payload.last_opportunities, &mut surface);
        render_closed(&payload.closed_positions, &mut surface);

        for t in [&POSITIONS, &OPPORTUNITIES, &CLOSED] {
            assert_eq!(surface.html(t.body), Some(""));
            assert!(surface.is_hidden(t.table));
            assert!(!surface.is_hidden(t.empty));
            assert_eq!(surface.text(t.count), Some("0"));
        }
    }

    #[test]
    fn refilled_table_hides_placeholder_again() {
        let mut surface = Surface::new();
        render_positions(&[], &mut surface);
        let payload = payload_with(json!({ "open_positions": [position("Rain?", json!(0))] }));
        render_positions(&payload.open_positions, &mut surface);

        assert!(!surface.is_hidden(ids::POSITIONS_TABLE));
        assert!(surface.is_hidden(ids::POSITIONS_EMPTY));
        assert_eq!(surface.text(ids::POSITIONS_COUNT), Some("1"));
    }

    #[test]
    fn position_rows_annotate_partial_exits() {
        let payload = payload_with(json!({
            "open_positions": [
                position("Open one", json!(null)),
                position("Half sold", json!(1)),
                position("Odd stage", json!(9))
            ]
        }));
        let mut surface = Surface::new();
        render_positions(&payload.open_positions, &mut surface);
        let html = surface.html(ids::POSITIONS_BODY).unwrap_or_default();

        assert!(html.contains("Open one</td>"));
        assert!(html.contains("Half sold <span class=\"stage-note\">1/3 vendido</span>"));
        assert!(html.contains("<span class=\"stage stage-0\">Abierta</span>"));
        assert!(html.contains("<span class=\"stage stage-x\">9</span>"));
        assert!(html.contains("+$1.46"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn question_text_is_escaped() {
        let payload = payload_with(json!({
            "open_positions": [position("<script>&</script>", json!(0))],
            "closed_positions": [{
                "question": "<script>&</script>",
                "entry_yes": 0.25,
                "allocated": 4.0,
                "pnl": -0.8,
                "status": "STOPPED",
                "resolution": "<b>stop</b>",
                "close_time": "2026-03-01T14:05:00+00:00"
            }],
            "last_opportunities": [
                { "question": "<script>&</script>", "yes_price": 0.24, "trend_obs": 1 }
            ]
        }));
        let mut surface = Surface::new();
        render_positions(&payload.open_positions, &mut surface);
        render_closed(&payload.closed_positions, &mut surface);
        render_opportunities(&payload.last_opportunities, &mut surface);

        for id in [ids::POSITIONS_BODY, ids::CLOSED_BODY, ids::OPPORTUNITIES_BODY] {
            let html = surface.html(id).unwrap_or_default();
            assert!(html.contains("&lt;script&gt;&amp;&lt;/script&gt;"));
            assert!(!html.contains("<script>"));
        }
        let closed = surface.html(ids::CLOSED_BODY).unwrap_or_default();
        assert!(closed.contains("&lt;b&gt;stop&lt;/b&gt;"));
    }

    #[test]
    fn opportunities_highlight_entry_band() {
        let payload = payload_with(json!({
            "last_opportunities": [
                { "question": "In band", "yes_price": 0.25, "trend_obs": 2, "has_trend": true, "volume": 15230.4 },
                { "question": "Too cheap", "yes_price": 0.12, "trend_obs": 5, "has_trend": false }
            ]
        }));
        let mut surface = Surface::new();
        render_opportunities(&payload.last_opportunities, &mut surface);
        let html = surface.html(ids::OPPORTUNITIES_BODY).unwrap_or_default();

        assert!(html.contains("<tr class=\"in-range\"><td class=\"question\">In band</td><td><b>25.0¢</b></td>"));
        assert!(html.contains("<td class=\"trend-up\">▲ 2 obs</td><td>$15,230</td>"));
        assert!(html.contains("<tr><td class=\"question\">Too cheap</td><td>12.0¢</td>"));
        assert!(html.contains("<td class=\"trend-stable\">● 5 obs</td><td>$0</td>"));
    }

    #[test]
    fn opportunity_no_price_column() {
        let payload = payload_with(json!({
            "last_opportunities": [
                { "question": "Priced", "yes_price": 0.24, "no_price": 0.765 },
                { "question": "Unpriced", "yes_price": 0.24 }
            ]
        }));
        let mut surface = Surface::new();
        render_opportunities(&payload.last_opportunities, &mut surface);
        let html = surface.html(ids::OPPORTUNITIES_BODY).unwrap_or_default();

        assert!(html.contains("Priced</td><td><b>24.0¢</b></td><td>76.5¢</td>"));
        assert!(html.contains("Unpriced</td><td><b>24.0¢</b></td><td>—</td>"));
    }

    #[test]
    fn entry_and_close_times_render_local() {
        let opened = "2026-03-01T09:30:00+00:00";
        let closed = "2026-03-01T14:05:00+00:00";
        let mut pos = position("Timed", json!(0));
        pos["entry_time"] = json!(opened);
        pos["city"] = json!("Miami");
        let payload = payload_with(json!({
            "open_positions": [pos, position("Untimed", json!(0))],
            "closed_positions": [{
                "question": "Done",
                "allocated": 2.0,
                "pnl": 0.4,
                "status": "WON",
                "entry_time": opened,
                "close_time": closed
            }]
        }));
        let mut surface = Surface::new();
        render_positions(&payload.open_positions, &mut surface);
        render_closed(&payload.closed_positions, &mut surface);

        let positions = surface.html(ids::POSITIONS_BODY).unwrap_or_default();
        assert!(positions.contains(&format!("<td>Miami</td><td>{}</td>", local_hhmm(opened))));
        assert!(positions.contains("Untimed</td><td></td><td>--:--</td>"));

        let trades = surface.html(ids::CLOSED_BODY).unwrap_or_default();
        assert!(trades.contains(&format!(
            "<td>{}</td><td>{}</td></tr>",
            local_hhmm(opened),
            local_hhmm(closed)
        )));
    }

    #[test]
    fn unknown_status_keeps_raw_text() {
        let payload = payload_with(json!({
            "closed_positions": [{
                "question": "Liquidated one",
                "allocated": 3.0,
                "pnl": -0.5,
                "status": "LIQUIDATED",
                "resolution": null
            }]
        }));
        let mut surface = Surface::new();
        render_closed(&payload.closed_positions, &mut surface);
        let html = surface.html(ids::CLOSED_BODY).unwrap_or_default();

        assert!(html.contains("<span class=\"status status-other\">LIQUIDATED</span>"));
        assert!(html.contains("<td class=\"resolution\">—</td>"));
        assert!(html.contains("<td>--:--</td>"));
        assert!(html.contains("$-0.50"));
    }
}
