//! Payload -> surface. Every call rewrites everything it owns, so the
//! surface never mixes data from two payloads.

pub mod chart;
pub mod insights;
pub mod tables;

use crate::format::{local_day_time, money, sign_class, signed_money, signed_percent};
use crate::format::{NEGATIVE_CLASS, POSITIVE_CLASS};
use crate::surface::{ids, Surface};
use crate::types::StatusPayload;
use rust_decimal::Decimal;

const RUN_BADGE_CLASSES: [&str; 2] = ["badge-running", "badge-stopped"];
const SIGN_CLASSES: [&str; 2] = [POSITIVE_CLASS, NEGATIVE_CLASS];

pub fn render_status(payload: &StatusPayload, surface: &mut Surface) {
    render_run_state(payload.is_running(), surface);
    render_metrics(payload, surface);
    chart::render_chart(&payload.capital_history, surface);
    tables::render_positions(&payload.open_positions, surface);
    tables::render_opportunities(&payload.last_opportunities, surface);
    tables::render_closed(&payload.closed_positions, surface);
    insights::render_insights(payload.insights.as_ref(), surface);
}

/// Pre-first-poll state: empty tables with their placeholders, no insights.
pub fn render_initial(surface: &mut Surface) {
    chart::render_chart(&[], surface);
    tables::render_positions(&[], surface);
    tables::render_opportunities(&[], surface);
    tables::render_closed(&[], surface);
    insights::render_insights(None, surface);
}

fn render_run_state(running: bool, surface: &mut Surface) {
    let (text, class) = if running {
        ("Corriendo", "badge-running")
    } else {
        ("Detenido", "badge-stopped")
    };
    surface.set_text(ids::BOT_BADGE, text);
    surface.set_exclusive_class(ids::BOT_BADGE, &RUN_BADGE_CLASSES, class);
    surface.set_class(ids::BOT_DOT, "pulse", running);
    surface.set_hidden(ids::BTN_START, running);
    surface.set_hidden(ids::BTN_STOP, !running);
}

fn render_metrics(p: &StatusPayload, surface: &mut Surface) {
    surface.set_text(ids::CAPITAL_TOTAL, money(p.capital_total));
    surface.set_text(ids::CAPITAL_AVAILABLE, money(p.capital_disponible));
    surface.set_text(ids::CAPITAL_INITIAL, money(p.capital_inicial));

    render_signed(ids::PNL, p.pnl, signed_money(p.pnl), surface);
    render_signed(ids::ROI, p.roi, signed_percent(p.roi), surface);

    let counters = [
        (ids::WON, p.won),
        (ids::LOST, p.lost),
        (ids::STOPPED, p.stopped),
        (ids::PARTIAL_1, p.partial1),
        (ids::PARTIAL_2, p.partial2),
        (ids::LIQUIDATED, p.liquidated),
        (ids::TRACKED_MARKETS, p.tracked_markets),
        (ids::TREND_READY, p.trend_ready),
        (ids::SCAN_COUNT, p.scan_count),
    ];
    for (id, value) in counters {
        surface.set_text(id, value.to_string());
    }

    let session = p
        .session_start
        .as_deref()
        .and_then(local_day_time)
        .unwrap_or_else(|| "—".to_string());
    surface.set_text(ids::SESSION_START, session);
}

fn render_signed(id: &str, value: Decimal, text: String, surface: &mut Surface) {
    surface.set_text(id, text);
    surface.set_exclusive_class(id, &SIGN_CLASSES, sign_class(value));
}
