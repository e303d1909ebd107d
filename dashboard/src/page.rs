//! HTML shell around the surface. Layout and styling live here; all data
//! comes from the surface, already formatted and escaped by the renderer.

use crate::format::escape_html;
use crate::render::chart::chart_svg;
use crate::surface::{ids, Surface};

const REFRESH_SECS: u32 = 1;

const STYLE: &str = r#"
:root{--bg:#0d1117;--card:#161b22;--line:#30363d;--ink:#e6edf3;--muted:#8b949e;--green:#3fb950;--red:#f85149;--amber:#d29922;--blue:#58a6ff;--purple:#bc8cff}
*{box-sizing:border-box}body{margin:0;background:var(--bg);color:var(--ink);font-family:"Inter","Segoe UI",sans-serif;font-size:14px}
.shell{max-width:1400px;margin:0 auto;padding:18px}
header{display:flex;justify-content:space-between;align-items:center;gap:12px;flex-wrap:wrap}
h1{font-size:1.3rem;margin:0}h2{font-size:.95rem;margin:0 0 10px;color:var(--muted);text-transform:uppercase;letter-spacing:.05em}
.controls{display:flex;gap:10px;align-items:center}.controls form{margin:0}
.btn{border:0;border-radius:8px;padding:8px 14px;font-weight:700;cursor:pointer;color:#fff}.btn-start{background:var(--green)}.btn-stop{background:var(--red)}
.badge{padding:4px 10px;border-radius:999px;font-size:.8rem;font-weight:700}
.badge-running{background:rgba(63,185,80,.15);color:var(--green)}.badge-stopped{background:rgba(248,81,73,.15);color:var(--red)}
.dot{display:inline-block;width:10px;height:10px;border-radius:50%;background:var(--muted)}.dot.pulse{background:var(--green);animation:pulse 1.4s infinite}
@keyframes pulse{0%{opacity:1}50%{opacity:.35}100%{opacity:1}}
.fresh-none{background:#21262d;color:var(--muted)}.fresh-ok{background:rgba(63,185,80,.15);color:var(--green)}.fresh-ok.pulse{animation:pulse 1.4s infinite}
.fresh-warn{background:rgba(210,153,34,.15);color:var(--amber)}.fresh-dead,.fresh-stale{background:rgba(248,81,73,.15);color:var(--red)}
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(150px,1fr));gap:12px;margin:16px 0}
.card{background:var(--card);border:1px solid var(--line);border-radius:12px;padding:14px}
.metric-label{color:var(--muted);font-size:.75rem;text-transform:uppercase}.metric-value{font-size:1.35rem;font-weight:700;margin-top:4px}
.positive{color:var(--green)}.negative{color:var(--red)}
.chart{width:100%;height:180px}.chart-line{stroke:var(--blue);stroke-width:2}.chart-label{fill:var(--muted);font-size:10px}
table{width:100%;border-collapse:collapse}th,td{padding:7px 8px;border-bottom:1px solid var(--line);text-align:left}th{color:var(--muted);font-size:.75rem;text-transform:uppercase}
td.question{max-width:420px}.stage-note{font-size:.7rem;color:var(--purple);margin-left:6px}
.stage{font-size:.75rem;padding:2px 8px;border-radius:6px;background:#21262d}.stage-1,.stage-2{color:var(--amber)}.stage-3{color:var(--green)}
tr.in-range{background:rgba(88,166,255,.08)}.trend-up{color:var(--green)}.trend-stable{color:var(--blue)}.trend-pending{color:var(--muted)}
.status{font-size:.75rem;font-weight:700;padding:2px 8px;border-radius:6px}
.status-won{color:var(--green)}.status-partial1{color:var(--blue)}.status-partial2{color:var(--purple)}.status-stopped{color:var(--amber)}.status-lost{color:var(--red)}.status-other{color:var(--muted)}
.empty,.insight-empty{color:var(--muted);font-style:italic;padding:10px 0}
.insights{display:grid;grid-template-columns:1fr 1fr;gap:16px}
.insight-row{display:grid;grid-template-columns:110px 40px 1fr 44px;gap:8px;align-items:center;margin:6px 0}
.bar-track{background:#21262d;border-radius:4px;height:8px}.bar{height:8px;border-radius:4px}
.bar-strong{background:var(--green)}.bar-moderate{background:var(--amber)}.bar-weak{background:var(--red)}
[hidden]{display:none!important}
"#;

/// Opening tag for a surface element: `attrs` (pre-escaped, may be empty),
/// base classes plus whatever the renderer set, and `hidden` when toggled off.
fn open(surface: &Surface, tag: &str, attrs: &str, id: &str, base: &str) -> String {
    let mut classes: Vec<&str> = base.split_whitespace().collect();
    let mut hidden = false;
    if let Some(el) = surface.element(id) {
        classes.extend(el.classes.iter().map(String::as_str));
        hidden = el.hidden;
    }
    let mut out = format!("<{tag}");
    if !attrs.is_empty() {
        out.push(' ');
        out.push_str(attrs);
    }
    out.push_str(&format!(" id=\"{id}\""));
    if !classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
    }
    if hidden {
        out.push_str(" hidden");
    }
    out.push('>');
    out
}

fn content(surface: &Surface, id: &str, fallback: &str) -> String {
    match surface.element(id) {
        Some(el) if el.html.is_some() => el.html.clone().unwrap_or_default(),
        Some(el) if el.text.is_some() => escape_html(el.text.as_deref().unwrap_or_default()),
        _ => escape_html(fallback),
    }
}

fn node(surface: &Surface, tag: &str, id: &str, base: &str, fallback: &str) -> String {
    format!(
        "{}{}</{tag}>",
        open(surface, tag, "", id, base),
        content(surface, id, fallback)
    )
}

fn metric(surface: &Surface, label: &str, id: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"metric-label\">{label}</div>{}</div>",
        node(surface, "div", id, "metric-value", "--")
    )
}

fn command_form(surface: &Surface, id: &str, action: &str, class: &str, label: &str) -> String {
    format!(
        "{}<button class=\"btn {class}\" type=\"submit\">{label}</button></form>",
        open(surface, "form", &format!("method=\"post\" action=\"{action}\""), id, "")
    )
}

fn table(
    surface: &Surface,
    title: &str,
    count_id: &str,
    ids: (&str, &str, &str),
    headers: &[&str],
    empty_text: &str,
) -> String {
    let (table_id, body_id, empty_id) = ids;
    let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
    format!(
        "<section class=\"card\"><h2>{title} ({count})</h2>{table_open}<thead><tr>{head}</tr></thead>\
         {body}</table>{empty}</section>",
        count = content(surface, count_id, "0"),
        table_open = open(surface, "table", "", table_id, ""),
        body = node(surface, "tbody", body_id, "", ""),
        empty = node(surface, "p", empty_id, "empty", empty_text),
    )
}

pub fn render_document(surface: &Surface) -> String {
    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\">");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    out.push_str(&format!("<meta http-equiv=\"refresh\" content=\"{REFRESH_SECS}\">"));
    out.push_str("<title>Momentum YES · Dashboard</title><style>");
    out.push_str(STYLE);
    out.push_str("</style></head><body><main class=\"shell\">");

    // Header: run state, price freshness, controls
    out.push_str("<header><div class=\"controls\">");
    out.push_str(&node(surface, "span", ids::BOT_DOT, "dot", ""));
    out.push_str("<h1>Momentum YES</h1>");
    out.push_str(&node(surface, "span", ids::BOT_BADGE, "badge", "Cargando…"));
    out.push_str("<span class=\"metric-label\">Precios</span>");
    out.push_str(&node(surface, "span", ids::PRICE_BADGE, "badge", "Sin datos"));
    out.push_str("</div><div class=\"controls\">");
    out.push_str(&command_form(surface, ids::BTN_START, "/bot/start", "btn-start", "Iniciar"));
    out.push_str(&command_form(surface, ids::BTN_STOP, "/bot/stop", "btn-stop", "Detener"));
    out.push_str("</div></header>");

    out.push_str("<div class=\"grid\">");
    for (label, id) in [
        ("Capital total", ids::CAPITAL_TOTAL),
        ("Disponible", ids::CAPITAL_AVAILABLE),
        ("Capital inicial", ids::CAPITAL_INITIAL),
        ("P&amp;L", ids::PNL),
        ("ROI", ids::ROI),
        ("Ganadas", ids::WON),
        ("Perdidas", ids::LOST),
    ] {
        out.push_str(&metric(surface, label, id));
    }
    out.push_str("</div><div class=\"grid\">");
    for (label, id) in [
        ("Stop loss", ids::STOPPED),
        ("Tramo 1", ids::PARTIAL_1),
        ("Tramo 2", ids::PARTIAL_2),
        ("Liquidadas", ids::LIQUIDATED),
        ("Mercados", ids::TRACKED_MARKETS),
        ("Con tendencia", ids::TREND_READY),
        ("Escaneos", ids::SCAN_COUNT),
        ("Sesión", ids::SESSION_START),
    ] {
        out.push_str(&metric(surface, label, id));
    }
    out.push_str("</div>");

    out.push_str("<section class=\"card\"><h2>Capital</h2>");
    out.push_str(&chart_svg(&surface.chart));
    out.push_str("</section>");

    out.push_str(&table(
        surface,
        "Posiciones abiertas",
        ids::POSITIONS_COUNT,
        (ids::POSITIONS_TABLE, ids::POSITIONS_BODY, ids::POSITIONS_EMPTY),
        &["Mercado", "Ciudad", "Hora", "Entrada", "Actual", "Asignado", "P&amp;L", "Tramo"],
        "Sin posiciones abiertas",
    ));
    out.push_str(&table(
        surface,
        "Oportunidades",
        ids::OPPORTUNITIES_COUNT,
        (ids::OPPORTUNITIES_TABLE, ids::OPPORTUNITIES_BODY, ids::OPPORTUNITIES_EMPTY),
        &["Mercado", "YES", "NO", "Tendencia", "Volumen"],
        "Sin oportunidades",
    ));
    out.push_str(&table(
        surface,
        "Operaciones cerradas",
        ids::CLOSED_COUNT,
        (ids::CLOSED_TABLE, ids::CLOSED_BODY, ids::CLOSED_EMPTY),
        &["Mercado", "Entrada", "Asignado", "P&amp;L", "Estado", "Resolución", "Apertura", "Cierre"],
        "Sin operaciones cerradas",
    ));

    out.push_str(&open(surface, "section", "", ids::INSIGHTS_PANEL, "card"));
    out.push_str("<h2>Aprendizaje</h2><p>Win rate ");
    out.push_str(&node(surface, "b", ids::INSIGHTS_WIN_RATE, "", "--"));
    out.push_str(" · ");
    out.push_str(&node(surface, "span", ids::INSIGHTS_TRADES, "", ""));
    out.push_str("</p><div class=\"insights\"><div><h2>Por ciudad</h2>");
    out.push_str(&node(surface, "div", ids::INSIGHTS_BY_CITY, "", ""));
    out.push_str("</div><div><h2>Por hora</h2>");
    out.push_str(&node(surface, "div", ids::INSIGHTS_BY_HOUR, "", ""));
    out.push_str("</div></div></section>");

    out.push_str("</main></body></html>\n");
    out
}
