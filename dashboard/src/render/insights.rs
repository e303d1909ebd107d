use crate::format::{escape_html, percent0};
use crate::surface::{ids, Surface};
use crate::types::{InsightBucket, Insights};

pub const EMPTY_BREAKDOWN: &str = "Sin datos suficientes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRateTier {
    Strong,
    Moderate,
    Weak,
}

impl WinRateTier {
    /// Lower bounds are inclusive: 0.70 is strong, 0.50 is moderate.
    pub fn from_rate(win_rate: f64) -> Self {
        if win_rate >= 0.70 {
            WinRateTier::Strong
        } else if win_rate >= 0.50 {
            WinRateTier::Moderate
        } else {
            WinRateTier::Weak
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            WinRateTier::Strong => "bar-strong",
            WinRateTier::Moderate => "bar-moderate",
            WinRateTier::Weak => "bar-weak",
        }
    }
}

pub fn render_insights(insights: Option<&Insights>, surface: &mut Surface) {
    let Some(insights) = insights else {
        surface.set_hidden(ids::INSIGHTS_PANEL, true);
        return;
    };

    surface.set_hidden(ids::INSIGHTS_PANEL, false);
    surface.set_text(ids::INSIGHTS_WIN_RATE, percent0(insights.overall_win_rate));
    surface.set_text(ids::INSIGHTS_TRADES, format!("{} trades", insights.total_trades));
    surface.set_html(ids::INSIGHTS_BY_CITY, breakdown_html(&insights.by_city));
    surface.set_html(ids::INSIGHTS_BY_HOUR, breakdown_html(&insights.by_hour));
}

fn breakdown_html(buckets: &[InsightBucket]) -> String {
    if buckets.is_empty() {
        return format!("<p class=\"insight-empty\">{EMPTY_BREAKDOWN}</p>");
    }
    buckets.iter().map(bucket_row).collect()
}

fn bucket_row(bucket: &InsightBucket) -> String {
    let width = (bucket.win_rate * 100.0).clamp(0.0, 100.0);
    format!(
        "<div class=\"insight-row\"><span class=\"insight-label\">{label}</span>\
         <span class=\"insight-trades\">{trades}</span>\
         <div class=\"bar-track\"><div class=\"bar {tier}\" style=\"width:{width:.0}%\"></div></div>\
         <span class=\"insight-rate\">{rate}</span></div>",
        label = escape_html(&bucket.label.to_string()),
        trades = bucket.trades,
        tier = WinRateTier::from_rate(bucket.win_rate).class(),
        rate = percent0(bucket.win_rate),
    )
}
