use crate::format::{escape_html, local_hhmm};
use crate::surface::{ChartSeries, Surface};
use crate::types::CapitalPoint;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 180.0;
const PAD: f64 = 24.0;

/// Rebuilds the capital series in payload order. No sorting.
pub fn build_series(history: &[CapitalPoint]) -> ChartSeries {
    ChartSeries {
        labels: history.iter().map(|p| local_hhmm(&p.time)).collect(),
        values: history.iter().map(|p| p.capital).collect(),
    }
}

pub fn render_chart(history: &[CapitalPoint], surface: &mut Surface) {
    surface.chart = build_series(history);
}

/// Inline SVG line for the page shell. Empty series gives an empty frame.
pub fn chart_svg(series: &ChartSeries) -> String {
    let mut out = format!(
        "<svg id=\"capital-chart\" class=\"chart\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" \
         preserveAspectRatio=\"none\" role=\"img\" aria-label=\"Capital\">"
    );
    if series.is_empty() {
        out.push_str("</svg>");
        return out;
    }

    let (min, max) = series
        .values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = if max > min { max - min } else { 1.0 };
    let n = series.values.len();
    let x_at = |i: usize| {
        if n == 1 {
            WIDTH / 2.0
        } else {
            PAD + (WIDTH - 2.0 * PAD) * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: f64| HEIGHT - PAD - (HEIGHT - 2.0 * PAD) * (v - min) / span;

    let points: Vec<String> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
        .collect();
    out.push_str(&format!(
        "<polyline class=\"chart-line\" fill=\"none\" points=\"{}\"/>",
        points.join(" ")
    ));

    // Time labels at first, middle and last points
    let mut label_idx = vec![0, n / 2, n - 1];
    label_idx.dedup();
    for i in label_idx {
        out.push_str(&format!(
            "<text class=\"chart-label\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>",
            x_at(i),
            HEIGHT - 4.0,
            escape_html(&series.labels[i])
        ));
    }
    out.push_str(&format!(
        "<text class=\"chart-label\" x=\"4\" y=\"{:.1}\">{:.2}</text>\
         <text class=\"chart-label\" x=\"4\" y=\"{:.1}\">{:.2}</text></svg>",
        PAD - 6.0,
        max,
        HEIGHT - PAD - 6.0,
        min
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str, capital: f64) -> CapitalPoint {
        CapitalPoint {
            time: time.to_string(),
            capital,
        }
    }

    #[test]
    fn series_keeps_payload_order() {
        let history = vec![
            point("2026-03-01T15:00:00+00:00", 103.5),
            point("2026-03-01T14:00:00+00:00", 100.0),
            point("bad", 101.0),
        ];
        let series = build_series(&history);
        assert_eq!(series.values, vec![103.5, 100.0, 101.0]);
        assert_eq!(series.labels.len(), 3);
        assert_eq!(series.labels[0], local_hhmm("2026-03-01T15:00:00+00:00"));
        assert_eq!(series.labels[2], "--:--");
    }

    #[test]
    fn empty_history_is_blank_chart() {
        let mut surface = Surface::new();
        surface.chart = build_series(&[point("2026-03-01T15:00:00+00:00", 1.0)]);
        render_chart(&[], &mut surface);
        assert!(surface.chart.is_empty());
        assert!(!chart_svg(&surface.chart).contains("polyline"));
    }

    #[test]
    fn flat_single_point_series_renders() {
        let series = build_series(&[point("2026-03-01T15:00:00+00:00", 100.0)]);
        let svg = chart_svg(&series);
        assert!(svg.contains("points=\"320.0,156.0\""));
        assert_eq!(svg.matches("text-anchor").count(), 1);
    }
}
