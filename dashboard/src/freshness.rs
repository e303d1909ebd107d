use chrono::{DateTime, Utc};

use crate::format::parse_timestamp;
use crate::surface::{ids, Surface};

const FRESH_LIMIT_SECS: i64 = 60;
const STALE_LIMIT_SECS: i64 = 120;

pub const FRESHNESS_CLASSES: [&str; 5] = [
    "fresh-none",
    "fresh-dead",
    "fresh-ok",
    "fresh-warn",
    "fresh-stale",
];
pub const PULSE_CLASS: &str = "pulse";

/// Recency of the backend's last price refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    NoData,
    /// Price thread reported dead, whatever the age
    ThreadDead,
    Fresh,
    Aging,
    /// Thread alive but nothing new for two minutes
    Stale,
}

impl Freshness {
    /// Precedence: dead thread, then under 60s, then under 120s, else stale.
    pub fn classify(thread_alive: bool, elapsed_secs: i64) -> Self {
        if !thread_alive {
            Freshness::ThreadDead
        } else if elapsed_secs < FRESH_LIMIT_SECS {
            Freshness::Fresh
        } else if elapsed_secs < STALE_LIMIT_SECS {
            Freshness::Aging
        } else {
            Freshness::Stale
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Freshness::NoData => "fresh-none",
            Freshness::ThreadDead => "fresh-dead",
            Freshness::Fresh => "fresh-ok",
            Freshness::Aging => "fresh-warn",
            Freshness::Stale => "fresh-stale",
        }
    }

    pub fn pulses(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

/// Last price-update state seen in a payload. The poller writes it, the
/// clock tick reads it, so the badge keeps ageing between polls.
#[derive(Debug, Clone)]
pub struct PriceClock {
    last_update: Option<DateTime<Utc>>,
    thread_alive: bool,
}

impl Default for PriceClock {
    fn default() -> Self {
        Self {
            last_update: None,
            thread_alive: true,
        }
    }
}

impl PriceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// An unparseable timestamp counts as never seen.
    pub fn observe(&mut self, last_update: Option<&str>, thread_alive: bool) {
        self.last_update = last_update.and_then(parse_timestamp);
        self.thread_alive = thread_alive;
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Whole seconds since the last update, clamped at zero for clock skew.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_update
            .map(|ts| (now - ts).num_seconds().max(0))
    }

    pub fn state(&self, now: DateTime<Utc>) -> Freshness {
        match self.elapsed_secs(now) {
            None => Freshness::NoData,
            Some(elapsed) => Freshness::classify(self.thread_alive, elapsed),
        }
    }

    pub fn render(&self, now: DateTime<Utc>, surface: &mut Surface) {
        let state = self.state(now);
        let text = match self.elapsed_secs(now) {
            None => "Sin datos".to_string(),
            Some(elapsed) => format!("hace {elapsed}s"),
        };
        surface.set_text(ids::PRICE_BADGE, text);
        surface.set_exclusive_class(ids::PRICE_BADGE, &FRESHNESS_CLASSES, state.class());
        surface.set_class(ids::PRICE_BADGE, PULSE_CLASS, state.pulses());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn clock_seen(ago_secs: i64, alive: bool, now: DateTime<Utc>) -> PriceClock {
        let mut clock = PriceClock::new();
        let ts = (now - Duration::seconds(ago_secs)).to_rfc3339();
        clock.observe(Some(&ts), alive);
        clock
    }

    #[test]
    fn classification_precedence() {
        assert_eq!(Freshness::classify(false, 0), Freshness::ThreadDead);
        assert_eq!(Freshness::classify(false, 500), Freshness::ThreadDead);
        assert_eq!(Freshness::classify(true, 0), Freshness::Fresh);
        assert_eq!(Freshness::classify(true, 59), Freshness::Fresh);
        assert_eq!(Freshness::classify(true, 60), Freshness::Aging);
        assert_eq!(Freshness::classify(true, 119), Freshness::Aging);
        assert_eq!(Freshness::classify(true, 120), Freshness::Stale);
    }

    #[test]
    fn no_timestamp_is_neutral() {
        let mut surface = Surface::new();
        let now = Utc::now();
        PriceClock::new().render(now, &mut surface);
        assert_eq!(surface.text(ids::PRICE_BADGE), Some("Sin datos"));
        assert!(surface.has_class(ids::PRICE_BADGE, "fresh-none"));
        assert!(!surface.has_class(ids::PRICE_BADGE, PULSE_CLASS));
    }

    #[test]
    fn ninety_seconds_is_warning() {
        let now = Utc::now();
        let clock = clock_seen(90, true, now);
        let mut surface = Surface::new();
        clock.render(now, &mut surface);
        assert_eq!(surface.text(ids::PRICE_BADGE), Some("hace 90s"));
        assert!(surface.has_class(ids::PRICE_BADGE, "fresh-warn"));
        assert!(!surface.has_class(ids::PRICE_BADGE, "fresh-ok"));
    }

    #[test]
    fn badge_advances_between_observations() {
        let now = Utc::now();
        let clock = clock_seen(30, true, now);
        let mut surface = Surface::new();

        clock.render(now, &mut surface);
        assert!(surface.has_class(ids::PRICE_BADGE, "fresh-ok"));
        assert!(surface.has_class(ids::PRICE_BADGE, PULSE_CLASS));

        clock.render(now + Duration::seconds(100), &mut surface);
        assert_eq!(surface.text(ids::PRICE_BADGE), Some("hace 130s"));
        assert!(surface.has_class(ids::PRICE_BADGE, "fresh-stale"));
        assert!(!surface.has_class(ids::PRICE_BADGE, "fresh-ok"));
        assert!(!surface.has_class(ids::PRICE_BADGE, PULSE_CLASS));
    }

    #[test]
    fn dead_thread_wins_over_recent_update() {
        let now = Utc::now();
        let clock = clock_seen(5, false, now);
        assert_eq!(clock.state(now), Freshness::ThreadDead);
    }

    #[test]
    fn garbage_timestamp_counts_as_unseen() {
        let mut clock = PriceClock::new();
        clock.observe(Some("not a date"), true);
        assert_eq!(clock.state(Utc::now()), Freshness::NoData);
    }

    #[test]
    fn future_timestamp_clamps_to_zero() {
        let now = Utc::now();
        let clock = clock_seen(-10, true, now);
        assert_eq!(clock.elapsed_secs(now), Some(0));
    }
}
