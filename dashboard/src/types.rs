use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status snapshot served by the bot backend at `GET /api/status`.
///
/// Decoding this struct is the validation step: a body that is missing one of
/// the required fields never reaches the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub bot_status: String,
    pub capital_total: Decimal,
    pub capital_disponible: Decimal,
    #[serde(default)]
    pub capital_inicial: Decimal,
    pub pnl: Decimal,
    pub roi: Decimal,
    pub won: u64,
    pub lost: u64,
    // Exit breakdown counters
    #[serde(default)]
    pub stopped: u64,
    #[serde(default)]
    pub partial1: u64,
    #[serde(default)]
    pub partial2: u64,
    #[serde(default)]
    pub liquidated: u64,
    // Trend tracker counters
    #[serde(default)]
    pub tracked_markets: u64,
    #[serde(default)]
    pub trend_ready: u64,
    #[serde(default)]
    pub scan_count: u64,
    #[serde(default)]
    pub last_price_update: Option<String>,
    #[serde(default = "default_thread_alive")]
    pub price_thread_alive: bool,
    #[serde(default)]
    pub session_start: Option<String>,
    pub capital_history: Vec<CapitalPoint>,
    pub open_positions: Vec<OpenPosition>,
    pub last_opportunities: Vec<Opportunity>,
    pub closed_positions: Vec<ClosedTrade>,
    #[serde(default)]
    pub insights: Option<Insights>,
}

fn default_thread_alive() -> bool {
    true
}

impl StatusPayload {
    pub fn is_running(&self) -> bool {
        self.bot_status == "running"
    }
}

/// One sample of the capital curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalPoint {
    pub time: String,
    pub capital: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    pub question: String,
    pub entry_yes: f64,
    pub current_yes: f64,
    pub allocated: Decimal,
    pub pnl: Decimal,
    /// 0 = open, 1 and 2 = partial exits, 3 = fully closed
    #[serde(default)]
    pub exit_stage: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub entry_time: Option<String>,
}

/// Candidate market still waiting for trend confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub question: String,
    pub yes_price: f64,
    #[serde(default)]
    pub no_price: Option<f64>,
    #[serde(default)]
    pub trend_obs: u32,
    #[serde(default)]
    pub has_trend: bool,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub question: String,
    #[serde(default)]
    pub entry_yes: f64,
    pub allocated: Decimal,
    pub pnl: Decimal,
    pub status: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub entry_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
}

/// Aggregated win-rate statistics. The backend omits this until enough
/// trades have closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub overall_win_rate: f64,
    pub total_trades: u64,
    #[serde(default)]
    pub by_city: Vec<InsightBucket>,
    #[serde(default)]
    pub by_hour: Vec<InsightBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightBucket {
    #[serde(alias = "city", alias = "hour")]
    pub label: BucketLabel,
    pub trades: u64,
    pub win_rate: f64,
}

/// City buckets carry a name, hour buckets carry the UTC entry hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketLabel {
    Hour(i64),
    Name(String),
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLabel::Hour(h) => write!(f, "{h:02}h UTC"),
            BucketLabel::Name(name) => write!(f, "{name}"),
        }
    }
}
