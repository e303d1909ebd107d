use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::{BotApiClient, BotCommand, PollError};
use crate::freshness::PriceClock;
use crate::render::{render_initial, render_status};
use crate::surface::Surface;
use crate::types::StatusPayload;

/// Everything the page shows, plus the bookkeeping needed to keep it
/// consistent with the newest payload.
pub struct DashboardState {
    pub surface: Surface,
    pub clock: PriceClock,
    last_applied: u64,
}

pub type SharedState = Arc<Mutex<DashboardState>>;

impl Default for DashboardState {
    fn default() -> Self {
        let mut state = Self {
            surface: Surface::new(),
            clock: PriceClock::new(),
            last_applied: 0,
        };
        render_initial(&mut state.surface);
        state.tick(Utc::now());
        state
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Applies `payload` if it came from a newer request than the one on
    /// screen. Returns false when the response is discarded as stale.
    pub fn apply(&mut self, seq: u64, payload: &StatusPayload, now: DateTime<Utc>) -> bool {
        if seq <= self.last_applied {
            return false;
        }
        render_status(payload, &mut self.surface);
        self.clock
            .observe(payload.last_price_update.as_deref(), payload.price_thread_alive);
        self.clock.render(now, &mut self.surface);
        self.last_applied = seq;
        true
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.clock.render(now, &mut self.surface);
    }
}

/// Fetches status snapshots and feeds them to the renderer.
pub struct Poller {
    client: BotApiClient,
    state: SharedState,
    next_seq: AtomicU64,
}

impl Poller {
    pub fn new(client: BotApiClient, state: SharedState) -> Self {
        Self {
            client,
            state,
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// One fetch + render. `Ok(false)` means a newer response already won.
    /// The lock is only taken once the payload is in hand.
    pub async fn poll_once(&self) -> Result<bool, PollError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let payload = self.client.fetch_status().await?;

        let mut state = self.state.lock().await;
        let applied = state.apply(seq, &payload, Utc::now());
        if applied {
            debug!(
                "Rendered status #{seq}: {} | {} open | {} closed",
                payload.bot_status,
                payload.open_positions.len(),
                payload.closed_positions.len()
            );
        } else {
            debug!("Discarded status #{seq}, #{} already applied", state.last_applied());
        }
        Ok(applied)
    }

    /// Poll and swallow the error; the previous render stays on screen.
    pub async fn refresh(&self) {
        if let Err(e) = self.poll_once().await {
            warn!("Status poll failed: {e}");
        }
    }

    /// Sends a command, then refreshes without waiting for the next tick.
    pub async fn command(&self, command: BotCommand) {
        info!("Bot command {command} -> {}", self.client.base_url());
        if let Err(e) = self.client.send_command(command).await {
            warn!("Bot command {command} failed: {e}");
        }
        self.refresh().await;
    }

    /// Initial fetch immediately, then one per `interval` until shutdown.
    pub async fn run(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!("Poller started (every {}s)", interval.as_secs_f64());
        self.refresh().await;

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh().await,
                _ = shutdown.changed() => break,
            }
        }
        info!("Poller stopped");
    }
}

/// Re-renders the price badge on its own cadence so it ages between polls.
pub async fn run_freshness_clock(
    state: SharedState,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => state.lock().await.tick(Utc::now()),
            _ = shutdown.changed() => break,
        }
    }
}
