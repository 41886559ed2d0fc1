//! Cooperative scheduler for the live bot.
//!
//! Two decoupled cadences drive the bot: a price tick (new market data) and
//! a decision tick (strategy evaluation + trade), so price updates and
//! decisions need not be synchronized 1:1. The loop owns no timers — the
//! caller drives [`advance`](BotLoop::advance) with a clock, which makes
//! every schedule observable and testable without sleeping.
//!
//! Cancellation is total: after [`stop`](BotLoop::stop), `advance` fires
//! nothing no matter how far the clock moves. Restarting arms both
//! deadlines fresh from the restart instant (no drift compensation).

use super::PaperBot;
use crate::domain::Trade;
use chrono::Utc;
use std::time::{Duration, Instant};

/// Something a tick did.
#[derive(Debug, Clone)]
pub enum BotEvent {
    /// A price tick appended this price.
    Price(f64),
    /// A decision tick executed this trade.
    Trade(Trade),
}

/// The live bot plus its two tick schedules.
#[derive(Debug)]
pub struct BotLoop {
    bot: PaperBot,
    price_period: Duration,
    decision_period: Duration,
    next_price_at: Option<Instant>,
    next_decision_at: Option<Instant>,
}

impl BotLoop {
    /// Default price cadence (one new price per second).
    pub const DEFAULT_PRICE_PERIOD: Duration = Duration::from_secs(1);
    /// Default decision cadence (one evaluation every two seconds).
    pub const DEFAULT_DECISION_PERIOD: Duration = Duration::from_secs(2);

    pub fn new(bot: PaperBot, price_period: Duration, decision_period: Duration) -> Self {
        Self {
            bot,
            price_period,
            decision_period,
            next_price_at: None,
            next_decision_at: None,
        }
    }

    pub fn bot(&self) -> &PaperBot {
        &self.bot
    }

    pub fn bot_mut(&mut self) -> &mut PaperBot {
        &mut self.bot
    }

    pub fn is_running(&self) -> bool {
        self.next_price_at.is_some() || self.next_decision_at.is_some()
    }

    /// Arm both schedules fresh from `now`. Starting while already running
    /// re-arms from scratch.
    pub fn start(&mut self, now: Instant) {
        self.next_price_at = Some(now + self.price_period);
        self.next_decision_at = Some(now + self.decision_period);
    }

    /// Disarm both schedules. Nothing fires until the next `start`.
    pub fn stop(&mut self) {
        self.next_price_at = None;
        self.next_decision_at = None;
    }

    /// Stop and restore the bot to its configured initial state.
    pub fn reset(&mut self) {
        self.stop();
        self.bot.reset();
    }

    /// Fire every tick due at or before `now`, in deadline order; price
    /// ticks win ties so a decision in the same instant sees the fresh
    /// price. Returns the events in firing order.
    pub fn advance(&mut self, now: Instant) -> Vec<BotEvent> {
        let mut events = Vec::new();

        loop {
            let due_price = self.next_price_at.filter(|&at| at <= now);
            let due_decision = self.next_decision_at.filter(|&at| at <= now);

            let fire_price = match (due_price, due_decision) {
                (Some(p), Some(d)) => p <= d,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if fire_price {
                let price = self.bot.price_tick();
                events.push(BotEvent::Price(price));
                self.next_price_at = due_price.map(|at| at + self.price_period);
            } else {
                if let Some(trade) = self.bot.decision_tick(Utc::now()) {
                    events.push(BotEvent::Trade(trade));
                }
                self.next_decision_at = due_decision.map(|at| at + self.decision_period);
            }
        }

        events
    }
}
