//! Player economy: a single currency balance for the session.
//!
//! # Invariants
//! - Every mutation of the balance produces exactly one [`StatsEvent`].
//! - The balance is never clamped here; callers that must not overdraw check
//!   [`PlayerStats::can_afford`] first.

use serde::{Deserialize, Serialize};

/// Balance a new session starts with unless configured otherwise.
pub const DEFAULT_START_MONEY: i64 = 10;

/// Notification emitted whenever the balance changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsEvent {
    MoneyChanged { balance: i64, delta: i64 },
}

/// Mutable currency store for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    money: i64,
    #[serde(skip)]
    events: Vec<StatsEvent>,
}

impl PlayerStats {
    /// Create a store holding `start_money`. Announces the starting balance once.
    pub fn new(start_money: i64) -> Self {
        Self {
            money: start_money,
            events: vec![StatsEvent::MoneyChanged {
                balance: start_money,
                delta: 0,
            }],
        }
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.money >= cost
    }

    /// Add `delta` (negative to spend). The balance may go below zero.
    pub fn add_money(&mut self, delta: i64) {
        self.money = self.money.saturating_add(delta);
        tracing::debug!(delta, balance = self.money, "money changed");
        self.events.push(StatsEvent::MoneyChanged {
            balance: self.money,
            delta,
        });
    }

    /// Drain and return pending notifications.
    pub fn drain_events(&mut self) -> Vec<StatsEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[StatsEvent] {
        &self.events
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(DEFAULT_START_MONEY)
    }
}
