//! Cross-cutting counters fed by the systems each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use grovewatch_core::types::TowerId;

/// Running totals for one game. Keys are ordered so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTelemetry {
    pub shots_fired: u32,
    pub shots_by_tower: BTreeMap<TowerId, u32>,
    pub kills: u32,
    pub kills_by_tower: BTreeMap<TowerId, u32>,
    /// Kills with no tower to credit.
    pub unattributed_kills: u32,
    pub damage_by_tower: BTreeMap<TowerId, f64>,
    pub projectile_hits: u32,
    pub enemies_leaked: u32,
    pub money_earned: u32,
}

impl SimTelemetry {
    pub fn record_shot(&mut self, tower: TowerId) {
        self.shots_fired += 1;
        *self.shots_by_tower.entry(tower).or_default() += 1;
    }

    /// Credit a kill. The tower may already have been sold.
    pub fn record_kill(&mut self, killer: Option<TowerId>) {
        self.kills += 1;
        match killer {
            Some(tower) => *self.kills_by_tower.entry(tower).or_default() += 1,
            None => self.unattributed_kills += 1,
        }
    }

    pub fn record_damage(&mut self, tower: Option<TowerId>, amount: f64) {
        if let Some(tower) = tower {
            if amount > 0.0 {
                *self.damage_by_tower.entry(tower).or_default() += amount;
            }
        }
    }

    pub fn record_hit(&mut self) {
        self.projectile_hits += 1;
    }

    pub fn record_leak(&mut self) {
        self.enemies_leaked += 1;
    }

    pub fn record_reward(&mut self, amount: u32) {
        self.money_earned = self.money_earned.saturating_add(amount);
    }
}
