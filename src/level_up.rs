//! Level-up detection across evaluations.
//!
//! Each evaluation reads the previously observed XP, overwrites it with the
//! current value, and raises a notification when the resolved level went up.
//! A notification stays pending until it is acknowledged.

use crate::progression::TierTable;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Storage for the last XP value seen by the detector.
pub trait PriorXpStore {
    fn load(&self) -> Option<u64>;
    fn save(&mut self, xp: u64);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorXp(Option<u64>);

impl PriorXp {
    pub fn new(previous: Option<u64>) -> Self {
        Self(previous)
    }
}

impl PriorXpStore for PriorXp {
    fn load(&self) -> Option<u64> {
        self.0
    }

    fn save(&mut self, xp: u64) {
        self.0 = Some(xp);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Notification {
    #[default]
    Idle,
    Notifying {
        level: u32,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelUpOutcome {
    pub leveled_up_to: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelUpDetector {
    notification: Notification,
}

impl LevelUpDetector {
    pub fn notification(&self) -> Notification {
        self.notification
    }

    pub fn pending_level(&self) -> Option<u32> {
        match self.notification {
            Notification::Idle => None,
            Notification::Notifying { level } => Some(level),
        }
    }

    pub fn evaluate<S: PriorXpStore>(
        &mut self,
        tiers: &TierTable,
        current_xp: u64,
        store: &mut S,
    ) -> LevelUpOutcome {
        let previous_xp = store.load().unwrap_or(0);
        let previous_level = tiers.resolve_tier(previous_xp).level;
        let current_level = tiers.resolve_tier(current_xp).level;

        store.save(current_xp);

        // A missing or zero prior value never notifies.
        if current_level > previous_level && previous_xp > 0 {
            info!(previous_level, current_level, current_xp, "level up detected");
            self.notification = Notification::Notifying {
                level: current_level,
            };
            return LevelUpOutcome {
                leveled_up_to: Some(current_level),
            };
        }

        LevelUpOutcome::default()
    }

    pub fn acknowledge<F: FnOnce(u32)>(&mut self, on_level_up: F) -> Option<u32> {
        let level = self.pending_level()?;
        self.notification = Notification::Idle;
        on_level_up(level);
        Some(level)
    }
}
