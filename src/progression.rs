//! Tier table and the pure XP -> level helpers built on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub level: u32,
    pub name: String,
    pub xp_threshold: u64,
    pub unlock: String,
}

impl Tier {
    pub fn new(level: u32, name: &str, xp_threshold: u64, unlock: &str) -> Self {
        Self {
            level,
            name: name.to_string(),
            xp_threshold,
            unlock: unlock.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierTableError {
    #[error("tier table is empty")]
    Empty,

    #[error("first tier must start at 0 XP, found {0}")]
    NonZeroStart(u64),

    #[error("tier {level} threshold {threshold} does not exceed the previous threshold {previous}")]
    NotAscending {
        level: u32,
        previous: u64,
        threshold: u64,
    },

    #[error("tier at position {position} has level {found}, expected {expected}")]
    LevelGap {
        position: usize,
        expected: u32,
        found: u32,
    },
}

/// Ordered, validated list of tiers. Levels run 1..=N with strictly
/// increasing thresholds starting at 0.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percent: u8,
    pub xp_remaining: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub xp: u64,
    pub tier: Tier,
    pub next_tier: Option<Tier>,
    pub percent: u8,
    pub xp_to_next: u64,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierTableError> {
        let first = tiers.first().ok_or(TierTableError::Empty)?;
        if first.xp_threshold != 0 {
            return Err(TierTableError::NonZeroStart(first.xp_threshold));
        }

        for (position, tier) in tiers.iter().enumerate() {
            let expected = position as u32 + 1;
            if tier.level != expected {
                return Err(TierTableError::LevelGap {
                    position,
                    expected,
                    found: tier.level,
                });
            }
        }

        for pair in tiers.windows(2) {
            if pair[1].xp_threshold <= pair[0].xp_threshold {
                return Err(TierTableError::NotAscending {
                    level: pair[1].level,
                    previous: pair[0].xp_threshold,
                    threshold: pair[1].xp_threshold,
                });
            }
        }

        Ok(Self { tiers })
    }

    pub fn standard() -> Result<Self, TierTableError> {
        Self::new(vec![
            Tier::new(1, "Awakening", 0, "Basic Features"),
            Tier::new(2, "Seeker", 100, "Goal Templates"),
            Tier::new(3, "Apprentice", 300, "Custom Rituals"),
            Tier::new(4, "Journeyman", 600, "Advanced Analytics"),
            Tier::new(5, "Adept", 1000, "AI Memory"),
            Tier::new(6, "Expert", 1500, "Mentor Customization"),
            Tier::new(7, "Master", 2500, "Weekly Challenges"),
            Tier::new(8, "Sage", 4000, "Exclusive Wisdom"),
            Tier::new(9, "Champion", 6000, "Achievement Badges"),
            Tier::new(10, "Legend", 10000, "Legend Status"),
        ])
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let tiers: Vec<Tier> = serde_json::from_slice(bytes)?;
        Ok(Self::new(tiers)?)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn first(&self) -> &Tier {
        &self.tiers[0]
    }

    pub fn last(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, level: u32) -> Option<&Tier> {
        let index = level.checked_sub(1)? as usize;
        self.tiers.get(index)
    }

    pub fn resolve_tier(&self, xp: u64) -> &Tier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.xp_threshold <= xp)
            .unwrap_or_else(|| self.first())
    }

    /// The tier after `tier`, looked up by position rather than threshold.
    pub fn next_tier(&self, tier: &Tier) -> Option<&Tier> {
        self.tiers.get(tier.level as usize)
    }

    pub fn compute_progress(&self, xp: u64) -> Progress {
        let current = self.resolve_tier(xp);
        let Some(next) = self.next_tier(current) else {
            return Progress {
                percent: 100,
                xp_remaining: 0,
            };
        };

        let within = xp - current.xp_threshold;
        let span = next.xp_threshold - current.xp_threshold;
        // round half up, in integers
        let percent = (200 * u128::from(within) + u128::from(span)) / (2 * u128::from(span));

        Progress {
            percent: percent.min(100) as u8,
            xp_remaining: next.xp_threshold - xp,
        }
    }

    pub fn snapshot(&self, xp: u64) -> ProgressSnapshot {
        let tier = self.resolve_tier(xp);
        let progress = self.compute_progress(xp);
        ProgressSnapshot {
            xp,
            tier: tier.clone(),
            next_tier: self.next_tier(tier).cloned(),
            percent: progress.percent,
            xp_to_next: progress.xp_remaining,
        }
    }
}
