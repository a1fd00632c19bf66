//! Dice expressions and the die source the engine draws from.
//!
//! Action content only ever names a single pool of identical dice (`NdM`).
//! Anything that does not fit that shape falls back to `1d20`.

use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest die count a single expression may ask for.
pub const MAX_DICE: u32 = 1000;

static DIE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)?d(\d+)$").expect("valid die regex"));

/// A uniform source of die faces.
///
/// Every `rand::Rng` is a die source. Tests use [`crate::testing::ScriptedDice`]
/// to feed fixed faces instead.
pub trait DieSource {
    /// Draw one face in `1..=sides`. `sides` is never zero.
    fn draw(&mut self, sides: u32) -> u32;
}

impl<R: Rng> DieSource for R {
    fn draw(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides)
    }
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdvMode {
    #[default]
    Normal,
    Adv,
    Dis,
}

impl AdvMode {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: AdvMode) -> AdvMode {
        match (self, other) {
            (AdvMode::Normal, x) | (x, AdvMode::Normal) => x,
            (AdvMode::Adv, AdvMode::Dis) | (AdvMode::Dis, AdvMode::Adv) => AdvMode::Normal,
            (AdvMode::Adv, AdvMode::Adv) => AdvMode::Adv,
            (AdvMode::Dis, AdvMode::Dis) => AdvMode::Dis,
        }
    }

    /// Build from the pair of flags a caller usually has on hand.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> AdvMode {
        AdvMode::Normal
            .combine(if advantage { AdvMode::Adv } else { AdvMode::Normal })
            .combine(if disadvantage { AdvMode::Dis } else { AdvMode::Normal })
    }
}

/// A single physical die that was rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRoll {
    pub value: u32,
    pub sides: u32,
}

/// `count` dice of `sides` faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieExpression {
    pub count: u32,
    pub sides: u32,
}

impl DieExpression {
    pub const D20: DieExpression = DieExpression { count: 1, sides: 20 };
    pub const D6: DieExpression = DieExpression { count: 1, sides: 6 };

    /// Parse `NdM` (case-insensitive, count optional).
    ///
    /// Returns `None` for anything else, including zero-faced dice, counts
    /// above [`MAX_DICE`] and numbers that overflow `u32`.
    pub fn parse(notation: &str) -> Option<Self> {
        let caps = DIE_PATTERN.captures(notation)?;
        let count: u32 = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 1,
        };
        if count > MAX_DICE {
            return None;
        }
        let sides: u32 = caps.get(2)?.as_str().parse().ok()?;
        if sides == 0 {
            return None;
        }
        Some(Self { count, sides })
    }

    /// Parse, falling back to `1d20` on malformed notation.
    pub fn parse_or_default(notation: &str) -> Self {
        Self::parse(notation).unwrap_or_else(|| {
            tracing::warn!(notation, "unrecognised die expression, rolling 1d20");
            Self::D20
        })
    }

    /// Roll every die in order.
    pub fn roll<D: DieSource + ?Sized>(&self, dice: &mut D) -> Vec<DieRoll> {
        (0..self.count)
            .map(|_| DieRoll {
                value: dice.draw(self.sides),
                sides: self.sides,
            })
            .collect()
    }
}

impl fmt::Display for DieExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
