//! Character abilities as the roll engine sees them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four Nimble abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "STR", alias = "str")]
    Strength,
    #[serde(rename = "DEX", alias = "dex")]
    Dexterity,
    #[serde(rename = "INT", alias = "int")]
    Intelligence,
    #[serde(rename = "WILL", alias = "will")]
    Will,
}

impl Ability {
    pub const ALL: [Ability; 4] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Intelligence,
        Ability::Will,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Intelligence => "INT",
            Ability::Will => "WILL",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Intelligence => "Intelligence",
            Ability::Will => "Will",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown ability: {0} (expected STR, DEX, INT or WILL)")]
pub struct ParseAbilityError(pub String);

impl FromStr for Ability {
    type Err = ParseAbilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Ability::ALL
            .into_iter()
            .find(|a| {
                a.abbreviation().eq_ignore_ascii_case(wanted)
                    || a.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ParseAbilityError(s.to_string()))
    }
}

/// Ability modifiers container.
///
/// Nimble characters carry modifiers directly; there is no score-to-modifier
/// table and no enforced range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityModifiers {
    #[serde(rename = "str_mod", alias = "str", default)]
    pub strength: i32,
    #[serde(rename = "dex_mod", alias = "dex", default)]
    pub dexterity: i32,
    #[serde(rename = "int_mod", alias = "int", default)]
    pub intelligence: i32,
    #[serde(rename = "will_mod", alias = "will", default)]
    pub will: i32,
}

impl AbilityModifiers {
    pub fn new(str: i32, dex: i32, int: i32, will: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            intelligence: int,
            will,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Intelligence => self.intelligence,
            Ability::Will => self.will,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Will => self.will = value,
        }
    }
}
