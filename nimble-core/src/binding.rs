//! Roll bindings: the declarative description of what a game action rolls.
//!
//! Bindings are authored content. Every field except `kind` is optional and
//! the engine fills sensible defaults, so a binding never fails to roll.

use crate::character::Ability;
use crate::dice::{DieExpression, DieSource};
use crate::engine::{roll_action, RollContext, RollResult};
use crate::narrate::format_roll_result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a roll is for. Decides the default die and whether crits apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollKind {
    Attack,
    Save,
    Check,
    Damage,
    Healing,
}

impl RollKind {
    /// Attack, save and check resolve on a d20 and can crit.
    pub fn is_d20(&self) -> bool {
        matches!(self, RollKind::Attack | RollKind::Save | RollKind::Check)
    }

    pub fn default_die(&self) -> DieExpression {
        if self.is_d20() {
            DieExpression::D20
        } else {
            DieExpression::D6
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RollKind::Attack => "attack",
            RollKind::Save => "save",
            RollKind::Check => "check",
            RollKind::Damage => "damage",
            RollKind::Healing => "healing",
        }
    }
}

impl fmt::Display for RollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown roll kind: {0} (expected attack, save, check, damage or healing)")]
pub struct ParseRollKindError(pub String);

impl FromStr for RollKind {
    type Err = ParseRollKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attack" => Ok(RollKind::Attack),
            "save" => Ok(RollKind::Save),
            "check" => Ok(RollKind::Check),
            "damage" => Ok(RollKind::Damage),
            "healing" | "heal" => Ok(RollKind::Healing),
            _ => Err(ParseRollKindError(s.to_string())),
        }
    }
}

/// Custom critical range for a d20 roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritRule {
    /// Lowest natural roll that counts as a critical success. Unset or zero means 20.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<i32>,
    /// Free-text description of what the crit does. Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl CritRule {
    pub fn on(threshold: i32) -> Self {
        Self {
            on: Some(threshold),
            effect: None,
        }
    }

    pub fn threshold(&self) -> i32 {
        match self.on {
            Some(0) | None => 20,
            Some(n) => n,
        }
    }
}

/// Where a descriptor-style DC comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DcSource {
    Fixed,
    Calc,
}

/// Object form of a DC.
///
/// `formula` is carried for the content layer; the engine only reads `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcDescriptor {
    pub source: DcSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// A difficulty class, either a bare number or a descriptor object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dc {
    Literal(i32),
    Descriptor(DcDescriptor),
}

impl Dc {
    pub fn calculated(formula: impl Into<String>, value: Option<i32>) -> Self {
        Dc::Descriptor(DcDescriptor {
            source: DcSource::Calc,
            value,
            formula: Some(formula.into()),
        })
    }

    /// The number to compare against, if one is known.
    pub fn value(&self) -> Option<i32> {
        match self {
            Dc::Literal(n) => Some(*n),
            Dc::Descriptor(d) => d.value,
        }
    }
}

impl From<i32> for Dc {
    fn from(value: i32) -> Self {
        Dc::Literal(value)
    }
}

/// One rollable outcome of a game action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBinding {
    pub kind: RollKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<Ability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub die: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit: Option<CritRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<Dc>,
}

impl RollBinding {
    pub fn new(kind: RollKind) -> Self {
        Self {
            kind,
            ability: None,
            flat: None,
            die: None,
            crit: None,
            dc: None,
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_flat(mut self, flat: i32) -> Self {
        self.flat = Some(flat);
        self
    }

    pub fn with_die(mut self, die: impl Into<String>) -> Self {
        self.die = Some(die.into());
        self
    }

    pub fn with_crit(mut self, crit: CritRule) -> Self {
        self.crit = Some(crit);
        self
    }

    pub fn with_dc(mut self, dc: impl Into<Dc>) -> Self {
        self.dc = Some(dc.into());
        self
    }

    /// The die to roll, after defaults and malformed-notation fallback.
    pub fn die_expression(&self) -> DieExpression {
        match &self.die {
            Some(notation) => DieExpression::parse_or_default(notation),
            None => self.kind.default_die(),
        }
    }
}

/// A named game action and the rolls it triggers, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    #[serde(default)]
    pub bindings: Vec<RollBinding>,
}

impl Action {
    pub fn new(label: impl Into<String>, bindings: Vec<RollBinding>) -> Self {
        Self {
            label: label.into(),
            bindings,
        }
    }

    /// Roll every binding with the same context.
    pub fn roll_all<D: DieSource + ?Sized>(
        &self,
        context: &RollContext,
        dice: &mut D,
    ) -> Vec<RollResult> {
        self.bindings
            .iter()
            .map(|binding| roll_action(binding, context, &mut *dice))
            .collect()
    }

    /// Narrate results produced by [`Action::roll_all`], one block per binding.
    pub fn narrate(&self, results: &[RollResult]) -> String {
        self.bindings
            .iter()
            .zip(results)
            .map(|(binding, result)| format_roll_result(&self.label, binding, result))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A collection of authored actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLibrary {
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl ActionLibrary {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Find an action by label, ignoring case.
    pub fn find(&self, label: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label.trim()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    #[test]
    fn test_default_dice() {
        assert_eq!(RollBinding::new(RollKind::Attack).die_expression(), DieExpression::D20);
        assert_eq!(RollBinding::new(RollKind::Save).die_expression(), DieExpression::D20);
        assert_eq!(RollBinding::new(RollKind::Healing).die_expression(), DieExpression::D6);
        assert_eq!(
            RollBinding::new(RollKind::Damage).with_die("banana").die_expression(),
            DieExpression::D20
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Attack".parse::<RollKind>().unwrap(), RollKind::Attack);
        assert_eq!("heal".parse::<RollKind>().unwrap(), RollKind::Healing);
        assert!("parry".parse::<RollKind>().is_err());
    }

    #[test]
    fn test_crit_threshold() {
        assert_eq!(CritRule::default().threshold(), 20);
        assert_eq!(CritRule::on(0).threshold(), 20);
        assert_eq!(CritRule::on(18).threshold(), 18);
    }

    #[test]
    fn test_dc_shapes() {
        let literal: Dc = serde_json::from_str("15").unwrap();
        assert_eq!(literal, Dc::Literal(15));
        assert_eq!(literal.value(), Some(15));

        let calc: Dc =
            serde_json::from_str(r#"{"source": "calc", "formula": "8 + WILL"}"#).unwrap();
        assert_eq!(calc.value(), None);

        let fixed: Dc = serde_json::from_str(r#"{"source": "fixed", "value": 12}"#).unwrap();
        assert_eq!(fixed.value(), Some(12));
    }

    #[test]
    fn test_binding_from_content() {
        let json = r#"{
            "kind": "attack",
            "ability": "STR",
            "die": "1d20",
            "crit": {"on": 19, "effect": "double damage"},
            "dc": 13
        }"#;
        let binding: RollBinding = serde_json::from_str(json).unwrap();
        assert_eq!(binding.kind, RollKind::Attack);
        assert_eq!(binding.ability, Some(Ability::Strength));
        assert_eq!(binding.crit.as_ref().map(CritRule::threshold), Some(19));
        assert_eq!(binding.dc, Some(Dc::Literal(13)));
        assert_eq!(binding.flat, None);
    }

    #[test]
    fn test_library_find_is_case_insensitive() {
        let library = ActionLibrary::new(vec![Action::new(
            "Longsword",
            vec![RollBinding::new(RollKind::Attack)],
        )]);
        assert!(library.find("longsword").is_some());
        assert!(library.find("Dagger").is_none());
        assert_eq!(library.labels().collect::<Vec<_>>(), vec!["Longsword"]);
    }

    #[test]
    fn test_action_rolls_every_binding_in_order() {
        let action = Action::new(
            "Longsword",
            vec![
                RollBinding::new(RollKind::Attack).with_ability(Ability::Strength),
                RollBinding::new(RollKind::Damage).with_die("1d8").with_flat(1),
            ],
        );
        let context = RollContext::new(crate::AbilityModifiers::new(2, 0, 0, 0));
        let mut dice = ScriptedDice::new([14, 6]);

        let results = action.roll_all(&context, &mut dice);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].total, 16);
        assert_eq!(results[1].total, 7);

        let text = action.narrate(&results);
        assert!(text.contains("[ATTACK]"));
        assert!(text.contains("[DAMAGE]"));
        assert!(text.contains("\n\n"));
    }
}
