//! Roll resolution.
//!
//! [`roll_action`] turns a [`RollBinding`] plus a [`RollContext`] into a
//! [`RollResult`] carrying every die rolled, the kept value, the total and the
//! DC comparison. It never fails: missing fields resolve to zero or to the
//! kind's default die, and malformed die notation rolls `1d20`.

use crate::binding::RollBinding;
use crate::character::AbilityModifiers;
use crate::dice::{AdvMode, DieExpression, DieRoll, DieSource};
use serde::{Deserialize, Serialize};

/// Per-invocation state supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollContext {
    pub character: AbilityModifiers,
    #[serde(default)]
    pub adv_mode: AdvMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situational: Option<i32>,
    /// Overrides any DC on the binding.
    #[serde(rename = "compareDC", default, skip_serializing_if = "Option::is_none")]
    pub compare_dc: Option<i32>,
}

impl RollContext {
    pub fn new(character: AbilityModifiers) -> Self {
        Self {
            character,
            ..Default::default()
        }
    }

    pub fn with_adv_mode(mut self, adv_mode: AdvMode) -> Self {
        self.adv_mode = adv_mode;
        self
    }

    pub fn with_situational(mut self, situational: i32) -> Self {
        self.situational = Some(situational);
        self
    }

    pub fn with_compare_dc(mut self, dc: i32) -> Self {
        self.compare_dc = Some(dc);
        self
    }
}

/// Critical outcome of a d20 roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CritOutcome {
    Success,
    Fail,
}

/// Everything a roll produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub formula: String,
    /// The kept d20, or the sum of a damage/healing pool, before modifiers.
    pub raw_result: i32,
    pub modifier: i32,
    pub total: i32,
    /// Every die physically rolled, in roll order, kept or not.
    pub rolls: Vec<DieRoll>,
    pub advantage: bool,
    pub disadvantage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit: Option<CritOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<i32>,
    #[serde(rename = "passedDC", default, skip_serializing_if = "Option::is_none")]
    pub passed_dc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<i32>,
}

impl RollResult {
    pub fn is_crit_success(&self) -> bool {
        self.crit == Some(CritOutcome::Success)
    }

    pub fn is_crit_fail(&self) -> bool {
        self.crit == Some(CritOutcome::Fail)
    }

    /// The advantage mode the roll was actually resolved under.
    pub fn adv_mode(&self) -> AdvMode {
        AdvMode::from_flags(self.advantage, self.disadvantage)
    }
}

/// Resolve one binding against a character and situation.
pub fn roll_action<D: DieSource + ?Sized>(
    binding: &RollBinding,
    context: &RollContext,
    dice: &mut D,
) -> RollResult {
    let ability_mod = binding
        .ability
        .map(|a| context.character.get(a))
        .unwrap_or(0);
    let flat = binding.flat.unwrap_or(0);
    let situational = context.situational.unwrap_or(0);
    let modifier = ability_mod.saturating_add(flat).saturating_add(situational);

    let expr = binding.die_expression();

    // Advantage only ever applies to d20 resolution rolls.
    let mode = if binding.kind.is_d20() {
        context.adv_mode
    } else {
        AdvMode::Normal
    };

    let (raw_result, rolls) = if binding.kind.is_d20() {
        roll_d20(mode, dice)
    } else {
        let rolls = expr.roll(dice);
        let sum: i64 = rolls.iter().map(|r| i64::from(r.value)).sum();
        (saturate(sum), rolls)
    };

    let total = raw_result.saturating_add(modifier);

    let crit = if binding.kind.is_d20() {
        let mut crit = None;
        let custom_hit = binding
            .crit
            .as_ref()
            .is_some_and(|c| raw_result >= c.threshold());
        if raw_result == 20 || custom_hit {
            crit = Some(CritOutcome::Success);
        }
        if raw_result == 1 {
            crit = Some(CritOutcome::Fail);
        }
        crit
    } else {
        None
    };

    let dc = context
        .compare_dc
        .or_else(|| binding.dc.as_ref().and_then(|dc| dc.value()));

    let formula = build_formula(&expr, binding, ability_mod, flat, situational);

    tracing::debug!(
        kind = %binding.kind,
        raw_result,
        total,
        ?crit,
        ?dc,
        "resolved roll"
    );

    RollResult {
        formula,
        raw_result,
        modifier,
        total,
        rolls,
        advantage: mode == AdvMode::Adv,
        disadvantage: mode == AdvMode::Dis,
        crit,
        dc,
        passed_dc: dc.map(|dc| total >= dc),
        margin: dc.map(|dc| total.saturating_sub(dc)),
    }
}

fn roll_d20<D: DieSource + ?Sized>(mode: AdvMode, dice: &mut D) -> (i32, Vec<DieRoll>) {
    let first = dice.draw(20);
    if mode == AdvMode::Normal {
        return (first as i32, vec![DieRoll { value: first, sides: 20 }]);
    }

    let second = dice.draw(20);
    let kept = match mode {
        AdvMode::Dis => first.min(second),
        _ => first.max(second),
    };
    (
        kept as i32,
        vec![
            DieRoll { value: first, sides: 20 },
            DieRoll { value: second, sides: 20 },
        ],
    )
}

fn saturate(sum: i64) -> i32 {
    i32::try_from(sum).unwrap_or(i32::MAX)
}

/// Die notation followed by each non-zero modifier term.
fn build_formula(
    expr: &DieExpression,
    binding: &RollBinding,
    ability_mod: i32,
    flat: i32,
    situational: i32,
) -> String {
    let mut parts = vec![expr.to_string()];
    if let Some(ability) = binding.ability.filter(|_| ability_mod != 0) {
        parts.push(format!("{ability}({ability_mod:+})"));
    }
    if flat != 0 {
        parts.push(format!("{flat:+}"));
    }
    if situational != 0 {
        parts.push(format!("sit({situational:+})"));
    }
    parts.join(" ")
}
