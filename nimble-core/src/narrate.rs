//! Chat/log narration of roll results.

use crate::binding::{RollBinding, RollKind};
use crate::dice::AdvMode;
use crate::engine::{CritOutcome, RollResult};

pub fn kind_icon(kind: RollKind) -> &'static str {
    match kind {
        RollKind::Attack => "⚔️",
        RollKind::Save => "🛡️",
        RollKind::Check => "🎯",
        RollKind::Damage => "💥",
        RollKind::Healing => "💚",
    }
}

/// The kept die of an advantage/disadvantage roll, recomputed from the dice.
///
/// `None` when only one die was rolled or the roll was not under adv/dis.
/// Whenever it is `Some`, it equals `result.raw_result`.
pub fn kept_value(result: &RollResult) -> Option<u32> {
    if result.rolls.len() < 2 {
        return None;
    }
    let values = result.rolls.iter().map(|r| r.value);
    match result.adv_mode() {
        AdvMode::Adv => values.max(),
        AdvMode::Dis => values.min(),
        AdvMode::Normal => None,
    }
}

/// Render a multi-line narration of `result` for `action_label`.
pub fn format_roll_result(action_label: &str, binding: &RollBinding, result: &RollResult) -> String {
    let mut lines = Vec::with_capacity(5);

    let mode_suffix = match result.adv_mode() {
        AdvMode::Adv => " (Adv)",
        AdvMode::Dis => " (Dis)",
        AdvMode::Normal => "",
    };
    lines.push(format!(
        "{} {} [{}]{}",
        kind_icon(binding.kind),
        action_label,
        binding.kind.as_str().to_uppercase(),
        mode_suffix
    ));

    let values = result
        .rolls
        .iter()
        .map(|r| r.value.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(match (result.rolls.as_slice(), kept_value(result)) {
        ([], _) => "Roll: -".to_string(),
        ([only], _) => format!("Roll: {}", only.value),
        (_, Some(kept)) => format!("Rolls: {values} → Kept: {kept}"),
        (_, None) => format!("Rolls: {values}"),
    });

    lines.push(format!("Formula: {} = {}", result.formula, result.total));

    match result.crit {
        Some(CritOutcome::Success) => lines.push("🌟 Critical success!".to_string()),
        Some(CritOutcome::Fail) => lines.push("💀 Critical failure!".to_string()),
        None => {}
    }

    match (result.dc, result.passed_dc) {
        (Some(dc), Some(passed)) => {
            let by = result.margin.unwrap_or(result.total.saturating_sub(dc)).unsigned_abs();
            if passed {
                lines.push(format!("✅ Pass vs DC {dc} (by {by})"));
            } else {
                lines.push(format!("❌ Fail vs DC {dc} (by {by})"));
            }
        }
        _ => lines.push(format!("Result: {}", result.total)),
    }

    lines.join("\n")
}
