//! Testing utilities for the roll engine.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedDice` for fixed die faces instead of an RNG
//! - `TestHarness` for scripted roll scenarios against one character
//! - Assertion helpers for verifying results

use crate::binding::RollBinding;
use crate::character::AbilityModifiers;
use crate::dice::{AdvMode, DieSource};
use crate::engine::{roll_action, CritOutcome, RollContext, RollResult};
use crate::history::{RollHistory, RollRecord};
use std::collections::VecDeque;

/// A die source that returns scripted faces in order.
///
/// Faces are clamped into `1..=sides`. Once the script runs out every draw
/// returns 1 and is counted in [`ScriptedDice::exhausted_draws`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    drawn: Vec<u32>,
    exhausted_draws: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            drawn: Vec::new(),
            exhausted_draws: 0,
        }
    }

    /// Append more faces to the script.
    pub fn queue(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Every face handed out so far.
    pub fn drawn(&self) -> &[u32] {
        &self.drawn
    }

    pub fn exhausted_draws(&self) -> usize {
        self.exhausted_draws
    }
}

impl DieSource for ScriptedDice {
    fn draw(&mut self, sides: u32) -> u32 {
        let face = match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => {
                self.exhausted_draws += 1;
                1
            }
        };
        self.drawn.push(face);
        face
    }
}

/// Test harness for running roll scenarios.
pub struct TestHarness {
    /// The scripted dice.
    pub dice: ScriptedDice,
    /// The rolling character's context.
    pub context: RollContext,
    /// Everything rolled so far.
    pub history: RollHistory,
    actor: String,
}

impl TestHarness {
    /// Create a new test harness with an all-zero character.
    pub fn new() -> Self {
        Self::with_character(AbilityModifiers::default())
    }

    /// Create a test harness with a custom character.
    pub fn with_character(character: AbilityModifiers) -> Self {
        Self {
            dice: ScriptedDice::default(),
            context: RollContext::new(character),
            history: RollHistory::new(),
            actor: "Test Hero".to_string(),
        }
    }

    /// Queue die faces for the next rolls.
    pub fn expect_draws(&mut self, faces: impl IntoIterator<Item = u32>) -> &mut Self {
        self.dice.queue(faces);
        self
    }

    pub fn adv_mode(&mut self, mode: AdvMode) -> &mut Self {
        self.context.adv_mode = mode;
        self
    }

    pub fn situational(&mut self, bonus: Option<i32>) -> &mut Self {
        self.context.situational = bonus;
        self
    }

    pub fn compare_dc(&mut self, dc: Option<i32>) -> &mut Self {
        self.context.compare_dc = dc;
        self
    }

    /// Roll a binding, log it, and return the result.
    pub fn roll(&mut self, label: &str, binding: &RollBinding) -> RollResult {
        let result = roll_action(binding, &self.context, &mut self.dice);
        self.history.push(RollRecord::new(
            self.actor.clone(),
            label,
            binding,
            result.clone(),
        ));
        result
    }

    /// Narration of the most recent roll.
    pub fn last_narration(&self) -> Option<&str> {
        self.history.last().map(|r| r.narration.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert `total == raw_result + modifier`.
#[track_caller]
pub fn assert_total_decomposes(result: &RollResult) {
    assert_eq!(
        result.total,
        result.raw_result + result.modifier,
        "Expected total {} to equal raw {} + modifier {}",
        result.total,
        result.raw_result,
        result.modifier
    );
}

/// Assert the DC fields are either all present or all absent.
#[track_caller]
pub fn assert_dc_consistent(result: &RollResult) {
    let present = [
        result.dc.is_some(),
        result.passed_dc.is_some(),
        result.margin.is_some(),
    ];
    assert!(
        present.iter().all(|p| *p) || present.iter().all(|p| !*p),
        "DC fields partially set: {present:?}"
    );
}

/// Assert the crit outcome.
#[track_caller]
pub fn assert_crit(result: &RollResult, expected: Option<CritOutcome>) {
    assert_eq!(
        result.crit, expected,
        "Expected crit {expected:?}, got {:?}",
        result.crit
    );
}
