//! Scenario and property tests for roll resolution.
//!
//! Run with: `cargo test -p nimble-core --test roll_scenarios`

use nimble_core::testing::{assert_crit, assert_dc_consistent, assert_total_decomposes};
use nimble_core::{
    format_roll_result, roll_action, Ability, AbilityModifiers, AdvMode, CritOutcome, CritRule,
    Dc, DieRoll, RollBinding, RollContext, RollKind, ScriptedDice, TestHarness,
};

fn d20(value: u32) -> DieRoll {
    DieRoll { value, sides: 20 }
}

// =============================================================================
// Worked scenarios
// =============================================================================

#[test]
fn test_scenario_a_plain_attack() {
    let mut harness = TestHarness::with_character(AbilityModifiers::new(3, 0, 0, 0));
    harness.expect_draws([15]);

    let binding = RollBinding::new(RollKind::Attack)
        .with_ability(Ability::Strength)
        .with_die("1d20");
    let result = harness.roll("Longsword", &binding);

    assert_eq!(result.raw_result, 15);
    assert_eq!(result.modifier, 3);
    assert_eq!(result.total, 18);
    assert_eq!(result.rolls, vec![d20(15)]);
    assert_crit(&result, None);
}

#[test]
fn test_scenario_b_attack_with_advantage() {
    let mut harness = TestHarness::with_character(AbilityModifiers::new(3, 0, 0, 0));
    harness.adv_mode(AdvMode::Adv).expect_draws([7, 19]);

    let binding = RollBinding::new(RollKind::Attack)
        .with_ability(Ability::Strength)
        .with_die("1d20");
    let result = harness.roll("Longsword", &binding);

    assert_eq!(result.raw_result, 19);
    assert_eq!(result.rolls, vec![d20(7), d20(19)]);
    assert_eq!(result.total, 22);
}

#[test]
fn test_scenario_c_damage_pool() {
    let mut harness = TestHarness::new();
    harness.expect_draws([4, 5]);

    let binding = RollBinding::new(RollKind::Damage).with_die("2d6").with_flat(2);
    let result = harness.roll("Greatsword", &binding);

    assert_eq!(result.raw_result, 9);
    assert_eq!(result.modifier, 2);
    assert_eq!(result.total, 11);
    assert_eq!(
        result.rolls,
        vec![DieRoll { value: 4, sides: 6 }, DieRoll { value: 5, sides: 6 }]
    );
}

#[test]
fn test_scenario_d_check_misses_dc_by_one() {
    let mut harness = TestHarness::with_character(AbilityModifiers::new(0, 0, 2, 0));
    harness.compare_dc(Some(15)).expect_draws([12]);

    let binding = RollBinding::new(RollKind::Check)
        .with_ability(Ability::Intelligence)
        .with_die("1d20");
    let result = harness.roll("Arcana", &binding);

    assert_eq!(result.total, 14);
    assert_eq!(result.passed_dc, Some(false));
    assert_eq!(result.margin, Some(-1));
    assert!(harness
        .last_narration()
        .unwrap()
        .ends_with("❌ Fail vs DC 15 (by 1)"));
}

#[test]
fn test_scenario_e_natural_one_and_twenty() {
    let mut harness = TestHarness::with_character(AbilityModifiers::new(10, 10, 10, 10));
    harness.expect_draws([1, 20]);

    let fumble = harness.roll(
        "Longsword",
        &RollBinding::new(RollKind::Attack)
            .with_ability(Ability::Strength)
            .with_flat(5),
    );
    assert_crit(&fumble, Some(CritOutcome::Fail));

    let crit = harness.roll(
        "Longsword",
        &RollBinding::new(RollKind::Attack).with_crit(CritRule::on(21)),
    );
    assert_crit(&crit, Some(CritOutcome::Success));
}

// =============================================================================
// Properties over random rolls
// =============================================================================

fn all_bindings() -> Vec<RollBinding> {
    vec![
        RollBinding::new(RollKind::Attack).with_ability(Ability::Strength),
        RollBinding::new(RollKind::Save)
            .with_ability(Ability::Will)
            .with_dc(12),
        RollBinding::new(RollKind::Check)
            .with_ability(Ability::Dexterity)
            .with_flat(-2)
            .with_crit(CritRule::on(18)),
        RollBinding::new(RollKind::Damage)
            .with_die("3d8")
            .with_ability(Ability::Strength),
        RollBinding::new(RollKind::Healing).with_die("2d4").with_flat(1),
        RollBinding::new(RollKind::Damage).with_die("banana"),
    ]
}

#[test]
fn test_properties_hold_for_random_rolls() {
    let character = AbilityModifiers::new(2, -1, 4, 1);
    let mut rng = rand::thread_rng();

    for mode in [AdvMode::Normal, AdvMode::Adv, AdvMode::Dis] {
        let context = RollContext::new(character)
            .with_adv_mode(mode)
            .with_situational(1);

        for binding in all_bindings() {
            for _ in 0..50 {
                let result = roll_action(&binding, &context, &mut rng);
                assert_total_decomposes(&result);
                assert_dc_consistent(&result);

                let ability_mod = binding.ability.map(|a| character.get(a)).unwrap_or(0);
                assert_eq!(result.modifier, ability_mod + binding.flat.unwrap_or(0) + 1);

                let values: Vec<i32> = result.rolls.iter().map(|r| r.value as i32).collect();
                if binding.kind.is_d20() {
                    assert!(result.rolls.iter().all(|r| r.sides == 20));
                    match mode {
                        AdvMode::Normal => {
                            assert_eq!(values.len(), 1);
                            assert_eq!(result.raw_result, values[0]);
                        }
                        AdvMode::Adv => {
                            assert_eq!(values.len(), 2);
                            assert_eq!(Some(&result.raw_result), values.iter().max());
                        }
                        AdvMode::Dis => {
                            assert_eq!(values.len(), 2);
                            assert_eq!(Some(&result.raw_result), values.iter().min());
                        }
                    }
                } else {
                    let expr = binding.die_expression();
                    assert_eq!(result.rolls.len(), expr.count as usize);
                    assert!(result.rolls.iter().all(|r| r.sides == expr.sides));
                    assert_eq!(result.raw_result, values.iter().sum::<i32>());
                    assert_crit(&result, None);
                }
            }
        }
    }
}

#[test]
fn test_dc_absent_without_any_source() {
    let binding = RollBinding::new(RollKind::Save).with_dc(Dc::calculated("10 + INT", None));
    let mut dice = ScriptedDice::new([11]);
    let result = roll_action(&binding, &RollContext::default(), &mut dice);

    assert_eq!(result.dc, None);
    assert_eq!(result.passed_dc, None);
    assert_eq!(result.margin, None);
    assert!(format_roll_result("Resist", &binding, &result).ends_with("Result: 11"));
}

#[test]
fn test_banana_damage_matches_d20_damage() {
    let context = RollContext::default();
    let banana = roll_action(
        &RollBinding::new(RollKind::Damage).with_die("banana"),
        &context,
        &mut ScriptedDice::new([17]),
    );
    let d20 = roll_action(
        &RollBinding::new(RollKind::Damage).with_die("1d20"),
        &context,
        &mut ScriptedDice::new([17]),
    );
    assert_eq!(banana, d20);
    assert_eq!(banana.formula, "1d20");
}
