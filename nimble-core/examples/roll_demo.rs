//! Roll a handful of bindings and print their narration.

use nimble_core::{
    format_roll_result, roll_action, Ability, AbilityModifiers, AdvMode, CritRule, RollBinding,
    RollContext, RollKind,
};

fn main() {
    println!("=== Nimble Roll Demo ===\n");

    let character = AbilityModifiers::new(3, 1, -1, 2);
    let mut rng = rand::thread_rng();

    let rolls = [
        (
            "Longsword",
            RollBinding::new(RollKind::Attack)
                .with_ability(Ability::Strength)
                .with_crit(CritRule::on(19)),
            AdvMode::Normal,
        ),
        (
            "Longsword",
            RollBinding::new(RollKind::Damage)
                .with_die("1d8")
                .with_ability(Ability::Strength),
            AdvMode::Normal,
        ),
        (
            "Shortbow (hidden)",
            RollBinding::new(RollKind::Attack).with_ability(Ability::Dexterity),
            AdvMode::Adv,
        ),
        (
            "Resist Charm",
            RollBinding::new(RollKind::Save)
                .with_ability(Ability::Will)
                .with_dc(13),
            AdvMode::Dis,
        ),
        (
            "Fireball",
            RollBinding::new(RollKind::Damage).with_die("6d6"),
            AdvMode::Normal,
        ),
        (
            "Second Wind",
            RollBinding::new(RollKind::Healing).with_die("2d4").with_flat(2),
            AdvMode::Normal,
        ),
    ];

    for (label, binding, mode) in rolls {
        let context = RollContext::new(character).with_adv_mode(mode);
        let result = roll_action(&binding, &context, &mut rng);
        println!("{}\n", format_roll_result(label, &binding, &result));
    }
}
