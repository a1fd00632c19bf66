//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use nimble_core::{Ability, AbilityModifiers, AdvMode, CritRule, RollBinding, RollContext, RollKind};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nimble", version, about = "Nimble v2 dice roller")]
pub struct Cli {
    /// Seed the dice for reproducible rolls.
    #[arg(long, env = "NIMBLE_SEED", global = true)]
    pub seed: Option<u64>,

    /// Append every roll to this JSON history file.
    #[arg(long, env = "NIMBLE_HISTORY", global = true)]
    pub history: Option<PathBuf>,

    /// Name recorded against logged rolls.
    #[arg(long, env = "NIMBLE_ACTOR", default_value = "Player", global = true)]
    pub actor: String,

    /// Print results as JSON instead of narration.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Roll an ad-hoc binding described by flags.
    Roll(RollArgs),
    /// Roll a named action from a library file.
    Action(ActionArgs),
    /// Show logged rolls.
    History(HistoryArgs),
}

#[derive(Debug, Args)]
pub struct RollArgs {
    /// attack, save, check, damage or healing.
    #[arg(long, short)]
    pub kind: RollKind,

    #[arg(long, short)]
    pub ability: Option<Ability>,

    /// Dice notation such as 2d6. Defaults by kind.
    #[arg(long, short)]
    pub die: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub flat: Option<i32>,

    /// Lowest natural roll that crits.
    #[arg(long)]
    pub crit_on: Option<i32>,

    /// Label shown in the narration.
    #[arg(long, short, default_value = "Roll")]
    pub label: String,

    #[command(flatten)]
    pub character: CharacterArgs,

    #[command(flatten)]
    pub situation: SituationArgs,
}

impl RollArgs {
    pub fn binding(&self) -> RollBinding {
        RollBinding {
            kind: self.kind,
            ability: self.ability,
            flat: self.flat,
            die: self.die.clone(),
            crit: self.crit_on.map(CritRule::on),
            dc: None,
        }
    }
}

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// JSON action library.
    pub library: PathBuf,

    /// Action label (case-insensitive).
    pub label: String,

    #[command(flatten)]
    pub character: CharacterArgs,

    #[command(flatten)]
    pub situation: SituationArgs,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of rolls to show, newest first.
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: usize,

    /// Only show rolls by this actor.
    #[arg(long = "by")]
    pub by: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct CharacterArgs {
    #[arg(long = "str", default_value_t = 0, allow_negative_numbers = true)]
    pub strength: i32,
    #[arg(long = "dex", default_value_t = 0, allow_negative_numbers = true)]
    pub dexterity: i32,
    #[arg(long = "int", default_value_t = 0, allow_negative_numbers = true)]
    pub intelligence: i32,
    #[arg(long = "will", default_value_t = 0, allow_negative_numbers = true)]
    pub will: i32,
}

impl CharacterArgs {
    pub fn modifiers(&self) -> AbilityModifiers {
        AbilityModifiers::new(self.strength, self.dexterity, self.intelligence, self.will)
    }
}

#[derive(Debug, Default, Args)]
pub struct SituationArgs {
    #[arg(long)]
    pub adv: bool,

    #[arg(long)]
    pub dis: bool,

    /// One-off bonus or penalty for this roll.
    #[arg(long, allow_negative_numbers = true)]
    pub situational: Option<i32>,

    /// Difficulty to compare against; overrides any DC on the action.
    #[arg(long, allow_negative_numbers = true)]
    pub dc: Option<i32>,
}

impl SituationArgs {
    pub fn context(&self, character: AbilityModifiers) -> RollContext {
        RollContext {
            character,
            adv_mode: AdvMode::from_flags(self.adv, self.dis),
            situational: self.situational,
            compare_dc: self.dc,
        }
    }
}
