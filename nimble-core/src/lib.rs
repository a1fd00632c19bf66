//! Nimble v2 roll resolution engine.
//!
//! This crate provides:
//! - The roll engine: an action binding plus a character context in, a fully
//!   audited [`RollResult`] out
//! - Narration of results for chat and roll logs
//! - Authored action libraries and a roll history, with JSON persistence
//!
//! # Quick Start
//!
//! ```
//! use nimble_core::{format_roll_result, roll_action, Ability, AbilityModifiers, RollBinding, RollContext, RollKind};
//!
//! let binding = RollBinding::new(RollKind::Attack).with_ability(Ability::Strength);
//! let context = RollContext::new(AbilityModifiers::new(3, 1, 0, 2));
//!
//! let result = roll_action(&binding, &context, &mut rand::thread_rng());
//! assert_eq!(result.total, result.raw_result + 3);
//! println!("{}", format_roll_result("Longsword", &binding, &result));
//! ```

pub mod binding;
pub mod character;
pub mod dice;
pub mod engine;
pub mod history;
pub mod narrate;
pub mod persist;
pub mod testing;

// Primary public API
pub use binding::{
    Action, ActionLibrary, CritRule, Dc, DcDescriptor, DcSource, ParseRollKindError, RollBinding,
    RollKind,
};
pub use character::{Ability, AbilityModifiers, ParseAbilityError};
pub use dice::{AdvMode, DieExpression, DieRoll, DieSource, MAX_DICE};
pub use engine::{roll_action, CritOutcome, RollContext, RollResult};
pub use history::{RollHistory, RollRecord};
pub use narrate::format_roll_result;
pub use persist::{PersistError, SavedHistory};
pub use testing::{ScriptedDice, TestHarness};
