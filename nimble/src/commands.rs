//! Subcommand handlers.

use anyhow::{bail, Context, Result};
use nimble_core::{
    format_roll_result, roll_action, ActionLibrary, RollBinding, RollHistory, RollRecord,
    RollResult,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use crate::cli::{ActionArgs, Cli, Command, HistoryArgs, RollArgs};

pub async fn run(cli: Cli) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => {
            tracing::debug!(seed, "using seeded dice");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    match &cli.command {
        Command::Roll(args) => roll(&cli, args, &mut rng).await,
        Command::Action(args) => action(&cli, args, &mut rng).await,
        Command::History(args) => history(&cli, args).await,
    }
}

async fn roll(cli: &Cli, args: &RollArgs, rng: &mut StdRng) -> Result<()> {
    let binding = args.binding();
    let context = args.situation.context(args.character.modifiers());
    let result = roll_action(&binding, &context, rng);

    print_results(cli, &[(&args.label, &binding, &result)])?;
    log_rolls(cli, &args.label, &[(&binding, result)]).await
}

async fn action(cli: &Cli, args: &ActionArgs, rng: &mut StdRng) -> Result<()> {
    let library = ActionLibrary::load_json(&args.library)
        .await
        .with_context(|| format!("loading action library {}", args.library.display()))?;

    let Some(action) = library.find(&args.label) else {
        let known = library.labels().collect::<Vec<_>>().join(", ");
        bail!("no action named '{}' (known: {known})", args.label);
    };
    if action.bindings.is_empty() {
        bail!("action '{}' has nothing to roll", action.label);
    }

    let context = args.situation.context(args.character.modifiers());
    let results = action.roll_all(&context, rng);

    let shown: Vec<_> = action
        .bindings
        .iter()
        .zip(&results)
        .map(|(binding, result)| (&action.label, binding, result))
        .collect();
    print_results(cli, &shown)?;

    let logged: Vec<_> = action.bindings.iter().zip(results).collect();
    log_rolls(cli, &action.label, &logged).await
}

async fn history(cli: &Cli, args: &HistoryArgs) -> Result<()> {
    let Some(path) = &cli.history else {
        bail!("no history file configured (use --history or NIMBLE_HISTORY)");
    };
    let history = RollHistory::load_json(path)
        .await
        .with_context(|| format!("loading roll history {}", path.display()))?;

    let records: Vec<&RollRecord> = match &args.by {
        Some(actor) => history.by_actor(actor).rev().take(args.limit).collect(),
        None => history.recent(args.limit),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No rolls logged.");
    }
    for record in records {
        println!(
            "[{}] {}",
            record.rolled_at.format("%Y-%m-%d %H:%M:%S"),
            record.actor
        );
        println!("{}", record.narration);
        println!();
    }
    Ok(())
}

fn print_results(cli: &Cli, rolls: &[(&String, &RollBinding, &RollResult)]) -> Result<()> {
    if cli.json {
        let results: Vec<&RollResult> = rolls.iter().map(|(_, _, r)| *r).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let blocks: Vec<String> = rolls
        .iter()
        .map(|(label, binding, result)| format_roll_result(label, binding, result))
        .collect();
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

async fn log_rolls(cli: &Cli, label: &str, rolls: &[(&RollBinding, RollResult)]) -> Result<()> {
    let Some(path) = &cli.history else {
        return Ok(());
    };
    append_to_history(path, &cli.actor, label, rolls).await
}

async fn append_to_history(
    path: &Path,
    actor: &str,
    label: &str,
    rolls: &[(&RollBinding, RollResult)],
) -> Result<()> {
    let mut history = RollHistory::load_or_default(path)
        .await
        .with_context(|| format!("loading roll history {}", path.display()))?;

    for (binding, result) in rolls {
        history.push(RollRecord::new(actor, label, binding, result.clone()));
    }

    history
        .save_json(path)
        .await
        .with_context(|| format!("saving roll history {}", path.display()))?;
    tracing::info!(path = %path.display(), rolls = rolls.len(), "logged rolls");
    Ok(())
}
