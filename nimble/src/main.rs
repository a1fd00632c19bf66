//! Nimble v2 command-line dice roller.
//!
//! Rolls ad-hoc bindings or named actions from a JSON library and narrates
//! the result:
//!
//! ```bash
//! cargo run -p nimble -- roll --kind attack --ability STR --str 3 --adv
//! cargo run -p nimble -- --history rolls.json action actions.json Longsword --str 2
//! cargo run -p nimble -- --history rolls.json history -n 5
//! ```

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimble=info,nimble_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    commands::run(cli).await
}
