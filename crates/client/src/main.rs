//! Terminal dungeon gauntlet.
//!
//! Composition root: loads configuration, installs file logging, opens the
//! JSON save directory and runs consecutive encounters on stdin/stdout.
//!
//! ```bash
//! GAUNTLET_CHARACTER=aria GAUNTLET_GAUNTLET_LENGTH=3 cargo run -p gauntlet-client
//! ```

mod bestiary;
mod config;
mod gauntlet;
mod logging;
mod prompt;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use gauntlet_runtime::FileStore;

use config::ClientConfig;
use gauntlet::{Gauntlet, RunOutcome};
use prompt::Prompt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let log_file = logging::setup_logging(&config.log_dir, config.session_id.as_deref())?;

    tracing::info!("Starting gauntlet for {}", config.character_id);
    tracing::info!("Save directory: {}", config.save_dir.display());

    let store = FileStore::new(&config.save_dir).with_context(|| {
        format!("failed to open save directory {}", config.save_dir.display())
    })?;

    println!("Logs: {}", log_file.display());
    let mut gauntlet = Gauntlet::new(config, Arc::new(store));
    let outcome = gauntlet.run(&mut Prompt::stdin()).await?;

    match outcome {
        RunOutcome::Cleared => println!("\nThe gauntlet is cleared. Rest well."),
        RunOutcome::Retreated => println!("\nYou limp back to the overworld."),
        RunOutcome::Fallen => println!("\nYour story ends here."),
        RunOutcome::Quit => println!("\nSee you next time."),
    }
    tracing::info!("Run finished: {:?}", outcome);
    Ok(())
}
