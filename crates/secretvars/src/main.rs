//! secretvars - sample entry point
//!
//! Declares a few variables, prompts for any that are missing, reads them
//! back and prints them. The secrets file is purged afterwards so every run
//! prompts again.
//!
//! Set RUST_LOG=secretvars=debug to see store activity on stderr.

use anyhow::{Context, Result};
use secretvars::{Config, ConsoleReader, Paths, SecretsStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the prompts
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;
    let secrets_path = config.secrets_path(&paths);

    tracing::info!(path = %secrets_path.display(), "Opening secrets store");

    let mut store = SecretsStore::open_with(&secrets_path, config.store)
        .with_context(|| format!("Failed to open secrets: {}", secrets_path.display()))?;

    store
        .declare("hello", false)?
        .declare("leggo", false)?
        .declare("hugh", false)?
        .fill_missing(&mut ConsoleReader::stdio())?
        .save()?;

    let hello = store.get("hello")?.to_string();
    let leggo = store.get("leggo")?.to_string();
    let hugh = store.get("hugh")?.to_string();

    store.purge()?;

    println!("{}", hello);
    println!("{}", leggo);
    println!("{}", hugh);

    Ok(())
}
