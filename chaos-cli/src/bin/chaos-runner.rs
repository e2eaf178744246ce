//! Starts the chaos proxy engine located next to this executable, forwarding
//! all arguments and exiting with the engine's exit code.

use anyhow::Result;
use chaos_cli::{launcher, logging};

fn main() -> Result<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    logging::init(&level)?;

    if let Some(code) = launcher::run(std::env::args_os().skip(1))? {
        std::process::exit(code);
    }
    Ok(())
}
