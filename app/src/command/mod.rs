//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own type and input, so
//! dispatch is resolved at compile time.

use anyhow::Context;
use std::io::Read;
use std::path::Path;
use subtab_config::Config;

mod extract;
mod info;
mod init;
mod render;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use render::{RenderInput, RenderStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Extraction never suspends, so strategies are plain synchronous calls.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Load the explicit config file when given, otherwise the default one.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    path.map_or_else(Config::load, Config::load_from)
}

/// Read an answer from `path`, or from stdin when no path is given.
fn read_answer(path: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}
