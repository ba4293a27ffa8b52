use anyhow::Context;
use rayon::prelude::*;
use std::path::PathBuf;
use subtab_core::ScriptStripper;
use subtab_extract::TabulationEngine;
use tracing::info;

/// Input parameters for the Render command strategy.
#[derive(Debug, Clone)]
pub struct RenderInput {
    /// Answer files; stdin when empty
    pub files: Vec<PathBuf>,
    /// Optional explicit config file
    pub config: Option<PathBuf>,
}

/// Strategy for rendering answers with a spliced records table.
///
/// Every output goes through the script stripper, whether or not a table
/// was produced. Multiple files are rendered in parallel against one shared
/// engine and printed in argument order.
#[derive(Debug, Clone, Copy)]
pub struct RenderStrategy;

impl super::CommandStrategy for RenderStrategy {
    type Input = RenderInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config.as_deref())?;
        let engine = TabulationEngine::new(&config.engine)?;
        let stripper = ScriptStripper::new()?;

        if input.files.is_empty() {
            let text = super::read_answer(None)?;
            println!("{}", render_answer(&engine, &stripper, &text));
            return Ok(());
        }

        info!("Rendering {} file(s)", input.files.len());

        let outputs: Vec<anyhow::Result<String>> = input
            .files
            .par_iter()
            .map(|path| {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(render_answer(&engine, &stripper, &text))
            })
            .collect();

        let show_headers = input.files.len() > 1;
        for (path, output) in input.files.iter().zip(outputs) {
            let output = output?;
            if show_headers {
                println!("==> {} <==", path.display());
            }
            println!("{output}");
        }

        Ok(())
    }
}

/// Annotate, then sanitize. The two passes stay independent.
fn render_answer(engine: &TabulationEngine, stripper: &ScriptStripper, text: &str) -> String {
    let annotated = engine.annotate(text);
    stripper.strip(&annotated).into_owned()
}
