use std::path::PathBuf;
use subtab_core::FieldKind;
use subtab_extract::TabulationEngine;

/// Strategy for displaying the effective configuration.
///
/// Builds the engine as well, so a broken pattern is reported here rather
/// than on the first render.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.as_deref())?;
        let engine = TabulationEngine::new(&config.engine)?;
        let engine_config = &config.engine;

        println!("=== subtab Configuration ===\n");

        println!("Gate:");
        println!("  Mode: {}", engine_config.gate.as_str());
        println!("  Domain Keywords: {}", engine_config.domain_keywords.len());
        println!("  Period Keywords: {}", engine_config.period_keywords.len());
        println!();

        println!("Patterns:");
        for field in FieldKind::ALL {
            println!(
                "  {}: {}",
                field.as_str(),
                engine.library().chain(field).len()
            );
            for def in engine_config.patterns.iter().filter(|d| d.field == field) {
                println!("    - {} ({})", def.id, def.kind.as_str());
            }
        }
        println!();

        println!("Table:");
        println!("  Format: {}", engine_config.table.format.as_str());
        println!("  Empty Cell: {:?}", engine_config.table.empty_cell);
        println!("  Closing Phrases: {}", engine_config.closing_phrases.len());
        println!();

        println!("Output:");
        println!("  JSON Pretty: {}", config.output.json_pretty);

        Ok(())
    }
}
