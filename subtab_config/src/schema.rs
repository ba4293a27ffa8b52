use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use subtab_extract::EngineConfig;
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_json_pretty")]
    pub json_pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_pretty: Self::default_json_pretty(),
        }
    }
}

impl OutputConfig {
    const fn default_json_pretty() -> bool {
        true
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("subtab"))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/subtab/config.json`, falling back to built-in defaults when
    /// the file has not been created.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::default_path()?;

        if !config_path.exists() {
            info!(
                "No config file at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path; a missing file is an error here.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found at: {}", path.display());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("🔧 Configuration options:");
        println!("   - engine.gate: \"permissive\" (subsidy keywords) or \"strict\" (also period keywords)");
        println!("   - engine.patterns: field patterns, tried in order per field");
        println!("   - engine.table.format: \"html\" or \"markdown\"");
        println!("   - output.json_pretty: pretty-print `subtab extract` output");
        println!();
        Ok(config_path)
    }

    /// Write the default configuration to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(path, template)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtab_extract::{GateMode, TableFormat};

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty object should parse");
        assert_eq!(config, Config::default());
        assert!(config.output.json_pretty);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_engine_section() {
        let json = r#"{"engine":{"gate":"strict","table":{"format":"markdown"}}}"#;
        let config: Config = serde_json::from_str(json).expect("partial config should parse");
        assert_eq!(config.engine.gate, GateMode::Strict);
        assert_eq!(config.engine.table.format, TableFormat::Markdown);
        assert_eq!(config.engine.table.empty_cell, "-");
        assert!(!config.engine.patterns.is_empty());
    }
}
