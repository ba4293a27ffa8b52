use serde::Serialize;
use std::path::PathBuf;
use subtab_core::{ListStyle, SubsidyRecord, format_yen};
use subtab_extract::{ExtractionResult, SpliceLayout, TabulationEngine};

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Answer file; stdin when absent
    pub file: Option<PathBuf>,
    /// Optional explicit config file
    pub config: Option<PathBuf>,
}

/// Strategy for printing extracted records as JSON.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config.as_deref())?;
        let engine = TabulationEngine::new(&config.engine)?;
        let text = super::read_answer(input.file.as_deref())?;

        let result = engine.extract(&text);
        let report = ExtractReport::from_result(result.as_ref());

        let json = if config.output.json_pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RecordView<'a> {
    #[serde(flatten)]
    record: &'a SubsidyRecord,
    amount_display: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    has_matches: bool,
    style: Option<ListStyle>,
    layout: Option<SpliceLayout>,
    records: Vec<RecordView<'a>>,
    before: &'a str,
    after: &'a str,
}

impl<'a> ExtractReport<'a> {
    fn from_result(result: Option<&'a ExtractionResult<'_>>) -> Self {
        let Some(result) = result else {
            return Self {
                has_matches: false,
                style: None,
                layout: None,
                records: Vec::new(),
                before: "",
                after: "",
            };
        };

        Self {
            has_matches: true,
            style: Some(result.style),
            layout: Some(result.layout),
            records: result
                .records
                .iter()
                .map(|record| RecordView {
                    record,
                    amount_display: record.amount_normalized.map(format_yen),
                })
                .collect(),
            before: result.before,
            after: result.after,
        }
    }
}
