//! Presets command implementation

use crate::cli::PresetsArgs;
use crate::output::OutputWriter;
use crate::output_types::PresetRow;
use anyhow::Result;
use aoiscan_core::widget::{generate_config_url, Preset};

pub fn execute(args: PresetsArgs, output: &OutputWriter) -> Result<()> {
    let rows = Preset::ALL
        .iter()
        .map(|preset| -> Result<PresetRow> {
            let config = preset.config();
            let url = args
                .base_url
                .as_deref()
                .map(|base| generate_config_url(base, &config))
                .transpose()?;
            let resolved = config.resolve();

            Ok(PresetRow {
                name: preset.name().to_string(),
                report_title: resolved.report_title,
                layer_count: resolved.layers.len(),
                basemap: resolved.basemap,
                url,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if output.is_json() {
        return output.result(&rows);
    }

    output.section("Presets");
    output.table(rows);
    Ok(())
}
