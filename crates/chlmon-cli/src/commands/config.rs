//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use crate::workspace::Workspace;
use anyhow::Result;
use chlmon_core::config::CliConfigOverrides;

pub fn execute(overrides: CliConfigOverrides, output: &OutputWriter) -> Result<()> {
    let workspace = Workspace::find()?;
    let config = workspace.load_config(overrides)?;

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow {
            key,
            value,
            source: format!("{:?}", source),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(rows)?;
    } else {
        output.section("Configuration");
        output.table(rows);
    }

    Ok(())
}
