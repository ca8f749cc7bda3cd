//! `cell_id,value` output files

use anyhow::Context;
use chrono::NaiveDateTime;
use shared_types::MappingReport;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default output name, e.g. `tax_form_data_GIFI_20240131_142501.csv`
pub fn default_file_name(dictionary: &str, at: NaiveDateTime) -> String {
    format!(
        "tax_form_data_{}_{}.csv",
        dictionary,
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Write the mapped cells, one row each, in emission order
pub fn write_report<W: Write>(report: &MappingReport, writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["cell_id", "value"])?;
    for (cell_id, value) in report.rows() {
        csv.write_record([cell_id, value])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_report_file(report: &MappingReport, path: &Path) -> anyhow::Result<()> {
    info!(
        path = %path.display(),
        "Generating CSV with {} mapped items",
        report.mapped.len()
    );
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_report(report, file).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "CSV file saved");
    Ok(())
}
