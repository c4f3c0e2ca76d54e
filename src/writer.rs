use std::path::Path;

use tokio::fs;

use crate::record::{ReviewRecord, ReviewTable};
use crate::Result;

/// Serializes the table as CSV. The header row is written even when the table is empty.
pub fn table_to_csv(table: &ReviewTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ReviewRecord::FIELDS)?;
    for record in table.records() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(writer.into_inner()?)
}

pub async fn write_table(table: &ReviewTable, path: &Path) -> Result<()> {
    let bytes = table_to_csv(table)?;
    fs::write(path, bytes).await?;
    Ok(())
}
