//! Spreadsheet and JSON export of scraped records.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::ValueEnum;
use shelfscan_core::ProductRecord;

pub(crate) const CSV_HEADER: [&str; 6] = [
    "Scraped Date",
    "Product Name",
    "Image URL",
    "Barcode",
    "Normal Price",
    "Promotion Price",
];

const SCRAPED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lets spreadsheet tools detect UTF-8 so Thai product names display correctly.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<dir>/products_<YYYYmmdd_HHMM>.<ext>`, stamped with the run start.
pub(crate) fn default_output_path(
    dir: &Path,
    scraped_at: DateTime<Local>,
    format: ExportFormat,
) -> PathBuf {
    dir.join(format!(
        "products_{}.{}",
        scraped_at.format("%Y%m%d_%H%M"),
        format.extension()
    ))
}

/// Writes `records` to `path`, creating missing parent directories.
pub(crate) fn write_records(
    path: &Path,
    format: ExportFormat,
    records: &[ProductRecord],
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let out = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(out, records),
        ExportFormat::Json => write_json(out, records),
    }
}

pub(crate) fn write_csv<W: Write>(mut out: W, records: &[ProductRecord]) -> anyhow::Result<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for record in records {
        let scraped_date = record.scraped_at.format(SCRAPED_DATE_FORMAT).to_string();
        writer.write_record([
            scraped_date.as_str(),
            record.name.as_str(),
            record.image_url.as_str(),
            record.barcode.as_str(),
            record.normal_price.as_str(),
            record.promotion_price.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_json<W: Write>(mut out: W, records: &[ProductRecord]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, records)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
