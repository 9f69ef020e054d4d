//! CSV export of transaction lists.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::{
    errors::{LedgerError, Result},
    ledger::{Transaction, DATE_FORMAT},
    utils::paths,
};

pub const CSV_HEADERS: [&str; 6] = ["id", "date", "type", "amount", "category", "note"];

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Renders `transactions` as CSV in the order given.
///
/// The header row is bare; every data field is quoted with embedded quotes
/// doubled. Rows are separated by `\n` with no trailing newline.
pub fn export_csv(transactions: &[Transaction]) -> Result<String> {
    if transactions.is_empty() {
        return Err(LedgerError::NothingToExport);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for txn in transactions {
        writer.write_record(record(txn))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| LedgerError::Io(err.into_error()))?;
    let body = String::from_utf8(bytes)
        .map_err(|err| LedgerError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))?;

    let mut out = CSV_HEADERS.join(",");
    out.push('\n');
    out.push_str(body.trim_end_matches('\n'));
    Ok(out)
}

fn record(txn: &Transaction) -> [String; 6] {
    [
        txn.id.to_string(),
        txn.date.format(DATE_FORMAT).to_string(),
        txn.kind.as_str().to_string(),
        txn.amount.to_string(),
        txn.category.clone(),
        txn.note.clone(),
    ]
}

/// `transactions-YYYY-MM-DD-HH-MM-SS.csv`, stamped in UTC.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("transactions-{}.csv", now.format(FILE_TIMESTAMP_FORMAT))
}

/// Writes an export file into `dir`. Nothing is created when the list is
/// empty.
pub fn write_export(
    dir: &Path,
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let csv = export_csv(transactions)?;
    paths::ensure_dir(dir)?;
    let path = dir.join(export_file_name(now));
    fs::write(&path, csv)?;
    info!(path = %path.display(), rows = transactions.len(), "transactions exported");
    Ok(path)
}
