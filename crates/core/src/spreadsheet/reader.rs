use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use log::debug;

use crate::errors::CoreError;
use crate::models::fields::TransactionField;
use crate::models::transaction::{parse_currency, Transaction};

/// Sheet the broker export writes its transactions to.
const TRANSACTION_SHEET: &str = "Sheet1";

/// Read the brokerage transaction export.
///
/// Columns are resolved by header label, not position, so the broker can
/// reorder them. Numeric cells are taken as-is; text cells go through
/// currency normalization (`"$1,234.56"` → `1234.56`). Rows with an empty
/// symbol cell are skipped.
pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>, CoreError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(TRANSACTION_SHEET)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| CoreError::Spreadsheet("transaction sheet is empty".into()))?;
    let columns = resolve_columns(header)?;

    let mut transactions = Vec::new();
    for row in rows {
        let symbol = cell_to_string(columns.cell(row, TransactionField::Symbol));
        if symbol.is_empty() {
            continue;
        }

        transactions.push(Transaction {
            symbol: symbol.to_uppercase(),
            trade_date: columns
                .try_cell(row, TransactionField::TradeDate)
                .and_then(cell_to_date),
            quantity: cell_to_f64(columns.cell(row, TransactionField::Quantity))?,
            principal: cell_to_f64(columns.cell(row, TransactionField::Principal))?,
            commission: cell_to_f64(columns.cell(row, TransactionField::Commission))?,
            price: cell_to_f64(columns.cell(row, TransactionField::Price))?,
            other_fees: columns
                .try_cell(row, TransactionField::OtherFees)
                .map(cell_to_f64)
                .transpose()?
                .unwrap_or(0.0),
            net_amount: columns
                .try_cell(row, TransactionField::NetAmount)
                .map(cell_to_f64)
                .transpose()?
                .unwrap_or(0.0),
        });
    }

    debug!("read {} transaction rows from {}", transactions.len(), path.display());
    Ok(transactions)
}

/// Header-label → column-index mapping for one sheet.
struct ColumnMap {
    indices: HashMap<&'static str, usize>,
}

impl ColumnMap {
    /// Cell for a field that `resolve_columns` guaranteed to exist.
    fn cell<'r>(&self, row: &'r [Data], field: TransactionField) -> &'r Data {
        &row[self.indices[field.label()]]
    }

    /// Cell for an optional field (bookkeeping columns some exports drop).
    fn try_cell<'r>(&self, row: &'r [Data], field: TransactionField) -> Option<&'r Data> {
        self.indices.get(field.label()).map(|&idx| &row[idx])
    }
}

/// Locate the required columns in the header row. Symbol and the summed
/// numeric columns (plus price) must be present; the rest are optional.
fn resolve_columns(header: &[Data]) -> Result<ColumnMap, CoreError> {
    let mut indices = HashMap::new();
    for (idx, cell) in header.iter().enumerate() {
        if let Data::String(s) = cell {
            let label = s.trim();
            for field in [
                TransactionField::Symbol,
                TransactionField::TradeDate,
                TransactionField::Cusip,
                TransactionField::OrderId,
                TransactionField::Quantity,
                TransactionField::Principal,
                TransactionField::Commission,
                TransactionField::Price,
                TransactionField::OtherFees,
                TransactionField::NetAmount,
            ] {
                if label == field.label() {
                    indices.insert(field.label(), idx);
                }
            }
        }
    }

    for required in [
        TransactionField::Symbol,
        TransactionField::Quantity,
        TransactionField::Principal,
        TransactionField::Commission,
        TransactionField::Price,
    ] {
        if !indices.contains_key(required.label()) {
            return Err(CoreError::MissingColumn(required.label().to_string()));
        }
    }

    Ok(ColumnMap { indices })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_f64(cell: &Data) -> Result<f64, CoreError> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => parse_currency(s),
        Data::Empty => Ok(0.0),
        other => Err(CoreError::InvalidNumber(other.to_string())),
    }
}

fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|ndt| ndt.date()),
        Data::String(s) => {
            let trimmed = s.trim();
            NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
                .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
                .ok()
        }
        _ => None,
    }
}
