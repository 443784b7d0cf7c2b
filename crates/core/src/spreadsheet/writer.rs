use std::path::Path;

use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::errors::CoreError;
use crate::models::fields::{PortfolioField, PORTFOLIO_COLUMNS, SUMMARY_FIELDS};
use crate::models::position::{PortfolioPosition, PortfolioReport};

/// Placeholder written where the market-data source omitted a field.
const MISSING_FIELD: &str = "N/A";

/// Write the portfolio workbook: a `portfolio` detail sheet (one row per
/// symbol) and a `summary` sheet with column-wise totals.
pub fn write_portfolio(report: &PortfolioReport, path: &Path) -> Result<(), CoreError> {
    let mut workbook = Workbook::new();

    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("$#,##0.00");
    let percent = Format::new().set_num_format("0.00%");

    let sheet = workbook.add_worksheet();
    sheet.set_name("portfolio")?;
    write_detail_sheet(sheet, report, &header, &money, &percent)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("summary")?;
    write_summary_sheet(sheet, report, &header, &money)?;

    workbook.save(path)?;
    debug!("wrote portfolio workbook to {}", path.display());
    Ok(())
}

fn write_detail_sheet(
    sheet: &mut Worksheet,
    report: &PortfolioReport,
    header: &Format,
    money: &Format,
    percent: &Format,
) -> Result<(), CoreError> {
    for (col, field) in PORTFOLIO_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, field.label(), header)?;
    }

    for (idx, row) in report.positions.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, field) in PORTFOLIO_COLUMNS.iter().enumerate() {
            let c = col as u16;
            write_cell(sheet, r, c, *field, row, money, percent)?;
        }
    }

    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    r: u32,
    c: u16,
    field: PortfolioField,
    row: &PortfolioPosition,
    money: &Format,
    percent: &Format,
) -> Result<(), CoreError> {
    let position = &row.position;
    let snapshot = &row.snapshot;

    match field {
        PortfolioField::Symbol => sheet.write_string(r, c, &position.symbol)?,
        PortfolioField::Quantity => sheet.write_number(r, c, position.quantity)?,
        PortfolioField::Principal => {
            sheet.write_number_with_format(r, c, position.principal, money)?
        }
        PortfolioField::Commission => {
            sheet.write_number_with_format(r, c, position.commission, money)?
        }
        PortfolioField::Tranches => sheet.write_number(r, c, position.tranches as f64)?,
        PortfolioField::Sector => write_opt_string(sheet, r, c, snapshot.sector.as_deref())?,
        PortfolioField::Name => write_opt_string(sheet, r, c, snapshot.short_name.as_deref())?,
        PortfolioField::ClosingPrice => {
            write_opt_number(sheet, r, c, snapshot.previous_close, Some(money))?
        }
        PortfolioField::ForwardDivRate => {
            write_opt_number(sheet, r, c, snapshot.dividend_rate, Some(money))?
        }
        PortfolioField::ForwardDivYield => {
            write_opt_number(sheet, r, c, snapshot.dividend_yield, Some(percent))?
        }
        PortfolioField::ForwardPe => write_opt_number(sheet, r, c, snapshot.forward_pe, None)?,
        PortfolioField::ForwardEps => write_opt_number(sheet, r, c, snapshot.forward_eps, None)?,
        PortfolioField::PriceToBook => {
            write_opt_number(sheet, r, c, snapshot.price_to_book, None)?
        }
        PortfolioField::PayoutRatio => {
            write_opt_number(sheet, r, c, snapshot.payout_ratio, Some(percent))?
        }
        PortfolioField::ExDivDate => {
            match snapshot.ex_dividend_date {
                Some(date) => sheet.write_string(r, c, date.to_string())?,
                None => sheet.write_string(r, c, MISSING_FIELD)?,
            }
        }
        PortfolioField::MarketCap => write_opt_number(sheet, r, c, snapshot.market_cap, None)?,
        PortfolioField::CashFlow => {
            sheet.write_number_with_format(r, c, row.cash_flow, money)?
        }
        PortfolioField::CashFlowPercent => {
            sheet.write_number_with_format(r, c, row.cash_flow_pct, percent)?
        }
        PortfolioField::MarketValue => {
            sheet.write_number_with_format(r, c, row.market_value, money)?
        }
        PortfolioField::MarketValuePercent => {
            sheet.write_number_with_format(r, c, row.market_value_pct, percent)?
        }
        PortfolioField::YieldOnCost => {
            sheet.write_number_with_format(r, c, row.yield_on_cost, percent)?
        }
    };

    Ok(())
}

fn write_opt_string<'a>(
    sheet: &'a mut Worksheet,
    r: u32,
    c: u16,
    value: Option<&str>,
) -> Result<&'a mut Worksheet, rust_xlsxwriter::XlsxError> {
    match value {
        Some(s) => sheet.write_string(r, c, s),
        None => sheet.write_string(r, c, MISSING_FIELD),
    }
}

fn write_opt_number<'a>(
    sheet: &'a mut Worksheet,
    r: u32,
    c: u16,
    value: Option<f64>,
    format: Option<&Format>,
) -> Result<&'a mut Worksheet, rust_xlsxwriter::XlsxError> {
    match (value, format) {
        (Some(v), Some(f)) => sheet.write_number_with_format(r, c, v, f),
        (Some(v), None) => sheet.write_number(r, c, v),
        (None, _) => sheet.write_string(r, c, MISSING_FIELD),
    }
}

/// Label/value rows, one per totalled column.
fn write_summary_sheet(
    sheet: &mut Worksheet,
    report: &PortfolioReport,
    header: &Format,
    money: &Format,
) -> Result<(), CoreError> {
    let totals = &report.totals;

    for (idx, field) in SUMMARY_FIELDS.iter().enumerate() {
        let r = idx as u32;
        sheet.write_string_with_format(r, 0, field.label(), header)?;
        match field {
            PortfolioField::Quantity => sheet.write_number(r, 1, totals.quantity)?,
            PortfolioField::Principal => {
                sheet.write_number_with_format(r, 1, totals.principal, money)?
            }
            PortfolioField::CashFlow => {
                sheet.write_number_with_format(r, 1, totals.cash_flow, money)?
            }
            PortfolioField::Commission => {
                sheet.write_number_with_format(r, 1, totals.commission, money)?
            }
            PortfolioField::MarketValue => {
                sheet.write_number_with_format(r, 1, totals.market_value, money)?
            }
            _ => unreachable!("SUMMARY_FIELDS is a fixed set"),
        };
    }

    Ok(())
}
