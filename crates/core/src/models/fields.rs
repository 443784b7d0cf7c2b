/// Column name constants for the broker export and the generated workbook.
///
/// The broker writes human-readable headers ("Qty", "Comm", ...); everything
/// in the core addresses columns through these enums and resolves the display
/// string via `label()`. A flat mapping, no behavior attached.

/// Columns of the Trade Station transaction export (sheet `Sheet1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Symbol,
    TradeDate,
    Cusip,
    OrderId,
    Quantity,
    Principal,
    Commission,
    Price,
    OtherFees,
    NetAmount,
}

impl TransactionField {
    /// The header string as it appears in the export.
    pub const fn label(self) -> &'static str {
        match self {
            TransactionField::Symbol => "Symbol",
            TransactionField::TradeDate => "Date",
            TransactionField::Cusip => "Cusip",
            TransactionField::OrderId => "Order Id",
            TransactionField::Quantity => "Qty",
            TransactionField::Principal => "Principal",
            TransactionField::Commission => "Comm",
            TransactionField::Price => "Price",
            TransactionField::OtherFees => "Other Fees",
            TransactionField::NetAmount => "Net Amt",
        }
    }
}

/// Numeric columns that are summed per symbol during aggregation.
/// These may arrive currency-formatted and are normalized on read.
pub const SUMMED_FIELDS: [TransactionField; 3] = [
    TransactionField::Quantity,
    TransactionField::Principal,
    TransactionField::Commission,
];

/// Broker bookkeeping columns that never reach the portfolio sheet.
pub const DROPPED_FIELDS: [TransactionField; 6] = [
    TransactionField::TradeDate,
    TransactionField::Cusip,
    TransactionField::OrderId,
    TransactionField::OtherFees,
    TransactionField::NetAmount,
    TransactionField::Price,
];

/// Columns of the generated portfolio workbook: the summed transaction
/// columns plus per-symbol market fields and derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioField {
    Symbol,
    Quantity,
    Principal,
    Commission,
    Tranches,
    Sector,
    Name,
    ClosingPrice,
    ForwardDivRate,
    ForwardDivYield,
    ForwardPe,
    ForwardEps,
    PriceToBook,
    PayoutRatio,
    ExDivDate,
    MarketCap,
    CashFlow,
    CashFlowPercent,
    MarketValue,
    MarketValuePercent,
    YieldOnCost,
}

impl PortfolioField {
    pub const fn label(self) -> &'static str {
        match self {
            PortfolioField::Symbol => "Symbol",
            PortfolioField::Quantity => "Qty",
            PortfolioField::Principal => "Principal",
            PortfolioField::Commission => "Comm",
            PortfolioField::Tranches => "Tranches",
            PortfolioField::Sector => "Sector",
            PortfolioField::Name => "Name",
            PortfolioField::ClosingPrice => "Closing Price",
            PortfolioField::ForwardDivRate => "Forward Div Rate",
            PortfolioField::ForwardDivYield => "Forward Div Yield",
            PortfolioField::ForwardPe => "Forward PE",
            PortfolioField::ForwardEps => "Forward EPS",
            PortfolioField::PriceToBook => "Price To Book",
            PortfolioField::PayoutRatio => "Payout Ratio",
            PortfolioField::ExDivDate => "Ex-Div Date",
            PortfolioField::MarketCap => "Market Cap",
            PortfolioField::CashFlow => "Position Cash Flow",
            PortfolioField::CashFlowPercent => "Position Cash Flow %",
            PortfolioField::MarketValue => "Position Market Value",
            PortfolioField::MarketValuePercent => "Position Market Value %",
            PortfolioField::YieldOnCost => "Position YOC",
        }
    }
}

/// Column order of the `portfolio` detail sheet.
pub const PORTFOLIO_COLUMNS: [PortfolioField; 21] = [
    PortfolioField::Symbol,
    PortfolioField::Quantity,
    PortfolioField::Principal,
    PortfolioField::Commission,
    PortfolioField::Tranches,
    PortfolioField::Sector,
    PortfolioField::Name,
    PortfolioField::ClosingPrice,
    PortfolioField::ForwardDivRate,
    PortfolioField::ForwardDivYield,
    PortfolioField::ForwardPe,
    PortfolioField::ForwardEps,
    PortfolioField::PriceToBook,
    PortfolioField::PayoutRatio,
    PortfolioField::ExDivDate,
    PortfolioField::MarketCap,
    PortfolioField::CashFlow,
    PortfolioField::CashFlowPercent,
    PortfolioField::MarketValue,
    PortfolioField::MarketValuePercent,
    PortfolioField::YieldOnCost,
];

/// Columns totalled on the `summary` sheet.
pub const SUMMARY_FIELDS: [PortfolioField; 5] = [
    PortfolioField::Quantity,
    PortfolioField::Principal,
    PortfolioField::CashFlow,
    PortfolioField::Commission,
    PortfolioField::MarketValue,
];
