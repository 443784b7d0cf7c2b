pub mod chart_service;
pub mod dividend_service;
pub mod portfolio_service;
