use thiserror::Error;

/// Unified error type for the entire dgi-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Spreadsheet I/O ─────────────────────────────────────────────
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Missing column '{0}' in transaction sheet")]
    MissingColumn(String),

    #[error("Cannot parse numeric value: '{0}'")]
    InvalidNumber(String),

    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Market data ─────────────────────────────────────────────────
    #[error("Market field '{field}' not available for {symbol}")]
    MissingField {
        symbol: String,
        field: String,
    },

    #[error("No price history returned for {0}")]
    EmptyHistory(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<calamine::XlsxError> for CoreError {
    fn from(e: calamine::XlsxError) -> Self {
        CoreError::Spreadsheet(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CoreError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        CoreError::Spreadsheet(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs embedded in reqwest error
        // messages; they can carry symbols and request details.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
