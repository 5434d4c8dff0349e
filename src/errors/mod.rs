use thiserror::Error;

/// Failure families for the position tracker.
///
/// Every variant renders to the diagnostic string that ends up in a
/// calculation result's `errors` or `warnings` list. The calculation entry
/// points themselves never return `Err`: diagnostics are accumulated and the
/// result bundle always comes back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Invalid trade data for {trade_id}: {reason}")] InvalidTradeData {
        trade_id: String,
        reason: String,
    },

    #[error("Failed to classify trade {trade_id}: {reason}")] Classification {
        trade_id: String,
        reason: String,
    },

    #[error(
        "Oversold inventory for {token} in wallet {wallet}: sell of {requested} exceeds available {available} (trade {trade_id})"
    )] Oversold {
        token: String,
        wallet: String,
        trade_id: String,
        requested: f64,
        available: f64,
    },

    #[error(
        "No prior holdings of {token} in wallet {wallet} for sell trade {trade_id} (possible short sale, not modeled)"
    )] NoHoldings {
        token: String,
        wallet: String,
        trade_id: String,
    },

    #[error("Mixed wallet addresses in single-wallet input: {0}")] MixedWallets(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Fatal error in position calculation: {0}")] Fatal(String),
}

impl TrackerError {
    /// Whether this failure is a recoverable data anomaly (reported as a
    /// warning) rather than a genuine per-trade processing failure.
    pub fn is_data_warning(&self) -> bool {
        match self {
            TrackerError::InvalidTradeData { .. } => true,
            TrackerError::Oversold { .. } => true,
            TrackerError::NoHoldings { .. } => true,
            TrackerError::MixedWallets(_) => true,
            _ => false,
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
