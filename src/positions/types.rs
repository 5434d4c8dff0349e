// =============================================================================
// POSITION OUTPUT TYPES
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Side of a position a linked trade sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeRole {
    Entry,
    Exit,
}

/// One reconstructed holding: either the result of a sell matched against
/// prior lots (closed) or the leftover inventory of a token at end-of-run
/// (open).
///
/// Positions are immutable once emitted. `unrealized_pnl` is always zero in
/// this core; live pricing happens outside it and the field keeps the
/// persistence schema stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub wallet_address: String,
    pub open_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<DateTime<Utc>>,
    pub status: PositionStatus,
    pub total_quantity: f64,
    pub avg_entry_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_exit_price: Option<f64>,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub fees: f64,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == PositionStatus::Closed
    }
}

/// Join record between a position and one trade (or trade fragment) that
/// built or closed it. One row per consumed lot fragment plus one row for
/// the triggering exit trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTrade {
    pub id: String,
    pub position_id: String,
    pub trade_id: String,
    pub role: TradeRole,
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
    pub timestamp: DateTime<Utc>,
}

/// Bundle returned by every calculation run
///
/// `errors` holds per-trade processing failures, `warnings` recoverable data
/// anomalies. Both are advisory; neither aborts a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCalculationResult {
    pub positions: Vec<Position>,
    pub position_trades: Vec<PositionTrade>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PositionCalculationResult {
    /// Positions still holding inventory
    pub fn open_positions(&self) -> Vec<&Position> {
        self.positions.iter().filter(|p| p.is_open()).collect()
    }

    /// Positions closed by a sell
    pub fn closed_positions(&self) -> Vec<&Position> {
        self.positions.iter().filter(|p| p.is_closed()).collect()
    }

    /// Sum of realized P&L across all positions
    pub fn total_realized_pnl(&self) -> f64 {
        self.positions.iter().map(|p| p.realized_pnl).sum()
    }

    /// Fold another result bundle into this one (multi-wallet concatenation)
    pub fn merge(&mut self, other: PositionCalculationResult) {
        self.positions.extend(other.positions);
        self.position_trades.extend(other.position_trades);
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
