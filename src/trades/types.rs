// =============================================================================
// TRADE RECORD INPUT TYPES
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of trade execution as reported by the import pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
    Swap,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "buy",
            TradeType::Sell => "sell",
            TradeType::Swap => "swap",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One already-parsed, already-priced trade execution
///
/// Supplied by the import pipeline and read-only to the tracker. `token_in` /
/// `amount_in` describe what the wallet gave up, `token_out` / `amount_out`
/// what it received. Prices are per-unit and optional; a missing price is
/// treated as zero during classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: String,
    pub wallet_address: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub amount_out: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_out: Option<f64>,
    pub fees: f64,
    pub block_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_camel_case_boundary_names() {
        let trade = TradeRecord {
            id: "t1".to_string(),
            wallet_address: "wallet1".to_string(),
            trade_type: TradeType::Buy,
            token_in: "SOL".to_string(),
            token_out: "BONK".to_string(),
            amount_in: 1.0,
            amount_out: 1000.0,
            price_in: None,
            price_out: Some(0.001),
            fees: 0.01,
            block_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&trade).expect("serialize trade");
        assert_eq!(json["walletAddress"], "wallet1");
        assert_eq!(json["type"], "buy");
        assert_eq!(json["tokenOut"], "BONK");
        assert_eq!(json["priceOut"], 0.001);
        // Absent optional prices are omitted entirely
        assert!(json.get("priceIn").is_none());
    }

    #[test]
    fn deserializes_lowercase_trade_types() {
        let json = r#"{
            "id": "t2",
            "walletAddress": "wallet1",
            "type": "swap",
            "tokenIn": "SOL",
            "tokenOut": "BONK",
            "amountIn": 1.0,
            "amountOut": 1000.0,
            "fees": 0.0,
            "blockTime": "2024-05-01T12:00:00Z"
        }"#;

        let trade: TradeRecord = serde_json::from_str(json).expect("deserialize trade");
        assert_eq!(trade.trade_type, TradeType::Swap);
        assert_eq!(trade.price_in, None);
    }
}
