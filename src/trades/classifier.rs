// =============================================================================
// TRADE CLASSIFICATION
// =============================================================================

use crate::errors::{TrackerError, TrackerResult};
use crate::trades::types::{TradeRecord, TradeType};

/// Inventory-level view of one trade: which token it touches, by how much,
/// at what unit price, and in which direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTrade {
    pub token: String,
    pub quantity: f64,
    pub price: f64,
    pub is_buy: bool,
}

/// Classify a trade record into its inventory effect.
///
/// - `buy`: inventory-increasing on the out leg (`token_out` / `amount_out`
///   at `price_out`).
/// - `sell`: inventory-decreasing on the in leg (`token_in` / `amount_in` at
///   `price_in`).
/// - `swap`: booked as a buy of the out leg only. The in leg (what was given
///   up) is intentionally not booked as a sell; a swap therefore never
///   consumes lots of the surrendered token.
///
/// A missing price defaults to zero. Non-finite numbers are a classification
/// failure (the record is corrupt); an empty token or non-positive quantity
/// is invalid data the caller skips with a warning.
pub fn classify_trade(trade: &TradeRecord) -> TrackerResult<ClassifiedTrade> {
    let (token, quantity, price, is_buy) = match trade.trade_type {
        TradeType::Buy | TradeType::Swap => (
            trade.token_out.clone(),
            trade.amount_out,
            trade.price_out.unwrap_or(0.0),
            true,
        ),
        TradeType::Sell => (
            trade.token_in.clone(),
            trade.amount_in,
            trade.price_in.unwrap_or(0.0),
            false,
        ),
    };

    if !quantity.is_finite() {
        return Err(TrackerError::Classification {
            trade_id: trade.id.clone(),
            reason: format!("{} amount is not finite: {}", trade.trade_type, quantity),
        });
    }
    if !price.is_finite() {
        return Err(TrackerError::Classification {
            trade_id: trade.id.clone(),
            reason: format!("{} price is not finite: {}", trade.trade_type, price),
        });
    }
    if !trade.fees.is_finite() {
        return Err(TrackerError::Classification {
            trade_id: trade.id.clone(),
            reason: format!("fees are not finite: {}", trade.fees),
        });
    }

    if token.is_empty() {
        return Err(TrackerError::InvalidTradeData {
            trade_id: trade.id.clone(),
            reason: format!("missing token on {} trade", trade.trade_type),
        });
    }
    if quantity <= 0.0 {
        return Err(TrackerError::InvalidTradeData {
            trade_id: trade.id.clone(),
            reason: format!("non-positive quantity {} on {} trade", quantity, trade.trade_type),
        });
    }

    Ok(ClassifiedTrade {
        token,
        quantity,
        price,
        is_buy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn base_trade(trade_type: TradeType) -> TradeRecord {
        TradeRecord {
            id: "t1".to_string(),
            wallet_address: "wallet1".to_string(),
            trade_type,
            token_in: "SOL".to_string(),
            token_out: "BONK".to_string(),
            amount_in: 2.0,
            amount_out: 1000.0,
            price_in: Some(150.0),
            price_out: Some(0.001),
            fees: 0.01,
            block_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn buy_uses_out_leg() {
        let classified = classify_trade(&base_trade(TradeType::Buy)).expect("classify buy");
        assert_eq!(classified.token, "BONK");
        assert_eq!(classified.quantity, 1000.0);
        assert_eq!(classified.price, 0.001);
        assert!(classified.is_buy);
    }

    #[test]
    fn sell_uses_in_leg() {
        let classified = classify_trade(&base_trade(TradeType::Sell)).expect("classify sell");
        assert_eq!(classified.token, "SOL");
        assert_eq!(classified.quantity, 2.0);
        assert_eq!(classified.price, 150.0);
        assert!(!classified.is_buy);
    }

    #[test]
    fn swap_is_booked_as_buy_of_out_leg() {
        let classified = classify_trade(&base_trade(TradeType::Swap)).expect("classify swap");
        assert_eq!(classified.token, "BONK");
        assert!(classified.is_buy);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let mut trade = base_trade(TradeType::Buy);
        trade.price_out = None;
        let classified = classify_trade(&trade).expect("classify");
        assert_eq!(classified.price, 0.0);
    }

    #[test]
    fn empty_token_is_invalid_data() {
        let mut trade = base_trade(TradeType::Buy);
        trade.token_out = String::new();
        let err = classify_trade(&trade).unwrap_err();
        assert!(err.is_data_warning());
    }

    #[test]
    fn zero_quantity_is_invalid_data() {
        let mut trade = base_trade(TradeType::Sell);
        trade.amount_in = 0.0;
        let err = classify_trade(&trade).unwrap_err();
        assert!(err.is_data_warning());
    }

    #[test]
    fn non_finite_amount_is_a_classification_failure() {
        let mut trade = base_trade(TradeType::Buy);
        trade.amount_out = f64::NAN;
        let err = classify_trade(&trade).unwrap_err();
        assert!(!err.is_data_warning());
        assert!(err.to_string().contains("t1"));
    }
}
