// =============================================================================
// MANUAL GROUPING VALIDATOR
// =============================================================================

use std::collections::HashMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::logger::{self, LogTag};
use crate::trades::TradeRecord;

/// Outcome of a manual grouping integrity check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate a user-overridden trade-to-position grouping.
///
/// Pure integrity check over the trade list and a `position id -> trade ids`
/// mapping; it never touches FIFO state. Checks, per the grouping contract:
///
/// 1. Coverage: every input trade id appears in exactly one group. Missing,
///    duplicated and unknown ids are each reported separately.
/// 2. Token consistency: the tokens touched by a group's trades (union of
///    in/out legs) must not exceed two distinct tokens.
/// 3. Chronological order: trades must have non-decreasing block times in
///    the order the group lists them.
pub fn validate_manual_grouping(
    trades: &[TradeRecord],
    grouping: &HashMap<String, Vec<String>>,
) -> GroupingValidation {
    let mut errors = Vec::new();

    let trades_by_id: HashMap<&str, &TradeRecord> = trades
        .iter()
        .map(|trade| (trade.id.as_str(), trade))
        .collect();

    // Deterministic group traversal regardless of map iteration order
    let mut group_ids: Vec<&String> = grouping.keys().collect();
    group_ids.sort();

    // Coverage bookkeeping across all groups
    let mut assignment_counts: HashMap<&str, usize> = HashMap::new();

    for group_id in &group_ids {
        let trade_ids = &grouping[*group_id];

        let mut tokens: HashSet<&str> = HashSet::new();
        let mut previous: Option<&TradeRecord> = None;

        for trade_id in trade_ids {
            let Some(trade) = trades_by_id.get(trade_id.as_str()).copied() else {
                errors.push(format!(
                    "Group {} references unknown trade id {}",
                    group_id, trade_id
                ));
                continue;
            };

            *assignment_counts.entry(trade.id.as_str()).or_insert(0) += 1;

            if !trade.token_in.is_empty() {
                tokens.insert(trade.token_in.as_str());
            }
            if !trade.token_out.is_empty() {
                tokens.insert(trade.token_out.as_str());
            }

            if let Some(prev) = previous {
                if trade.block_time < prev.block_time {
                    errors.push(format!(
                        "Group {} is not in chronological order: trade {} ({}) listed after trade {} ({})",
                        group_id, trade.id, trade.block_time, prev.id, prev.block_time
                    ));
                }
            }
            previous = Some(trade);
        }

        if tokens.len() > 2 {
            let mut token_list: Vec<&str> = tokens.into_iter().collect();
            token_list.sort_unstable();
            errors.push(format!(
                "Group {} spans {} distinct tokens (max 2): {}",
                group_id,
                token_list.len(),
                token_list.join(", ")
            ));
        }
    }

    // Missing and duplicate ids, reported in input order
    for trade in trades {
        match assignment_counts.get(trade.id.as_str()) {
            None => errors.push(format!("Trade {} is not covered by any group", trade.id)),
            Some(count) if *count > 1 => errors.push(format!(
                "Trade {} is assigned {} times across groups",
                trade.id, count
            )),
            _ => {}
        }
    }

    let valid = errors.is_empty();
    if valid {
        logger::debug(
            LogTag::Validator,
            &format!(
                "Grouping valid: {} trades across {} groups",
                trades.len(),
                group_ids.len()
            ),
        );
    } else {
        logger::warning(
            LogTag::Validator,
            &format!("Grouping invalid: {} issue(s) found", errors.len()),
        );
    }

    GroupingValidation { valid, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trades::TradeType;
    use chrono::{TimeZone, Utc};

    fn trade(id: &str, token_in: &str, token_out: &str, minute: u32) -> TradeRecord {
        TradeRecord {
            id: id.to_string(),
            wallet_address: "wallet1".to_string(),
            trade_type: TradeType::Buy,
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in: 1.0,
            amount_out: 1.0,
            price_in: None,
            price_out: None,
            fees: 0.0,
            block_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    fn grouping(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(group, ids)| {
                (
                    group.to_string(),
                    ids.iter().map(|id| id.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn accepts_complete_consistent_grouping() {
        let trades = vec![
            trade("t1", "SOL", "BONK", 0),
            trade("t2", "BONK", "SOL", 1),
        ];
        let groups = grouping(&[("p1", &["t1", "t2"])]);

        let validation = validate_manual_grouping(&trades, &groups);
        assert!(validation.valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn reports_missing_and_duplicate_ids_separately() {
        let trades = vec![
            trade("t1", "SOL", "BONK", 0),
            trade("t2", "SOL", "BONK", 1),
            trade("t3", "SOL", "BONK", 2),
        ];
        // t1 appears twice, t3 is never covered
        let groups = grouping(&[("p1", &["t1", "t2"]), ("p2", &["t1"])]);

        let validation = validate_manual_grouping(&trades, &groups);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("t3") && e.contains("not covered")));
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("t1") && e.contains("assigned 2 times")));
    }

    #[test]
    fn reports_group_spanning_three_tokens() {
        let trades = vec![
            trade("t1", "SOL", "BONK", 0),
            trade("t2", "SOL", "WIF", 1),
        ];
        let groups = grouping(&[("p1", &["t1", "t2"])]);

        let validation = validate_manual_grouping(&trades, &groups);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("p1") && e.contains("3 distinct tokens")));
    }

    #[test]
    fn reports_chronological_violation_naming_group() {
        let trades = vec![
            trade("t1", "SOL", "BONK", 5),
            trade("t2", "SOL", "BONK", 1),
        ];
        let groups = grouping(&[("p1", &["t1", "t2"])]);

        let validation = validate_manual_grouping(&trades, &groups);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("p1") && e.contains("chronological")));
    }

    #[test]
    fn reports_unknown_trade_reference() {
        let trades = vec![trade("t1", "SOL", "BONK", 0)];
        let groups = grouping(&[("p1", &["t1", "ghost"])]);

        let validation = validate_manual_grouping(&trades, &groups);
        assert!(!validation.valid);
        assert!(validation
            .errors
            .iter()
            .any(|e| e.contains("p1") && e.contains("unknown trade id ghost")));
    }
}
