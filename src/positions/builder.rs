// =============================================================================
// POSITION BUILDER - PER-WALLET FIFO REPLAY
// =============================================================================

use chrono::Utc;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::positions::queue::{Consumption, FifoQueueItem, QueueRegistry};
use crate::positions::types::{
    Position, PositionCalculationResult, PositionStatus, PositionTrade, TradeRole,
};
use crate::tokens::{display_symbol, SymbolLookup};
use crate::trades::{classify_trade, ClassifiedTrade, TradeRecord};
use crate::utils::safe_truncate;

/// Replays one wallet's trades chronologically against a fresh queue
/// registry, emitting closed positions for sells and flushing leftover
/// inventory into open positions at the end of the run.
///
/// The replay order is `(block_time, original input index)` - the index
/// tie-break makes FIFO semantics deterministic for trades sharing a block
/// timestamp instead of depending silently on input order.
pub struct PositionBuilder<'a> {
    config: &'a TrackerConfig,
    symbols: &'a dyn SymbolLookup,
    registry: QueueRegistry,
    result: PositionCalculationResult,
}

impl<'a> PositionBuilder<'a> {
    pub fn new(
        wallet: &str,
        config: &'a TrackerConfig,
        symbols: &'a dyn SymbolLookup,
    ) -> Self {
        Self {
            config,
            symbols,
            registry: QueueRegistry::new(wallet, config.quantity_epsilon),
            result: PositionCalculationResult::default(),
        }
    }

    /// Replay the given `(original index, trade)` pairs and return the
    /// accumulated result bundle. One bad trade never aborts the run: its
    /// diagnostic is recorded and processing continues.
    pub fn run(mut self, mut trades: Vec<(usize, &TradeRecord)>) -> PositionCalculationResult {
        trades.sort_by(|(idx_a, a), (idx_b, b)| {
            a.block_time.cmp(&b.block_time).then(idx_a.cmp(idx_b))
        });

        logger::debug(
            LogTag::Fifo,
            &format!(
                "Replaying {} trades for wallet {}",
                trades.len(),
                safe_truncate(self.registry.wallet(), 12)
            ),
        );

        for (_, trade) in trades {
            self.process_trade(trade);
        }

        self.flush_open_positions();
        self.result
    }

    fn process_trade(&mut self, trade: &TradeRecord) {
        match classify_trade(trade) {
            Ok(classified) if classified.is_buy => self.process_buy(trade, classified),
            Ok(classified) => self.process_sell(trade, classified),
            Err(err) if err.is_data_warning() => {
                logger::debug(
                    LogTag::Fifo,
                    &format!("Skipping trade {}: {}", trade.id, err),
                );
                self.result.warnings.push(err.to_string());
            }
            Err(err) => {
                logger::error(LogTag::Fifo, &err.to_string());
                self.result.errors.push(err.to_string());
            }
        }
    }

    /// A buy only enqueues a lot. Its entry link rows are deferred until the
    /// position the lot ends up in actually exists (at sell time for closed
    /// positions, at flush time for open ones), so every emitted
    /// `position_id` refers to a real position in the same bundle.
    fn process_buy(&mut self, trade: &TradeRecord, classified: ClassifiedTrade) {
        logger::verbose(
            LogTag::Fifo,
            &format!(
                "Enqueue {} {} @ {} (trade {})",
                classified.quantity, classified.token, classified.price, trade.id
            ),
        );

        self.registry.enqueue(
            &classified.token,
            FifoQueueItem {
                quantity: classified.quantity,
                price: classified.price,
                fees: trade.fees,
                trade_id: trade.id.clone(),
                timestamp: trade.block_time,
            },
        );
    }

    fn process_sell(&mut self, trade: &TradeRecord, classified: ClassifiedTrade) {
        let available = self.registry.available_quantity(&classified.token);

        let Some(consumption) = self.registry.consume(&classified.token, classified.quantity)
        else {
            // Selling a token this wallet never held (or already drained):
            // flagged, inventory untouched, no degenerate position emitted.
            let warning = TrackerError::NoHoldings {
                token: classified.token.clone(),
                wallet: self.registry.wallet().to_string(),
                trade_id: trade.id.clone(),
            };
            logger::warning(LogTag::Fifo, &warning.to_string());
            self.result.warnings.push(warning.to_string());
            return;
        };

        if consumption.shortfall > self.config.quantity_epsilon {
            let warning = TrackerError::Oversold {
                token: classified.token.clone(),
                wallet: self.registry.wallet().to_string(),
                trade_id: trade.id.clone(),
                requested: classified.quantity,
                available,
            };
            logger::warning(LogTag::Fifo, &warning.to_string());
            self.result.warnings.push(warning.to_string());
        }

        self.emit_closed_position(trade, &classified, consumption);
    }

    /// Build the closed position for one sell plus its entry/exit link rows.
    ///
    /// Realized P&L covers only the quantity actually matched against lots:
    /// exit value minus cost basis minus total (entry + exit) fees. An
    /// oversold remainder contributes nothing to any of the three terms.
    fn emit_closed_position(
        &mut self,
        trade: &TradeRecord,
        classified: &ClassifiedTrade,
        consumption: Consumption,
    ) {
        let consumed_quantity = consumption.consumed_quantity();
        if consumed_quantity <= 0.0 {
            return;
        }

        let cost_basis = consumption.cost_basis();
        let entry_fees = consumption.entry_fees();
        let exit_value = consumed_quantity * classified.price;
        let total_fees = entry_fees + trade.fees;
        let realized_pnl = exit_value - cost_basis - total_fees;
        let open_date = consumption
            .earliest_entry()
            .unwrap_or(trade.block_time);

        let position = Position {
            id: Uuid::new_v4().to_string(),
            symbol: display_symbol(self.symbols, &classified.token),
            wallet_address: self.registry.wallet().to_string(),
            open_date,
            close_date: Some(trade.block_time),
            status: PositionStatus::Closed,
            total_quantity: consumed_quantity,
            avg_entry_price: cost_basis / consumed_quantity,
            avg_exit_price: Some(classified.price),
            realized_pnl,
            unrealized_pnl: 0.0,
            fees: total_fees,
        };

        for lot in &consumption.lots {
            self.result.position_trades.push(PositionTrade {
                id: Uuid::new_v4().to_string(),
                position_id: position.id.clone(),
                trade_id: lot.trade_id.clone(),
                role: TradeRole::Entry,
                quantity: lot.quantity,
                price: lot.price,
                fees: lot.fees,
                timestamp: lot.timestamp,
            });
        }
        self.result.position_trades.push(PositionTrade {
            id: Uuid::new_v4().to_string(),
            position_id: position.id.clone(),
            trade_id: trade.id.clone(),
            role: TradeRole::Exit,
            quantity: consumed_quantity,
            price: classified.price,
            fees: trade.fees,
            timestamp: trade.block_time,
        });

        logger::debug(
            LogTag::Fifo,
            &format!(
                "Closed {} position: qty {} pnl {:.6} ({} lots)",
                position.symbol,
                consumed_quantity,
                realized_pnl,
                consumption.lots.len()
            ),
        );

        self.result.positions.push(position);
    }

    /// Turn every queue still holding inventory into one open position
    /// covering its remaining quantity at the weighted-average entry price.
    fn flush_open_positions(&mut self) {
        let wallet = self.registry.wallet().to_string();
        let registry = std::mem::replace(
            &mut self.registry,
            QueueRegistry::new(wallet.clone(), self.config.quantity_epsilon),
        );

        for (token, mut queue) in registry.into_open_queues() {
            let lots = queue.drain_remaining();
            let total_quantity: f64 = lots.iter().map(|lot| lot.quantity).sum();
            if total_quantity <= self.config.quantity_epsilon {
                continue;
            }

            let cost_basis: f64 = lots.iter().map(|lot| lot.quantity * lot.price).sum();
            let fees: f64 = lots.iter().map(|lot| lot.fees).sum();
            let open_date = lots
                .iter()
                .map(|lot| lot.timestamp)
                .min()
                .unwrap_or_else(Utc::now);

            let position = Position {
                id: Uuid::new_v4().to_string(),
                symbol: display_symbol(self.symbols, &token),
                wallet_address: wallet.clone(),
                open_date,
                close_date: None,
                status: PositionStatus::Open,
                total_quantity,
                avg_entry_price: cost_basis / total_quantity,
                avg_exit_price: None,
                realized_pnl: 0.0,
                unrealized_pnl: 0.0,
                fees,
            };

            for lot in lots {
                self.result.position_trades.push(PositionTrade {
                    id: Uuid::new_v4().to_string(),
                    position_id: position.id.clone(),
                    trade_id: lot.trade_id,
                    role: TradeRole::Entry,
                    quantity: lot.quantity,
                    price: lot.price,
                    fees: lot.fees,
                    timestamp: lot.timestamp,
                });
            }

            logger::debug(
                LogTag::Fifo,
                &format!(
                    "Open {} position: qty {} avg entry {:.6}",
                    position.symbol, total_quantity, position.avg_entry_price
                ),
            );

            self.result.positions.push(position);
        }
    }
}
