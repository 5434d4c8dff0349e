// =============================================================================
// POSITION TRACKER - PUBLIC CALCULATION ENTRY POINTS
// =============================================================================

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::TrackerConfig;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::positions::builder::PositionBuilder;
use crate::positions::types::PositionCalculationResult;
use crate::tokens::{SymbolLookup, TokenDirectory};
use crate::trades::TradeRecord;
use crate::utils::safe_truncate;

/// FIFO position tracker
///
/// Stateless between calls: every calculation builds its queue registries
/// from scratch and drops them with the run, so two invocations can never
/// contaminate each other and the same tracker can be reused freely.
pub struct PositionTracker {
    config: TrackerConfig,
    symbols: Box<dyn SymbolLookup>,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            symbols: Box::new(TokenDirectory::new()),
        }
    }

    /// Replace the token symbol lookup (builder style)
    pub fn with_symbols(mut self, symbols: Box<dyn SymbolLookup>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Calculate positions for a single wallet's trade history.
    ///
    /// When `wallet_address` is given, trades belonging to other wallets are
    /// ignored. Without it the whole list is replayed as one wallet's
    /// history; input spanning several addresses is flagged (lots are never
    /// matched across wallets - use [`calculate_multi`] for mixed input).
    ///
    /// Never panics and never returns an error: diagnostics end up in the
    /// result bundle.
    ///
    /// [`calculate_multi`]: PositionTracker::calculate_multi
    pub fn calculate(
        &self,
        trades: &[TradeRecord],
        wallet_address: Option<&str>,
    ) -> PositionCalculationResult {
        let selected: Vec<(usize, &TradeRecord)> = match wallet_address {
            Some(wallet) => trades
                .iter()
                .enumerate()
                .filter(|(_, trade)| trade.wallet_address == wallet)
                .collect(),
            None => trades.iter().enumerate().collect(),
        };

        let wallet_label = wallet_address
            .map(str::to_string)
            .or_else(|| selected.first().map(|(_, trade)| trade.wallet_address.clone()))
            .unwrap_or_default();

        let mut result = PositionCalculationResult::default();

        if wallet_address.is_none() && self.config.warn_on_mixed_wallets {
            let mut wallets: Vec<&str> = selected
                .iter()
                .map(|(_, trade)| trade.wallet_address.as_str())
                .collect();
            wallets.sort_unstable();
            wallets.dedup();
            if wallets.len() > 1 {
                let warning = TrackerError::MixedWallets(format!(
                    "{} distinct wallet addresses replayed as one history",
                    wallets.len()
                ));
                logger::warning(LogTag::Tracker, &warning.to_string());
                result.warnings.push(warning.to_string());
            }
        }

        result.merge(self.run_wallet(&wallet_label, selected));
        self.log_summary("calculate", &result);
        result
    }

    /// Calculate positions across wallets: partitions the input by wallet
    /// address, replays every partition against its own isolated queue
    /// registry and concatenates the result bundles. Lots never match across
    /// wallets.
    pub fn calculate_multi(&self, trades: &[TradeRecord]) -> PositionCalculationResult {
        let mut partitions: HashMap<&str, Vec<(usize, &TradeRecord)>> = HashMap::new();
        let mut wallet_order: Vec<&str> = Vec::new();

        for (index, trade) in trades.iter().enumerate() {
            let wallet = trade.wallet_address.as_str();
            if !partitions.contains_key(wallet) {
                wallet_order.push(wallet);
            }
            partitions.entry(wallet).or_default().push((index, trade));
        }

        logger::debug(
            LogTag::Wallets,
            &format!(
                "Partitioned {} trades across {} wallets",
                trades.len(),
                wallet_order.len()
            ),
        );

        let mut result = PositionCalculationResult::default();
        for wallet in wallet_order {
            if let Some(partition) = partitions.remove(wallet) {
                result.merge(self.run_wallet(wallet, partition));
            }
        }

        self.log_summary("calculate_multi", &result);
        result
    }

    /// Run one wallet partition behind a panic boundary. The calculation
    /// contract is that the entry points always return a bundle; an
    /// unexpected panic inside a partition becomes a single fatal diagnostic
    /// instead of unwinding into the caller.
    fn run_wallet(
        &self,
        wallet: &str,
        trades: Vec<(usize, &TradeRecord)>,
    ) -> PositionCalculationResult {
        let trade_count = trades.len();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            PositionBuilder::new(wallet, &self.config, self.symbols.as_ref()).run(trades)
        }));

        match outcome {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                let fatal = TrackerError::Fatal(format!(
                    "wallet {} ({} trades): {}",
                    safe_truncate(wallet, 12),
                    trade_count,
                    reason
                ));
                logger::error(LogTag::Tracker, &fatal.to_string());

                let mut result = PositionCalculationResult::default();
                result.errors.push(fatal.to_string());
                result
            }
        }
    }

    fn log_summary(&self, entry_point: &str, result: &PositionCalculationResult) {
        logger::info(
            LogTag::Tracker,
            &format!(
                "{}: {} positions ({} open, {} closed), {} links, {} errors, {} warnings",
                entry_point,
                result.positions.len(),
                result.open_positions().len(),
                result.closed_positions().len(),
                result.position_trades.len(),
                result.errors.len(),
                result.warnings.len()
            ),
        );
    }
}
