// =============================================================================
// PER-TOKEN FIFO QUEUE + CALL-SCOPED REGISTRY
// =============================================================================

use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};

/// One open lot: a quantity of a token acquired at a specific price and time,
/// tracked until fully consumed.
///
/// `quantity` and `fees` shrink together on partial consumption; `price`,
/// `trade_id` and `timestamp` never change. A lot at or below the dust
/// threshold is removed from its queue and never resurrected.
#[derive(Debug, Clone, PartialEq)]
pub struct FifoQueueItem {
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
    pub trade_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One consumed lot fragment: either a whole lot or a pro-rata slice of one.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedLot {
    pub trade_id: String,
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one consumption pass over a queue
///
/// `shortfall` is the requested quantity that could not be covered because
/// the queue ran dry. Cost basis is never fabricated for it.
#[derive(Debug, Clone, Default)]
pub struct Consumption {
    pub lots: Vec<ConsumedLot>,
    pub shortfall: f64,
}

impl Consumption {
    /// Quantity actually taken from the queue
    pub fn consumed_quantity(&self) -> f64 {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    /// Acquisition cost (price x quantity) of the consumed fragments
    pub fn cost_basis(&self) -> f64 {
        self.lots.iter().map(|lot| lot.quantity * lot.price).sum()
    }

    /// Entry fees attributed to the consumed fragments
    pub fn entry_fees(&self) -> f64 {
        self.lots.iter().map(|lot| lot.fees).sum()
    }

    /// Acquisition time of the oldest consumed fragment
    pub fn earliest_entry(&self) -> Option<DateTime<Utc>> {
        self.lots.iter().map(|lot| lot.timestamp).min()
    }
}

/// Ordered (oldest-first) sequence of open lots for one (wallet, token) pair
#[derive(Debug, Clone)]
pub struct FifoQueue {
    items: VecDeque<FifoQueueItem>,
    epsilon: f64,
}

impl FifoQueue {
    pub fn new(epsilon: f64) -> Self {
        Self {
            items: VecDeque::new(),
            epsilon,
        }
    }

    /// Append a lot at the tail. O(1).
    pub fn enqueue(&mut self, item: FifoQueueItem) {
        self.items.push_back(item);
    }

    /// Consume up to `requested` quantity from the head of the queue.
    ///
    /// Whole lots are removed; a lot larger than the remaining request is
    /// split pro-rata, with the fee share `fees x (taken / quantity)`
    /// following the taken fragment and the remainder staying on the lot.
    /// Insertion order is the only ordering; there is no price-based
    /// reordering.
    pub fn consume(&mut self, requested: f64) -> Consumption {
        let mut remaining = requested;
        let mut lots = Vec::new();

        loop {
            if remaining <= self.epsilon {
                remaining = 0.0;
                break;
            }
            let take_whole = match self.items.front() {
                None => break,
                Some(head) => head.quantity <= remaining + self.epsilon,
            };

            if take_whole {
                if let Some(lot) = self.items.pop_front() {
                    remaining = (remaining - lot.quantity).max(0.0);
                    lots.push(ConsumedLot {
                        trade_id: lot.trade_id,
                        quantity: lot.quantity,
                        price: lot.price,
                        fees: lot.fees,
                        timestamp: lot.timestamp,
                    });
                }
            } else if let Some(head) = self.items.front_mut() {
                let fee_share = head.fees * (remaining / head.quantity);
                lots.push(ConsumedLot {
                    trade_id: head.trade_id.clone(),
                    quantity: remaining,
                    price: head.price,
                    fees: fee_share,
                    timestamp: head.timestamp,
                });
                head.quantity -= remaining;
                head.fees -= fee_share;
                remaining = 0.0;
            }
        }

        Consumption {
            lots,
            shortfall: remaining,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total quantity still held across all lots
    pub fn total_quantity(&self) -> f64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FifoQueueItem> {
        self.items.iter()
    }

    /// Take all remaining lots out of the queue (end-of-run flush)
    pub fn drain_remaining(&mut self) -> Vec<FifoQueueItem> {
        self.items.drain(..).collect()
    }
}

/// Per-token FIFO queues for one wallet, created lazily on first buy.
///
/// A registry is owned by exactly one calculation run; it is built fresh for
/// the run and dropped with it, so no lot state can leak between unrelated
/// calculations and wallets stay fully isolated.
#[derive(Debug)]
pub struct QueueRegistry {
    wallet: String,
    queues: HashMap<String, FifoQueue>,
    order: Vec<String>,
    epsilon: f64,
}

impl QueueRegistry {
    pub fn new(wallet: impl Into<String>, epsilon: f64) -> Self {
        Self {
            wallet: wallet.into(),
            queues: HashMap::new(),
            order: Vec::new(),
            epsilon,
        }
    }

    pub fn wallet(&self) -> &str {
        &self.wallet
    }

    /// Append a lot to the token's queue, creating the queue on first use
    pub fn enqueue(&mut self, token: &str, item: FifoQueueItem) {
        if !self.queues.contains_key(token) {
            self.order.push(token.to_string());
            self.queues.insert(token.to_string(), FifoQueue::new(self.epsilon));
        }
        if let Some(queue) = self.queues.get_mut(token) {
            queue.enqueue(item);
        }
    }

    /// Consume from the token's queue. Returns `None` when there is no
    /// inventory at all for the token (never-seen or already-drained queue).
    pub fn consume(&mut self, token: &str, requested: f64) -> Option<Consumption> {
        match self.queues.get_mut(token) {
            Some(queue) if !queue.is_empty() => Some(queue.consume(requested)),
            _ => None,
        }
    }

    /// Quantity currently held for a token
    pub fn available_quantity(&self, token: &str) -> f64 {
        self.queues
            .get(token)
            .map(|queue| queue.total_quantity())
            .unwrap_or(0.0)
    }

    /// Hand out the still-open queues in first-seen token order, consuming
    /// the registry. Empty queues are skipped.
    pub fn into_open_queues(mut self) -> Vec<(String, FifoQueue)> {
        let mut open = Vec::new();
        for token in self.order {
            if let Some(queue) = self.queues.remove(&token) {
                if !queue.is_empty() {
                    open.push((token, queue));
                }
            }
        }
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lot(quantity: f64, price: f64, fees: f64, trade_id: &str, minute: u32) -> FifoQueueItem {
        FifoQueueItem {
            quantity,
            price,
            fees,
            trade_id: trade_id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn consumes_oldest_lot_first() {
        let mut queue = FifoQueue::new(1e-9);
        queue.enqueue(lot(10.0, 1.0, 0.0, "buy1", 0));
        queue.enqueue(lot(10.0, 2.0, 0.0, "buy2", 1));

        let consumption = queue.consume(15.0);
        assert_eq!(consumption.lots.len(), 2);
        assert_eq!(consumption.lots[0].trade_id, "buy1");
        assert_eq!(consumption.lots[0].quantity, 10.0);
        assert_eq!(consumption.lots[0].price, 1.0);
        assert_eq!(consumption.lots[1].trade_id, "buy2");
        assert_eq!(consumption.lots[1].quantity, 5.0);
        assert_eq!(consumption.lots[1].price, 2.0);
        assert_eq!(consumption.shortfall, 0.0);

        // 5 units of the second lot remain at the head
        assert_eq!(queue.total_quantity(), 5.0);
    }

    #[test]
    fn splits_fees_pro_rata_on_partial_consumption() {
        let mut queue = FifoQueue::new(1e-9);
        queue.enqueue(lot(10.0, 2.0, 1.0, "buy1", 0));

        let consumption = queue.consume(4.0);
        assert_eq!(consumption.lots.len(), 1);
        assert!((consumption.lots[0].fees - 0.4).abs() < 1e-12);

        // Remainder keeps the rest of the fee
        let remaining: Vec<_> = queue.iter().collect();
        assert_eq!(remaining.len(), 1);
        assert!((remaining[0].quantity - 6.0).abs() < 1e-12);
        assert!((remaining[0].fees - 0.6).abs() < 1e-12);
    }

    #[test]
    fn reports_shortfall_without_fabricating_lots() {
        let mut queue = FifoQueue::new(1e-9);
        queue.enqueue(lot(10.0, 1.0, 0.0, "buy1", 0));

        let consumption = queue.consume(25.0);
        assert_eq!(consumption.consumed_quantity(), 10.0);
        assert!((consumption.shortfall - 15.0).abs() < 1e-12);
        assert!(queue.is_empty());
    }

    #[test]
    fn dust_remainder_counts_as_whole_lot() {
        let mut queue = FifoQueue::new(1e-9);
        queue.enqueue(lot(10.0, 1.0, 0.5, "buy1", 0));

        // Within epsilon of the full lot: take it whole, leave no dust behind
        let consumption = queue.consume(10.0 - 1e-12);
        assert_eq!(consumption.lots.len(), 1);
        assert_eq!(consumption.lots[0].quantity, 10.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn registry_isolates_tokens_and_tracks_order() {
        let mut registry = QueueRegistry::new("wallet1", 1e-9);
        registry.enqueue("BONK", lot(10.0, 1.0, 0.0, "buy1", 0));
        registry.enqueue("WIF", lot(5.0, 2.0, 0.0, "buy2", 1));

        assert_eq!(registry.available_quantity("BONK"), 10.0);
        assert!(registry.consume("WIF", 5.0).is_some());
        // Drained queue no longer offers inventory
        assert!(registry.consume("WIF", 1.0).is_none());
        // Never-seen token has none either
        assert!(registry.consume("PONKE", 1.0).is_none());

        let open = registry.into_open_queues();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].0, "BONK");
    }
}
