// Position tracking module - clean modular design
pub mod builder;
pub mod grouping;
pub mod queue;
pub mod tracker;
pub mod types;


// Public API exports
pub use tracker::PositionTracker;

pub use grouping::{validate_manual_grouping, GroupingValidation};

pub use types::{
    Position,
    PositionCalculationResult,
    PositionStatus,
    PositionTrade,
    TradeRole,
};

pub use queue::{Consumption, ConsumedLot, FifoQueue, FifoQueueItem, QueueRegistry};

pub use builder::PositionBuilder;
