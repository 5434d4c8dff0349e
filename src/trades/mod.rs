// Trade records and classification
pub mod classifier;
pub mod types;

pub use classifier::{classify_trade, ClassifiedTrade};
pub use types::{TradeRecord, TradeType};
