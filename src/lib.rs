pub mod config;
pub mod errors; // Structured error handling
pub mod logger;
pub mod positions; // FIFO position tracking core
pub mod tokens; // Token symbol resolution
pub mod trades; // Trade records and classification
pub mod utils;
