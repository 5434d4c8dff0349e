/// Subsystem tags for log filtering and display

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Tracker,   // Calculation entry points and run summaries
    Fifo,      // Queue replay and lot consumption
    Wallets,   // Multi-wallet partitioning
    Validator, // Manual grouping validation
    Config,    // Configuration loading
}

impl LogTag {
    /// Display name used in the aligned console prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::Tracker => "TRACKER",
            LogTag::Fifo => "FIFO",
            LogTag::Wallets => "WALLETS",
            LogTag::Validator => "VALIDATOR",
            LogTag::Config => "CONFIG",
        }
    }

    /// Key used when enabling per-tag debug output in the logger config
    pub fn to_debug_key(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
