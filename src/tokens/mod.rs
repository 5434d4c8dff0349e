//! Token symbol resolution
//!
//! The tracker itself is agnostic of any chain's token registry: callers
//! inject a [`SymbolLookup`] implementation mapping token identifiers (mint
//! addresses, contract addresses) to display symbols. Tokens the lookup does
//! not know fall back to a log-friendly short form of the identifier.

use std::collections::HashMap;

use crate::utils::safe_truncate;

/// Identifier length above which the display fallback truncates
const MAX_DISPLAY_CHARS: usize = 12;

/// Token identifier → display symbol resolution capability
pub trait SymbolLookup {
    /// Resolve a display symbol for a token identifier, if known
    fn symbol(&self, token: &str) -> Option<String>;
}

/// HashMap-backed symbol directory
///
/// The empty directory is a valid lookup: every token falls back to its
/// (possibly truncated) identifier.
#[derive(Debug, Clone, Default)]
pub struct TokenDirectory {
    symbols: HashMap<String, String>,
}

impl TokenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token identifier → symbol mapping
    pub fn insert(&mut self, token: impl Into<String>, symbol: impl Into<String>) {
        self.symbols.insert(token.into(), symbol.into());
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<HashMap<String, String>> for TokenDirectory {
    fn from(symbols: HashMap<String, String>) -> Self {
        Self { symbols }
    }
}

impl SymbolLookup for TokenDirectory {
    fn symbol(&self, token: &str) -> Option<String> {
        self.symbols.get(token).cloned()
    }
}

/// Resolve a display symbol, falling back to a shortened identifier
pub fn display_symbol(lookup: &dyn SymbolLookup, token: &str) -> String {
    match lookup.symbol(token) {
        Some(symbol) => symbol,
        None => safe_truncate(token, MAX_DISPLAY_CHARS).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolves_known_tokens() {
        let mut directory = TokenDirectory::new();
        directory.insert("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "BONK");

        assert_eq!(
            display_symbol(&directory, "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"),
            "BONK"
        );
    }

    #[test]
    fn unknown_tokens_fall_back_to_short_identifier() {
        let directory = TokenDirectory::new();

        // Short identifiers pass through untouched
        assert_eq!(display_symbol(&directory, "SOL"), "SOL");
        // Long mint addresses get truncated
        assert_eq!(
            display_symbol(&directory, "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"),
            "DezXAZ8z7Pnr"
        );
    }
}
