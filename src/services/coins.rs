//! Directory of listed coins: ticker to CoinGecko id.

use crate::types::CoinInfo;
use dashmap::DashMap;
use std::sync::Arc;

pub struct CoinDirectory {
    /// Upper-case ticker -> CoinGecko id.
    by_symbol: DashMap<String, String>,
}

impl CoinDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            by_symbol: DashMap::new(),
        })
    }

    /// Replace the directory contents. When two coins share a ticker the
    /// first one listed (higher market cap) is kept.
    pub fn load(&self, coins: Vec<CoinInfo>) {
        self.by_symbol.clear();
        for coin in coins {
            self.by_symbol
                .entry(coin.symbol.to_uppercase())
                .or_insert(coin.id);
        }
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Resolve a ticker ("btc") or an id ("bitcoin") to a CoinGecko id.
    ///
    /// With an empty directory any non-blank input is taken as an id.
    pub fn resolve(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(id) = self.by_symbol.get(&input.to_uppercase()) {
            return Some(id.clone());
        }

        let id = input.to_lowercase();
        if self.is_empty() || self.by_symbol.iter().any(|entry| *entry.value() == id) {
            Some(id)
        } else {
            None
        }
    }

    /// Ticker for an id, if listed.
    pub fn symbol_for(&self, id: &str) -> Option<String> {
        self.by_symbol
            .iter()
            .find(|entry| entry.value() == id)
            .map(|entry| entry.key().clone())
    }

    /// Name to show users for an id: its ticker if listed, otherwise the id
    /// capitalised ("solana" -> "Solana").
    pub fn label_for(&self, id: &str) -> String {
        if let Some(symbol) = self.symbol_for(id) {
            return symbol;
        }
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Coins whose ticker starts with `letter`, sorted by ticker. All coins
    /// when `letter` is None.
    pub fn list(&self, letter: Option<char>) -> Vec<CoinInfo> {
        let letter = letter.map(|c| c.to_ascii_uppercase());
        let mut coins: Vec<CoinInfo> = self
            .by_symbol
            .iter()
            .filter(|entry| letter.map_or(true, |l| entry.key().starts_with(l)))
            .map(|entry| CoinInfo {
                symbol: entry.key().clone(),
                id: entry.value().clone(),
            })
            .collect();
        coins.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        coins
    }

    /// Distinct first letters of listed tickers, sorted.
    pub fn letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self
            .by_symbol
            .iter()
            .filter_map(|entry| entry.key().chars().next())
            .collect();
        letters.sort_unstable();
        letters.dedup();
        letters
    }
}
