//! Rate table and operation limits
//!
//! Both are immutable configuration values injected into the engine at
//! construction. No currency is ever added or changed at runtime.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use stakewallet_types::CurrencyCode;

/// Static mapping of currency code to a fixed-point exchange factor relative
/// to the base currency (USD, factor 1.0).
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, Decimal>,
}

impl RateTable {
    pub fn new(rates: impl IntoIterator<Item = (CurrencyCode, Decimal)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// The exchange factor for a code, if the code is supported.
    pub fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn is_supported(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// Rate lookup with base-rate fallback. Only the all-balances aggregate
    /// uses this: a stored wallet may hold a code the table no longer lists,
    /// and the aggregate still has to account for it somehow.
    pub fn rate_or_base(&self, code: &CurrencyCode) -> Decimal {
        self.rate(code).unwrap_or(Decimal::ONE)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new([
            (CurrencyCode::usd(), dec!(1.0)),
            (CurrencyCode::eur(), dec!(0.85)),
            (CurrencyCode::gbp(), dec!(0.73)),
            (CurrencyCode::cad(), dec!(1.25)),
        ])
    }
}

/// Per-operation amount ceilings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_deposit: Decimal,
    pub max_withdrawal: Decimal,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_deposit: dec!(10000.00),
            max_withdrawal: dec!(5000.00),
        }
    }
}
