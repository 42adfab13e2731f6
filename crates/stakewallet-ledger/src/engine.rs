//! The ledger engine: pure decision logic
//!
//! Every method takes the current wallet state, validates the operation, and
//! returns the staged outcome: the new wallet state paired with the ledger
//! entry that records it. Nothing here touches a store; the service façade
//! persists staged outcomes under the per-wallet lock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stakewallet_types::{
    round10, round2, CurrencyCode, EntryKind, NewLedgerEntry, NewPendingWithdrawal, Wallet,
    WalletError, WalletResult,
};

use crate::rates::{Limits, RateTable};

/// A validated wallet mutation paired with its ledger entry.
#[derive(Debug, Clone)]
pub struct Staged {
    pub wallet: Wallet,
    pub entry: NewLedgerEntry,
}

/// A withdrawal additionally stages the pending payout record; all three
/// pieces commit together.
#[derive(Debug, Clone)]
pub struct StagedWithdrawal {
    pub wallet: Wallet,
    pub entry: NewLedgerEntry,
    pub withdrawal: NewPendingWithdrawal,
}

/// A conversion mutates two wallets under one ledger entry.
#[derive(Debug, Clone)]
pub struct StagedConversion {
    pub source: Wallet,
    pub destination: Wallet,
    pub entry: NewLedgerEntry,
    pub converted: Decimal,
}

/// The rules governing how wallet balances change.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    rates: RateTable,
    limits: Limits,
}

impl LedgerEngine {
    pub fn new(rates: RateTable, limits: Limits) -> Self {
        Self { rates, limits }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Amount validation is the first check of every operation, ahead of any
    /// wallet lookup: a bad amount is reported even when no wallet exists
    /// for the pair.
    pub fn validate_amount(amount: Decimal) -> WalletResult<()> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::invalid_amount("Amount must be greater than 0"));
        }
        Ok(())
    }

    /// Withdrawal amounts are additionally capped by the configured limit.
    pub fn validate_withdrawal_amount(&self, amount: Decimal) -> WalletResult<()> {
        Self::validate_amount(amount)?;
        if amount > self.limits.max_withdrawal {
            return Err(WalletError::invalid_amount(format!(
                "Exceeds withdrawal limit of {}",
                self.limits.max_withdrawal
            )));
        }
        Ok(())
    }

    fn ensure_supported(&self, code: &CurrencyCode) -> WalletResult<()> {
        if !self.rates.is_supported(code) {
            return Err(WalletError::UnsupportedCurrency { code: code.clone() });
        }
        Ok(())
    }

    /// Credit real funds. The wallet may be freshly opened and not yet
    /// persisted; validation runs before anything could be stored.
    pub fn deposit(&self, wallet: &Wallet, amount: Decimal, now: DateTime<Utc>) -> WalletResult<Staged> {
        Self::validate_amount(amount)?;
        self.ensure_supported(&wallet.currency)?;
        if amount > self.limits.max_deposit {
            return Err(WalletError::invalid_amount(format!(
                "Exceeds deposit limit of {}",
                self.limits.max_deposit
            )));
        }

        let balance_before = wallet.balance;
        let mut updated = wallet.clone();
        updated.balance += amount;
        updated.updated_at = now;

        Ok(Staged {
            entry: NewLedgerEntry {
                player_id: wallet.player_id,
                kind: EntryKind::Deposit,
                amount,
                currency: wallet.currency.clone(),
                balance_before: Some(balance_before),
                balance_after: Some(updated.balance),
                description: "Deposit via payment gateway".to_string(),
            },
            wallet: updated,
        })
    }

    /// Debit real funds and stage the pending payout record. Bonus funds are
    /// never eligible for withdrawal.
    pub fn withdraw(
        &self,
        wallet: &Wallet,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> WalletResult<StagedWithdrawal> {
        self.validate_withdrawal_amount(amount)?;
        if wallet.balance < amount {
            return Err(WalletError::InsufficientFunds {
                available: wallet.balance,
                requested: amount,
            });
        }

        let balance_before = wallet.balance;
        let mut updated = wallet.clone();
        updated.balance -= amount;
        updated.updated_at = now;

        Ok(StagedWithdrawal {
            entry: NewLedgerEntry {
                player_id: wallet.player_id,
                kind: EntryKind::Withdrawal,
                amount,
                currency: wallet.currency.clone(),
                balance_before: Some(balance_before),
                balance_after: Some(updated.balance),
                description: "Withdrawal requested".to_string(),
            },
            withdrawal: NewPendingWithdrawal {
                player_id: wallet.player_id,
                amount,
                currency: wallet.currency.clone(),
            },
            wallet: updated,
        })
    }

    /// Wager against combined funds, bonus drawn first. Snapshots cover only
    /// the real-balance component; bonus consumption is folded into the
    /// entry description rather than ledgered separately.
    pub fn bet(
        &self,
        wallet: &Wallet,
        amount: Decimal,
        game_ref: &str,
        now: DateTime<Utc>,
    ) -> WalletResult<Staged> {
        Self::validate_amount(amount)?;
        let available = wallet.total();
        if available < amount {
            return Err(WalletError::InsufficientFunds {
                available,
                requested: amount,
            });
        }

        let bonus_used = wallet.bonus_balance.min(amount);
        let balance_used = amount - bonus_used;

        let balance_before = wallet.balance;
        let mut updated = wallet.clone();
        updated.bonus_balance -= bonus_used;
        updated.balance -= balance_used;
        updated.updated_at = now;

        let description = if bonus_used > Decimal::ZERO {
            format!("Bet on game {game_ref} (bonus used: {bonus_used})")
        } else {
            format!("Bet on game {game_ref}")
        };

        Ok(Staged {
            entry: NewLedgerEntry {
                player_id: wallet.player_id,
                kind: EntryKind::Bet,
                amount,
                currency: wallet.currency.clone(),
                balance_before: Some(balance_before),
                balance_after: Some(updated.balance),
                description,
            },
            wallet: updated,
        })
    }

    /// Credit a payout. Wins always land on the real balance, never bonus.
    pub fn win(
        &self,
        wallet: &Wallet,
        amount: Decimal,
        game_ref: &str,
        now: DateTime<Utc>,
    ) -> WalletResult<Staged> {
        Self::validate_amount(amount)?;

        let balance_before = wallet.balance;
        let mut updated = wallet.clone();
        updated.balance += amount;
        updated.updated_at = now;

        Ok(Staged {
            entry: NewLedgerEntry {
                player_id: wallet.player_id,
                kind: EntryKind::Win,
                amount,
                currency: wallet.currency.clone(),
                balance_before: Some(balance_before),
                balance_after: Some(updated.balance),
                description: format!("Win from game {game_ref}"),
            },
            wallet: updated,
        })
    }

    /// Credit promotional funds. The entry carries no real-balance snapshots
    /// because the event does not touch the real balance.
    pub fn credit_bonus(
        &self,
        wallet: &Wallet,
        amount: Decimal,
        bonus_code: &str,
        now: DateTime<Utc>,
    ) -> WalletResult<Staged> {
        Self::validate_amount(amount)?;

        let mut updated = wallet.clone();
        updated.bonus_balance += amount;
        updated.updated_at = now;

        Ok(Staged {
            entry: NewLedgerEntry {
                player_id: wallet.player_id,
                kind: EntryKind::Bonus,
                amount,
                currency: wallet.currency.clone(),
                balance_before: None,
                balance_after: None,
                description: format!("Bonus credited: {bonus_code}"),
            },
            wallet: updated,
        })
    }

    /// Two-stage rounded conversion: the quotient is rounded to 10 fraction
    /// digits before the multiply, the product to 2 at the end, half-up both
    /// times. The intermediate step produces different penny-level results
    /// than rounding once, and callers depend on these exact values.
    pub fn convert_amount(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> WalletResult<Decimal> {
        let from_rate = self
            .rates
            .rate(from)
            .ok_or_else(|| WalletError::UnsupportedCurrency { code: from.clone() })?;
        let to_rate = self
            .rates
            .rate(to)
            .ok_or_else(|| WalletError::UnsupportedCurrency { code: to.clone() })?;
        Ok(round2(round10(amount / from_rate) * to_rate))
    }

    /// Move real funds between two of one player's wallets. Bonus funds are
    /// not convertible. The destination may be freshly opened; with matching
    /// currencies both sides of the move land on the source wallet.
    pub fn convert(
        &self,
        source: &Wallet,
        destination: &Wallet,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> WalletResult<StagedConversion> {
        Self::validate_amount(amount)?;
        self.ensure_supported(&source.currency)?;
        self.ensure_supported(&destination.currency)?;
        if source.balance < amount {
            return Err(WalletError::InsufficientFunds {
                available: source.balance,
                requested: amount,
            });
        }

        let converted = self.convert_amount(amount, &source.currency, &destination.currency)?;

        let mut new_source = source.clone();
        new_source.balance -= amount;
        new_source.updated_at = now;

        let mut new_destination = if source.currency == destination.currency {
            new_source.clone()
        } else {
            destination.clone()
        };
        new_destination.balance += converted;
        new_destination.updated_at = now;

        if source.currency == destination.currency {
            new_source = new_destination.clone();
        }

        Ok(StagedConversion {
            entry: NewLedgerEntry {
                player_id: source.player_id,
                kind: EntryKind::Conversion,
                amount,
                currency: source.currency.clone(),
                balance_before: None,
                balance_after: None,
                description: format!("Converted to {} {}", converted, destination.currency),
            },
            source: new_source,
            destination: new_destination,
            converted,
        })
    }

    /// Aggregate a player's wallets into the base currency: each total is
    /// divided by its rate and rounded to 10 digits, the sum rounded to 2
    /// once at the end. Single-stage, unlike [`Self::convert_amount`] — the
    /// two policies are deliberately separate.
    pub fn base_currency_total(&self, wallets: &[Wallet]) -> Decimal {
        let sum = wallets
            .iter()
            .map(|w| round10(w.total() / self.rates.rate_or_base(&w.currency)))
            .sum::<Decimal>();
        round2(sum)
    }
}
