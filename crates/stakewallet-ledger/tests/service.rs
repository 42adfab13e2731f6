//! End-to-end tests for the wallet service over the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stakewallet_ledger::{LedgerEngine, Limits, MemoryStore, RateTable, WalletService};
use stakewallet_types::{CurrencyCode, EntryKind, PlayerId, WalletError, WithdrawalStatus};

fn service() -> WalletService {
    WalletService::in_memory(LedgerEngine::new(RateTable::default(), Limits::default()))
}

fn service_with_store() -> (WalletService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = WalletService::new(
        LedgerEngine::new(RateTable::default(), Limits::default()),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    (service, store)
}

const PLAYER: PlayerId = PlayerId(1001);

#[tokio::test]
async fn test_deposit_creates_wallet_and_accumulates() {
    let svc = service();

    let view = svc
        .deposit(PLAYER, dec!(500.00), CurrencyCode::usd())
        .await
        .unwrap();
    assert_eq!(view.balance, dec!(500.00));
    assert_eq!(view.bonus_balance, dec!(0.00));
    assert_eq!(view.total_balance, dec!(500.00));

    let view = svc
        .deposit(PLAYER, dec!(200.00), CurrencyCode::usd())
        .await
        .unwrap();
    assert_eq!(view.balance, dec!(700.00));
}

#[tokio::test]
async fn test_balance_query_is_idempotent() {
    let svc = service();
    svc.deposit(PLAYER, dec!(123.45), CurrencyCode::usd())
        .await
        .unwrap();

    let first = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    let second = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_balance_query_unknown_wallet() {
    let svc = service();
    let err = svc.balance(PLAYER, CurrencyCode::eur()).await.unwrap_err();
    assert_eq!(
        err,
        WalletError::WalletNotFound {
            player_id: PLAYER,
            currency: CurrencyCode::eur(),
        }
    );
}

#[tokio::test]
async fn test_unsupported_deposit_touches_no_wallet_row() {
    let svc = service();
    let err = svc
        .deposit(PLAYER, dec!(50.00), CurrencyCode::new("XYZ"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedCurrency { .. }));

    // No wallet was created for the rejected deposit.
    let err = svc.balance(PLAYER, CurrencyCode::new("XYZ")).await.unwrap_err();
    assert!(matches!(err, WalletError::WalletNotFound { .. }));
}

#[tokio::test]
async fn test_withdrawal_insufficiency_leaves_balance_unchanged() {
    let (svc, store) = service_with_store();
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();
    let entries_before = store.entry_count().await;

    let err = svc
        .withdraw(PLAYER, dec!(200.00), CurrencyCode::usd())
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));

    let view = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(view.balance, dec!(100.00));
    // A failed operation appends nothing.
    assert_eq!(store.entry_count().await, entries_before);
}

#[tokio::test]
async fn test_amount_errors_precede_wallet_lookup() {
    let svc = service();

    // No wallet exists, but the amount problem is what gets reported.
    let err = svc
        .withdraw(PLAYER, dec!(5000.01), CurrencyCode::usd())
        .await
        .unwrap_err();
    match err {
        WalletError::InvalidAmount { message } => assert!(message.contains("withdrawal limit")),
        other => panic!("unexpected: {other:?}"),
    }

    let err = svc
        .bet(PLAYER, Decimal::ZERO, CurrencyCode::usd(), "SLOT_001")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount { .. }));

    let err = svc
        .convert(PLAYER, CurrencyCode::usd(), CurrencyCode::eur(), dec!(-1.00))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount { .. }));
}

#[tokio::test]
async fn test_withdrawal_debits_and_creates_pending_record() {
    let (svc, store) = service_with_store();
    svc.deposit(PLAYER, dec!(500.00), CurrencyCode::usd())
        .await
        .unwrap();

    let view = svc
        .withdraw(PLAYER, dec!(150.00), CurrencyCode::usd())
        .await
        .unwrap();
    assert_eq!(view.balance, dec!(350.00));

    // The ledger has the paired entry and the pending row exists.
    let history = svc.history(PLAYER, CurrencyCode::usd(), 1).await.unwrap();
    assert_eq!(history[0].kind, EntryKind::Withdrawal);
    assert_eq!(history[0].amount, dec!(150.00));
    assert_eq!(store.entry_count().await, 2);
}

#[tokio::test]
async fn test_bet_draws_bonus_before_real_funds() {
    let svc = service();
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.credit_bonus(PLAYER, dec!(50.00), CurrencyCode::usd(), "WELCOME50")
        .await
        .unwrap();

    let view = svc
        .bet(PLAYER, dec!(75.00), CurrencyCode::usd(), "SLOT_001")
        .await
        .unwrap();
    assert_eq!(view.bonus_balance, dec!(0.00));
    assert_eq!(view.balance, dec!(75.00));
}

#[tokio::test]
async fn test_bet_insufficient_combined_funds_changes_nothing() {
    let svc = service();
    svc.deposit(PLAYER, dec!(50.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.credit_bonus(PLAYER, dec!(20.00), CurrencyCode::usd(), "TOPUP")
        .await
        .unwrap();

    let err = svc
        .bet(PLAYER, dec!(100.00), CurrencyCode::usd(), "SLOT_001")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WalletError::InsufficientFunds {
            available: dec!(70.00),
            requested: dec!(100.00),
        }
    );

    let view = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(view.balance, dec!(50.00));
    assert_eq!(view.bonus_balance, dec!(20.00));
}

#[tokio::test]
async fn test_win_credits_real_balance() {
    let svc = service();
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.bet(PLAYER, dec!(50.00), CurrencyCode::usd(), "SLOT_001")
        .await
        .unwrap();

    let view = svc
        .win(PLAYER, dec!(150.00), CurrencyCode::usd(), "SLOT_001")
        .await
        .unwrap();
    assert_eq!(view.balance, dec!(200.00));
}

#[tokio::test]
async fn test_conversion_is_deterministic() {
    let svc = service();
    svc.deposit(PLAYER, dec!(250.00), CurrencyCode::usd())
        .await
        .unwrap();

    let destination = svc
        .convert(PLAYER, CurrencyCode::usd(), CurrencyCode::eur(), dec!(100.00))
        .await
        .unwrap();
    assert_eq!(destination.currency, CurrencyCode::eur());
    assert_eq!(destination.balance, dec!(85.00));

    let source = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(source.balance, dec!(150.00));
}

#[tokio::test]
async fn test_conversion_requires_source_wallet() {
    let svc = service();
    let err = svc
        .convert(PLAYER, CurrencyCode::gbp(), CurrencyCode::usd(), dec!(10.00))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::WalletNotFound { .. }));
}

#[tokio::test]
async fn test_opposing_conversions_do_not_deadlock() {
    let svc = Arc::new(service());
    svc.deposit(PLAYER, dec!(1000.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.deposit(PLAYER, dec!(1000.00), CurrencyCode::eur())
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                svc.convert(PLAYER, CurrencyCode::usd(), CurrencyCode::eur(), dec!(10.00))
                    .await
            } else {
                svc.convert(PLAYER, CurrencyCode::eur(), CurrencyCode::usd(), dec!(10.00))
                    .await
            }
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let all = svc.all_balances(PLAYER).await.unwrap();
    for line in &all.currencies {
        assert!(line.balance >= Decimal::ZERO);
    }
}

#[tokio::test]
async fn test_concurrent_bets_serialize_no_lost_update() {
    let svc = Arc::new(service());
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();

    // 10 concurrent bets of 30: at most 3 can legitimately be afforded.
    let mut tasks = Vec::new();
    for _ in 0..10 {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            svc.bet(PLAYER, dec!(30.00), CurrencyCode::usd(), "RACE_1").await
        }));
    }

    let mut succeeded = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }
    assert_eq!(succeeded, 3);

    let view = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(view.balance, dec!(10.00));
}

#[tokio::test]
async fn test_every_mutation_appends_exactly_one_entry() {
    let (svc, store) = service_with_store();

    svc.deposit(PLAYER, dec!(500.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.credit_bonus(PLAYER, dec!(50.00), CurrencyCode::usd(), "B1")
        .await
        .unwrap();
    svc.bet(PLAYER, dec!(75.00), CurrencyCode::usd(), "G1")
        .await
        .unwrap();
    svc.win(PLAYER, dec!(20.00), CurrencyCode::usd(), "G1")
        .await
        .unwrap();
    svc.withdraw(PLAYER, dec!(10.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.convert(PLAYER, CurrencyCode::usd(), CurrencyCode::eur(), dec!(100.00))
        .await
        .unwrap();

    assert_eq!(store.entry_count().await, 6);

    // Entry amounts record the requested magnitude, bets included.
    let history = svc.history(PLAYER, CurrencyCode::usd(), 1).await.unwrap();
    let bet = history.iter().find(|e| e.kind == EntryKind::Bet).unwrap();
    assert_eq!(bet.amount, dec!(75.00));
}

#[tokio::test]
async fn test_history_newest_first_capped_and_scoped() {
    let svc = service();
    svc.deposit(PLAYER, dec!(5000.00), CurrencyCode::usd())
        .await
        .unwrap();
    for _ in 0..110 {
        svc.bet(PLAYER, dec!(1.00), CurrencyCode::usd(), "G").await.unwrap();
    }

    let history = svc.history(PLAYER, CurrencyCode::usd(), 30).await.unwrap();
    assert_eq!(history.len(), 100);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
    }

    // No wallet for that currency means no history at all.
    let err = svc.history(PLAYER, CurrencyCode::gbp(), 30).await.unwrap_err();
    assert!(matches!(err, WalletError::WalletNotFound { .. }));
}

#[tokio::test]
async fn test_history_rejects_unrepresentable_day_window() {
    let svc = service();
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();

    // A window chrono cannot represent is a bad request, not a panic.
    let err = svc
        .history(PLAYER, CurrencyCode::usd(), i64::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount { .. }));

    for days in [0, -1] {
        let err = svc
            .history(PLAYER, CurrencyCode::usd(), days)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount { .. }));
    }
}

#[tokio::test]
async fn test_all_balances_aggregate_in_base_currency() {
    let svc = service();
    svc.deposit(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.credit_bonus(PLAYER, dec!(50.00), CurrencyCode::usd(), "B")
        .await
        .unwrap();
    svc.deposit(PLAYER, dec!(85.00), CurrencyCode::eur())
        .await
        .unwrap();

    let all = svc.all_balances(PLAYER).await.unwrap();
    assert_eq!(all.currencies.len(), 2);
    // 150 USD + 85 EUR / 0.85 = 250.00 USD
    assert_eq!(all.total_balance_in_usd, dec!(250.00));
}

#[tokio::test]
async fn test_all_balances_empty_player() {
    let svc = service();
    let all = svc.all_balances(PlayerId(9999)).await.unwrap();
    assert!(all.currencies.is_empty());
    assert_eq!(all.total_balance_in_usd, dec!(0.00));
}

#[tokio::test]
async fn test_resolve_withdrawal_is_terminal_status_write() {
    let (svc, store) = service_with_store();
    svc.deposit(PLAYER, dec!(300.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.withdraw(PLAYER, dec!(100.00), CurrencyCode::usd())
        .await
        .unwrap();

    let pending = &store.withdrawals_for(PLAYER).await[0];
    assert_eq!(pending.status, WithdrawalStatus::Pending);
    assert_eq!(pending.amount, dec!(100.00));

    let resolved = svc
        .resolve_withdrawal(pending.id, WithdrawalStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(resolved.status, WithdrawalStatus::Rejected);
    assert!(resolved.processed_at.is_some());

    // Rejection does not restore funds; the debit made at request time stands.
    let view = svc.balance(PLAYER, CurrencyCode::usd()).await.unwrap();
    assert_eq!(view.balance, dec!(200.00));

    // Unknown ids fail cleanly.
    let err = svc
        .resolve_withdrawal(uuid::Uuid::new_v4(), WithdrawalStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::PendingWithdrawalNotFound { .. }));
}

#[tokio::test]
async fn test_daily_report_aggregates_by_currency() {
    let svc = service();
    svc.deposit(PLAYER, dec!(500.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.deposit(PlayerId(1002), dec!(200.00), CurrencyCode::usd())
        .await
        .unwrap();
    svc.deposit(PlayerId(1002), dec!(90.00), CurrencyCode::eur())
        .await
        .unwrap();
    svc.bet(PLAYER, dec!(50.00), CurrencyCode::usd(), "G")
        .await
        .unwrap();
    svc.win(PLAYER, dec!(25.00), CurrencyCode::usd(), "G")
        .await
        .unwrap();

    let report = svc.daily_report().await.unwrap();
    assert_eq!(report.currencies.len(), 2);

    let usd = report
        .currencies
        .iter()
        .find(|c| c.currency == CurrencyCode::usd())
        .unwrap();
    assert_eq!(usd.total_deposits, dec!(700.00));
    assert_eq!(usd.total_bets, dec!(50.00));
    assert_eq!(usd.total_wins, dec!(25.00));
    assert_eq!(usd.unique_players, 2);

    let eur = report
        .currencies
        .iter()
        .find(|c| c.currency == CurrencyCode::eur())
        .unwrap();
    assert_eq!(eur.total_deposits, dec!(90.00));
    assert_eq!(eur.unique_players, 1);
}
