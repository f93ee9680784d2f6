//! Integration tests — end-to-end store flows.
//!
//! These tests verify complete platform scenarios: earn → browse → redeem
//! chains, session lifecycle around gated features, and config loading.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use tempfile::tempdir;

use mochi_core::catalog::{ProductCatalog, ProductKind};
use mochi_core::config::MochiConfig;
use mochi_core::maintenance::{GateStatus, MaintenanceWindow};
use mochi_core::session::{SessionStore, User};
use mochi_core::wallet::{TransactionKind, WalletStore};
use mochi_core::CoreError;

// ---------------------------------------------------------------------------
// Full rewards lifecycle: sign in → earn → redeem → ledger
// ---------------------------------------------------------------------------

#[test]
fn full_rewards_lifecycle() {
    let wallet = WalletStore::new();
    let catalog = ProductCatalog::new();
    let sessions = SessionStore::new();
    let now = Utc::now();

    // 1. User signs in
    let user = User::new("aki");
    let user_id = user.id;
    let token = sessions.start_session(user, Duration::minutes(720), now);
    assert!(sessions.is_authenticated(token, now));

    // 2. Points accrue over a few days of check-ins
    for day in 0..5 {
        wallet
            .add_transaction(
                user_id,
                TransactionKind::Earn,
                50,
                format!("daily check-in day {day}"),
            )
            .expect("check-in");
    }
    assert_eq!(wallet.balance(user_id), 250);

    // 3. Catalog offers a coupon the user can afford
    let coupon = catalog.add_product("free shipping coupon", ProductKind::Coupon, 200, 10);
    let redemption = catalog
        .purchase_product(user_id, coupon, &wallet)
        .expect("redeem");
    assert_eq!(redemption.transaction.amount, 200);
    assert_eq!(wallet.balance(user_id), 50);

    // 4. Ledger shows the redemption first, then the most recent check-in
    let ledger = wallet.transactions(user_id);
    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger[0].kind, TransactionKind::Redeem);
    assert_eq!(ledger[0].note, "free shipping coupon");
    assert_eq!(ledger[1].note, "daily check-in day 4");

    // 5. A second redemption is refused and changes nothing
    let result = catalog.purchase_product(user_id, coupon, &wallet);
    assert!(matches!(result, Err(CoreError::InsufficientBalance { .. })));
    assert_eq!(wallet.balance(user_id), 50);
    assert_eq!(catalog.product(coupon).expect("product").stock, 9);
}

// ---------------------------------------------------------------------------
// Session expiry around the maintenance window
// ---------------------------------------------------------------------------

#[test]
fn session_expiry_and_maintenance_gate() {
    let sessions = SessionStore::new();
    let window = MaintenanceWindow::new(3, 5);

    let signin = Utc
        .with_ymd_and_hms(2026, 3, 14, 2, 0, 0)
        .single()
        .expect("timestamp");
    let token = sessions.start_session(User::new("aki"), Duration::hours(1), signin);

    // Signed in before the window: authenticated, gate open.
    assert!(sessions.is_authenticated(token, signin));
    assert_eq!(window.status(signin), GateStatus::Open);

    // Half an hour later the window has opened; the session is still live
    // but spending features are gated.
    let during = signin + Duration::minutes(90);
    assert!(sessions.is_authenticated(token, during));
    assert_eq!(
        window.status(during),
        GateStatus::Closed { reopens_at_hour: 5 }
    );

    // Two hours later the session has expired regardless of the gate.
    let after = signin + Duration::hours(2);
    assert!(!sessions.is_authenticated(token, after));
    assert_eq!(sessions.purge_expired(after), 1);
    assert!(sessions.is_empty());
}

// ---------------------------------------------------------------------------
// Concurrent wallet access from multiple threads
// ---------------------------------------------------------------------------

#[test]
fn wallet_is_consistent_under_concurrent_writers() {
    let wallet = WalletStore::new();
    let user = mochi_core::UserId::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let wallet = wallet.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    wallet
                        .add_transaction(user, TransactionKind::Earn, 1, "concurrent earn")
                        .expect("earn");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }

    assert_eq!(wallet.balance(user), 800);
    assert_eq!(wallet.stats().transactions, 800);
}

// ---------------------------------------------------------------------------
// Config file round-trip
// ---------------------------------------------------------------------------

#[test]
fn config_loads_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mochi.toml");
    std::fs::write(
        &path,
        r#"
        [general]
        log_level = "debug"

        [assistant]
        base_url = "http://localhost:8089"
        max_attempts = 2

        [maintenance]
        enabled = true
        start_hour = 22
        end_hour = 6
        "#,
    )
    .expect("write config");

    let config = MochiConfig::from_file(&path).expect("load");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.assistant.base_url, "http://localhost:8089");
    assert_eq!(config.assistant.max_attempts, 2);
    assert!(MaintenanceWindow::from_config(&config.maintenance).is_some());
}

#[test]
fn missing_config_file_is_io_error() {
    let result = MochiConfig::from_file(std::path::Path::new("/nonexistent/mochi.toml"));
    assert!(matches!(result, Err(CoreError::Io(_))));
}

// ---------------------------------------------------------------------------
// Ledger properties
// ---------------------------------------------------------------------------

proptest! {
    /// The balance always equals credits minus the debits that were
    /// accepted, and a debit is accepted iff it fits the running balance.
    #[test]
    fn ledger_balance_invariant(ops in prop::collection::vec((any::<bool>(), 1u64..500), 0..60)) {
        let wallet = WalletStore::new();
        let user = mochi_core::UserId::new();
        let mut expected: u64 = 0;
        let mut accepted: usize = 0;

        for (is_earn, amount) in ops {
            let kind = if is_earn { TransactionKind::Earn } else { TransactionKind::Redeem };
            match wallet.add_transaction(user, kind, amount, "prop") {
                Ok(_) => {
                    accepted += 1;
                    if is_earn {
                        expected += amount;
                    } else {
                        prop_assert!(amount <= expected, "debit accepted beyond balance");
                        expected -= amount;
                    }
                }
                Err(CoreError::InsufficientBalance { needed, available }) => {
                    prop_assert!(!is_earn);
                    prop_assert_eq!(needed, amount);
                    prop_assert_eq!(available, expected);
                }
                Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
            }
        }

        prop_assert_eq!(wallet.balance(user), expected);
        prop_assert_eq!(wallet.transactions(user).len(), accepted);
    }

    /// The maintenance gate is open exactly outside `[start, end)`,
    /// including wrapped windows.
    #[test]
    fn gate_matches_interval_membership(start in 0u32..24, end in 0u32..24, hour in 0u32..24) {
        let window = MaintenanceWindow::new(start, end);
        let now = Utc
            .with_ymd_and_hms(2026, 6, 1, hour, 15, 0)
            .single()
            .expect("timestamp");

        let inside = if start < end {
            hour >= start && hour < end
        } else if start > end {
            hour >= start || hour < end
        } else {
            false
        };
        prop_assert_eq!(window.is_open(now), !inside);
    }
}
