//! Session-gated wallet and catalog flows.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use mochi_core::catalog::{Product, ProductCatalog, Redemption};
use mochi_core::error::{CoreError, Result};
use mochi_core::metrics::PlatformCounters;
use mochi_core::session::SessionStore;
use mochi_core::types::{ProductId, SessionToken, UserId};
use mochi_core::wallet::{Transaction, TransactionKind, WalletStore};

/// Ledger note marking a daily check-in credit.
const CHECK_IN_NOTE: &str = "daily check-in";

/// Outcome of a daily check-in.
#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    /// Points were credited.
    Credited(Transaction),
    /// The user already checked in this UTC calendar day.
    AlreadyCheckedIn,
}

/// Session-gated rewards operations backed by the core stores.
pub struct RewardsService {
    wallet: WalletStore,
    catalog: ProductCatalog,
    sessions: SessionStore,
    counters: Arc<PlatformCounters>,
    check_in_points: u64,
}

impl RewardsService {
    /// Create a rewards service over shared store handles.
    #[must_use]
    pub fn new(
        wallet: WalletStore,
        catalog: ProductCatalog,
        sessions: SessionStore,
        counters: Arc<PlatformCounters>,
        check_in_points: u64,
    ) -> Self {
        Self {
            wallet,
            catalog,
            sessions,
            counters,
            check_in_points,
        }
    }

    fn authenticated_user(&self, token: SessionToken, now: DateTime<Utc>) -> Result<UserId> {
        self.sessions
            .user(token, now)
            .map(|user| user.id)
            .ok_or(CoreError::NotAuthenticated)
    }

    /// Current point balance for the signed-in user.
    ///
    /// # Errors
    /// `NotAuthenticated` for an unknown or expired token.
    pub fn balance_of(&self, token: SessionToken, now: DateTime<Utc>) -> Result<u64> {
        let user = self.authenticated_user(token, now)?;
        Ok(self.wallet.balance(user))
    }

    /// Transaction history for the signed-in user, newest first.
    ///
    /// # Errors
    /// `NotAuthenticated` for an unknown or expired token.
    pub fn history(&self, token: SessionToken, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let user = self.authenticated_user(token, now)?;
        Ok(self.wallet.transactions(user))
    }

    /// The storefront listing. Browsing needs no session.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.catalog.products()
    }

    /// Credit the daily check-in reward, once per UTC calendar day.
    ///
    /// # Errors
    /// `NotAuthenticated` for an unknown or expired token.
    pub fn check_in(&self, token: SessionToken, now: DateTime<Utc>) -> Result<CheckInOutcome> {
        let user = self.authenticated_user(token, now)?;

        let today = now.date_naive();
        let already = self
            .wallet
            .transactions(user)
            .iter()
            .any(|t| {
                t.kind == TransactionKind::Earn
                    && t.note == CHECK_IN_NOTE
                    && t.at.date_naive() == today
            });
        if already {
            debug!(user = %user, "check-in refused: already credited today");
            return Ok(CheckInOutcome::AlreadyCheckedIn);
        }

        let transaction =
            self.wallet
                .add_transaction(user, TransactionKind::Earn, self.check_in_points, CHECK_IN_NOTE)?;
        self.counters.check_ins.fetch_add(1, Ordering::Relaxed);
        Ok(CheckInOutcome::Credited(transaction))
    }

    /// Redeem a product for the signed-in user.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` for a bad token, otherwise whatever the catalog
    /// purchase refuses with (`ProductNotFound`, `ProductUnavailable`,
    /// `InsufficientBalance`).
    pub fn redeem(
        &self,
        token: SessionToken,
        product: ProductId,
        now: DateTime<Utc>,
    ) -> Result<Redemption> {
        let user = self.authenticated_user(token, now)?;
        match self.catalog.purchase_product(user, product, &self.wallet) {
            Ok(redemption) => {
                self.counters
                    .redemptions_completed
                    .fetch_add(1, Ordering::Relaxed);
                Ok(redemption)
            }
            Err(err) => {
                self.counters
                    .redemptions_rejected
                    .fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mochi_core::catalog::ProductKind;
    use mochi_core::session::User;

    fn service() -> (RewardsService, SessionStore) {
        let sessions = SessionStore::new();
        let service = RewardsService::new(
            WalletStore::new(),
            ProductCatalog::new(),
            sessions.clone(),
            Arc::new(PlatformCounters::new()),
            50,
        );
        (service, sessions)
    }

    fn signed_in(sessions: &SessionStore, now: DateTime<Utc>) -> SessionToken {
        sessions.start_session(User::new("aki"), Duration::hours(8), now)
    }

    #[test]
    fn check_in_credits_once_per_day() {
        let (service, sessions) = service();
        let now = Utc::now();
        let token = signed_in(&sessions, now);

        let first = service.check_in(token, now).expect("check in");
        assert!(matches!(first, CheckInOutcome::Credited(_)));
        assert_eq!(service.balance_of(token, now).expect("balance"), 50);

        let second = service.check_in(token, now).expect("check in");
        assert!(matches!(second, CheckInOutcome::AlreadyCheckedIn));
        assert_eq!(service.balance_of(token, now).expect("balance"), 50);
        assert_eq!(service.counters.check_ins.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn operations_require_a_live_session() {
        let (service, _sessions) = service();
        let now = Utc::now();
        let bogus = SessionToken::new();

        assert!(matches!(
            service.balance_of(bogus, now),
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            service.check_in(bogus, now),
            Err(CoreError::NotAuthenticated)
        ));
        assert!(matches!(
            service.redeem(bogus, ProductId::new(), now),
            Err(CoreError::NotAuthenticated)
        ));
    }

    #[test]
    fn redeem_counts_completions_and_rejections() {
        let (service, sessions) = service();
        let now = Utc::now();
        let token = signed_in(&sessions, now);

        service.check_in(token, now).expect("check in");
        let affordable = service
            .catalog
            .add_product("sticker", ProductKind::Coupon, 30, 5);
        let pricey = service
            .catalog
            .add_product("figurine", ProductKind::Merchandise, 9_000, 5);

        service.redeem(token, affordable, now).expect("redeem");
        assert!(service.redeem(token, pricey, now).is_err());

        assert_eq!(
            service
                .counters
                .redemptions_completed
                .load(Ordering::Relaxed),
            1
        );
        assert_eq!(
            service.counters.redemptions_rejected.load(Ordering::Relaxed),
            1
        );
        assert_eq!(service.balance_of(token, now).expect("balance"), 20);
    }

    #[test]
    fn history_is_newest_first() {
        let (service, sessions) = service();
        let now = Utc::now();
        let token = signed_in(&sessions, now);

        service.check_in(token, now).expect("check in");
        let coupon = service
            .catalog
            .add_product("coupon", ProductKind::Coupon, 10, 1);
        service.redeem(token, coupon, now).expect("redeem");

        let history = service.history(token, now).expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, TransactionKind::Redeem);
        assert_eq!(history[1].note, CHECK_IN_NOTE);
    }
}
