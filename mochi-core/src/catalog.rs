//! Product catalog and point redemption.
//!
//! A purchase validates the product (exists, active, in stock), debits the
//! wallet, and only then decrements stock. Any refusal leaves both stores
//! untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::types::{ProductId, UserId};
use crate::wallet::{Transaction, TransactionKind, WalletStore};

/// What kind of reward a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductKind {
    /// A discount or voucher code delivered digitally.
    Coupon,
    /// Physical merchandise shipped to the user.
    Merchandise,
}

/// A redeemable catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Coupon or merchandise.
    pub kind: ProductKind,
    /// Price in points.
    pub cost_points: u64,
    /// Units remaining.
    pub stock: u32,
    /// Whether the product is currently listed.
    pub active: bool,
}

/// Receipt for a completed redemption.
#[derive(Debug, Clone)]
pub struct Redemption {
    /// The product that was redeemed.
    pub product: ProductId,
    /// The wallet debit that paid for it.
    pub transaction: Transaction,
}

/// Thread-safe product catalog. `Clone` shares the underlying state.
pub struct ProductCatalog {
    inner: Arc<Mutex<Vec<Product>>>,
}

impl ProductCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a product and return its ID. New products are active.
    pub fn add_product(
        &self,
        name: impl Into<String>,
        kind: ProductKind,
        cost_points: u64,
        stock: u32,
    ) -> ProductId {
        let product = Product {
            id: ProductId::new(),
            name: name.into(),
            kind,
            cost_points,
            stock,
            active: true,
        };
        let id = product.id;
        self.inner.lock().push(product);
        id
    }

    /// All products, active listings first, otherwise in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        let mut products = self.inner.lock().clone();
        products.sort_by_key(|p| !p.active);
        products
    }

    /// Look up a single product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.inner.lock().iter().find(|p| p.id == id).cloned()
    }

    /// Activate or deactivate a listing.
    ///
    /// # Errors
    /// Returns `ProductNotFound` for an unknown ID.
    pub fn set_active(&self, id: ProductId, active: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        let product = inner
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;
        product.active = active;
        Ok(())
    }

    /// Purchase a product with wallet points.
    ///
    /// Validation order: existence, active, stock, then the wallet debit.
    /// Stock is decremented only after the debit succeeds.
    ///
    /// # Errors
    ///
    /// `ProductNotFound`, `ProductUnavailable` (inactive or out of stock),
    /// or any wallet error from the debit (`InsufficientBalance`).
    pub fn purchase_product(
        &self,
        user: UserId,
        product_id: ProductId,
        wallet: &WalletStore,
    ) -> Result<Redemption> {
        let mut inner = self.inner.lock();
        let product = inner
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;

        if !product.active {
            warn!(product = %product_id, "purchase refused: product inactive");
            return Err(CoreError::ProductUnavailable {
                reason: "product is no longer listed".to_string(),
            });
        }
        if product.stock == 0 {
            warn!(product = %product_id, "purchase refused: out of stock");
            return Err(CoreError::ProductUnavailable {
                reason: "out of stock".to_string(),
            });
        }

        let transaction = wallet.add_transaction(
            user,
            TransactionKind::Redeem,
            product.cost_points,
            product.name.clone(),
        )?;
        product.stock -= 1;

        debug!(user = %user, product = %product_id, cost = product.cost_points, "redemption completed");
        Ok(Redemption {
            product: product_id,
            transaction,
        })
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProductCatalog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded_user(wallet: &WalletStore, points: u64) -> UserId {
        let user = UserId::new();
        wallet
            .add_transaction(user, TransactionKind::Earn, points, "seed")
            .expect("seed");
        user
    }

    #[test]
    fn purchase_debits_wallet_and_stock() {
        let wallet = WalletStore::new();
        let catalog = ProductCatalog::new();
        let user = funded_user(&wallet, 500);
        let id = catalog.add_product("10% coupon", ProductKind::Coupon, 200, 3);

        let redemption = catalog
            .purchase_product(user, id, &wallet)
            .expect("purchase");

        assert_eq!(redemption.product, id);
        assert_eq!(redemption.transaction.amount, 200);
        assert_eq!(wallet.balance(user), 300);
        assert_eq!(catalog.product(id).expect("product").stock, 2);
    }

    #[test]
    fn insufficient_balance_leaves_stock_untouched() {
        let wallet = WalletStore::new();
        let catalog = ProductCatalog::new();
        let user = funded_user(&wallet, 10);
        let id = catalog.add_product("plush", ProductKind::Merchandise, 900, 1);

        let result = catalog.purchase_product(user, id, &wallet);

        assert!(matches!(result, Err(CoreError::InsufficientBalance { .. })));
        assert_eq!(catalog.product(id).expect("product").stock, 1);
        assert_eq!(wallet.balance(user), 10);
    }

    #[test]
    fn out_of_stock_is_refused_before_debit() {
        let wallet = WalletStore::new();
        let catalog = ProductCatalog::new();
        let user = funded_user(&wallet, 1000);
        let id = catalog.add_product("limited print", ProductKind::Merchandise, 100, 0);

        let result = catalog.purchase_product(user, id, &wallet);

        assert!(matches!(result, Err(CoreError::ProductUnavailable { .. })));
        assert_eq!(wallet.balance(user), 1000);
    }

    #[test]
    fn inactive_product_cannot_be_purchased() {
        let wallet = WalletStore::new();
        let catalog = ProductCatalog::new();
        let user = funded_user(&wallet, 1000);
        let id = catalog.add_product("retired coupon", ProductKind::Coupon, 50, 10);
        catalog.set_active(id, false).expect("deactivate");

        let result = catalog.purchase_product(user, id, &wallet);
        assert!(matches!(result, Err(CoreError::ProductUnavailable { .. })));
    }

    #[test]
    fn unknown_product_is_not_found() {
        let wallet = WalletStore::new();
        let catalog = ProductCatalog::new();
        let result = catalog.purchase_product(UserId::new(), ProductId::new(), &wallet);
        assert!(matches!(result, Err(CoreError::ProductNotFound(_))));
    }

    #[test]
    fn listing_puts_active_products_first() {
        let catalog = ProductCatalog::new();
        let retired = catalog.add_product("retired", ProductKind::Coupon, 10, 1);
        catalog.add_product("current", ProductKind::Coupon, 10, 1);
        catalog.set_active(retired, false).expect("deactivate");

        let products = catalog.products();
        assert_eq!(products[0].name, "current");
        assert_eq!(products[1].name, "retired");
    }
}
